//! Checker configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CheckerError, CheckerResult};

/// Run-wide settings; schemas themselves are fixed and not configurable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Count non-numeric development-set results as errors instead of
    /// reporting them as warnings
    pub strict_numeric: bool,
    /// Exit with a non-zero status when any error was found
    pub fail_on_errors: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            strict_numeric: false,
            fail_on_errors: true,
        }
    }
}

impl CheckerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable strict numeric checking
    pub fn with_strict_numeric(mut self, strict: bool) -> Self {
        self.strict_numeric = strict;
        self
    }

    /// Set whether errors produce a failing exit status
    pub fn with_fail_on_errors(mut self, fail: bool) -> Self {
        self.fail_on_errors = fail;
        self
    }

    /// Parse a TOML configuration
    pub fn from_toml_str(content: &str) -> CheckerResult<Self> {
        toml::from_str(content).map_err(|e| CheckerError::InvalidConfig(e.to_string()))
    }

    /// Load a TOML configuration file
    pub fn load(path: &Path) -> CheckerResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CheckerError::io(path, e))?;
        Self::from_toml_str(&content)
    }
}
