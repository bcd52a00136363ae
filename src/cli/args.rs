//! Command line arguments

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::CheckerConfig;
use crate::error::{CheckerError, CheckerResult};
use crate::models::Subtask;

/// Task1 submission checker
#[derive(Parser, Debug, Clone)]
#[command(name = "submission-checker", version, about)]
pub struct Cli {
    /// Submission package (ZIP)
    #[arg(short = 'p', long)]
    pub package: Option<PathBuf>,

    /// Task selector: A or B
    #[arg(short = 't', long)]
    pub task: Option<String>,

    /// System output file in CSV format
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// System meta information file in YAML format
    #[arg(short = 'm', long)]
    pub meta: Option<PathBuf>,

    /// Count non-numeric result values as errors
    #[arg(long)]
    pub strict: bool,

    /// Exit with status 0 even when errors were found
    #[arg(long)]
    pub no_fail_on_errors: bool,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Running commentary and verdict
    Text,
    /// One JSON document with every report
    Json,
}

/// What a command line asks the checker to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckRequest {
    Package(PathBuf),
    Single {
        subtask: Subtask,
        output: PathBuf,
        meta: PathBuf,
    },
}

impl Cli {
    /// Resolve arguments into a request; a package takes precedence
    pub fn request(&self) -> CheckerResult<CheckRequest> {
        if let Some(package) = &self.package {
            return Ok(CheckRequest::Package(package.clone()));
        }

        let task = self
            .task
            .as_deref()
            .ok_or_else(|| CheckerError::InvalidArgument("Please give task selector".to_string()))?;
        let subtask = Subtask::from_selector(task)?;
        let output = self.output.clone().ok_or_else(|| {
            CheckerError::InvalidArgument("Please give system output file".to_string())
        })?;
        let meta = self.meta.clone().ok_or_else(|| {
            CheckerError::InvalidArgument("Please give system meta information".to_string())
        })?;

        Ok(CheckRequest::Single {
            subtask,
            output,
            meta,
        })
    }

    /// Configuration file (if any) with command line overrides applied
    pub fn checker_config(&self) -> CheckerResult<CheckerConfig> {
        let mut config = match &self.config {
            Some(path) => CheckerConfig::load(path)?,
            None => CheckerConfig::default(),
        };
        if self.strict {
            config = config.with_strict_numeric(true);
        }
        if self.no_fail_on_errors {
            config = config.with_fail_on_errors(false);
        }
        Ok(config)
    }
}
