//! Import functionality
//!
//! Decoders that turn submission files into the in-memory structures the
//! validators consume:
//! - System output (tab-separated, header row first)
//! - Metadata (YAML)

pub mod meta;
pub mod output;

use std::path::Path;

use crate::error::{CheckerError, CheckerResult};

pub use meta::MetadataImporter;
pub use output::OutputTableImporter;

/// Read a submission file from disk as UTF-8 text
pub fn read_submission_file(path: &Path) -> CheckerResult<String> {
    if !path.exists() {
        return Err(CheckerError::FileNotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|e| CheckerError::io(path, e))
}
