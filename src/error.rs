//! Fatal error types
//!
//! Schema-rule violations never surface here; they accumulate in a
//! [`ValidationReport`](crate::models::ValidationReport). The variants below
//! abort a run because nothing after them can be interpreted.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a checker run
#[derive(Error, Debug)]
pub enum CheckerError {
    /// IO error while reading an input
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Metadata document could not be decoded
    #[error("Error while parsing YAML file [{file}]: {message}")]
    MetaParse { file: String, message: String },

    /// System output table could not be decoded
    #[error("Error while parsing system output [{file}]: {message}")]
    OutputParse { file: String, message: String },

    /// A key that later checks rely on is absent
    #[error("Required key missing from meta file: {0}")]
    MissingKey(String),

    /// A key is present but holds a value of the wrong shape
    #[error("Invalid value at '{path}': expected {expected}")]
    InvalidStructure { path: String, expected: &'static str },

    /// Task selector or task token is not one of the two subtasks
    #[error("Illegal task selector [{0}]")]
    UnknownTask(String),

    /// Package holds only one of the two files for a submission label
    #[error("Submission [{label}] is missing its {missing} file")]
    IncompleteSubmission { label: String, missing: &'static str },

    /// ZIP archive could not be opened or read
    #[error("Archive error: {0}")]
    Archive(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Command line arguments do not form a runnable request
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result alias used across the crate
pub type CheckerResult<T> = Result<T, CheckerError>;

impl CheckerError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            CheckerError::FileNotFound(path) => {
                format!(
                    "File not found: {}\n\nHint: Check that the file exists and the path is correct.",
                    path.display()
                )
            }
            CheckerError::MetaParse { file, message } => {
                format!(
                    "Error while parsing YAML file [{file}]\n  {message}\n  Please correct meta file and retry."
                )
            }
            CheckerError::MissingKey(key) => {
                format!(
                    "Required key missing from meta file: {key}\n\n\
                    Hint: Later checks depend on this key; add it and run the checker again."
                )
            }
            CheckerError::UnknownTask(selector) => {
                format!("Illegal task selector [{selector}]\n\nHint: Use 'A' or 'B'.")
            }
            CheckerError::IncompleteSubmission { label, missing } => {
                format!(
                    "Submission [{label}] is missing its {missing} file\n\n\
                    Hint: Each submission directory needs LABEL.output.csv and LABEL.meta.yaml."
                )
            }
            _ => self.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CheckerError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(feature = "package")]
impl From<zip::result::ZipError> for CheckerError {
    fn from(err: zip::result::ZipError) -> Self {
        CheckerError::Archive(err.to_string())
    }
}
