//! DCASE Task 1 submission checker
//!
//! Validates challenge submission packages before upload:
//! - System output tables against the fixed output schema of each subtask
//! - Metadata documents against the required-field tree of each subtask
//! - Submission labels across filenames and metadata
//! - ZIP packages holding several submissions (feature `package`)
//!
//! Every submission unit yields its own [`ValidationReport`]; a non-zero
//! error count rejects the submission.

pub mod config;
pub mod error;
pub mod import;
pub mod models;
#[cfg(feature = "package")]
pub mod package;
pub mod submission;
pub mod validation;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use config::CheckerConfig;
pub use error::{CheckerError, CheckerResult};
pub use import::{MetadataImporter, OutputTableImporter};
pub use models::{
    Category, Diagnostic, MetadataDocument, OutputTable, Schema, Severity, Subtask,
    ValidationReport,
};
#[cfg(feature = "package")]
pub use package::{PackagedSubmission, SubmissionPackage};
pub use submission::{
    RunSummary, SubmissionChecker, SubmissionOutcome, SubmissionUnit, check_submission,
};
pub use validation::{
    MetadataValidator, OutputTableValidator, check_filename_conventions, check_label_consistency,
    validate_meta, validate_output,
};
