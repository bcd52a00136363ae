//! Validation functionality
//!
//! Provides validation logic for:
//! - System output tables (columns, filenames, scene labels, float fields)
//! - Metadata documents (required blocks and fields, authors, results)
//! - Submission labels across filenames and metadata

pub mod fields;
pub mod label;
pub mod meta;
pub mod output;

pub use label::{check_filename_conventions, check_label_consistency};
pub use meta::{MetadataValidator, validate_meta};
pub use output::{OutputTableValidator, validate_output};
