//! Data models for submission checking

pub mod report;
pub mod schema;

pub use report::{Category, Diagnostic, Severity, ValidationReport};
pub use schema::{FieldList, ItemGroupSchema, MetaSchema, OutputSchema, Schema, Subtask};

/// Decoded metadata document: a tree of mappings, sequences and scalars
pub type MetadataDocument = serde_yaml::Value;

/// Decoded system output: header row plus data rows, cells kept as text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl OutputTable {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    /// Position of a named column in the header
    pub fn column(&self, name: &str) -> Option<usize> {
        column_index(&self.header, name)
    }
}

/// Position of a named column in a header row
pub fn column_index(header: &[String], name: &str) -> Option<usize> {
    header.iter().position(|field| field == name)
}
