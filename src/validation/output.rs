//! System output table validation
//!
//! Checks the decoded output table of one submission against the output
//! schema of its subtask. No check aborts the others; every violation is
//! counted and reported in row order, followed by the unique-file summary.

use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

use crate::models::{Category, OutputSchema, OutputTable, ValidationReport, column_index};
use crate::validation::fields::{IntegerText, classify_int_str, has_required_fields, is_float_str};

const FILENAME_COLUMN: &str = "filename";
const SCENE_LABEL_COLUMN: &str = "scene_label";
const AUDIO_EXTENSION: &str = "wav";

/// Output table validator
pub struct OutputTableValidator<'a> {
    schema: &'a OutputSchema,
}

impl<'a> OutputTableValidator<'a> {
    /// Create a validator for one subtask's output schema
    pub fn new(schema: &'a OutputSchema) -> Self {
        Self { schema }
    }

    pub fn validate_table(&self, table: &OutputTable) -> ValidationReport {
        self.validate(&table.rows, &table.header)
    }

    /// Validate data rows against the header and the schema
    pub fn validate(&self, rows: &[Vec<String>], header: &[String]) -> ValidationReport {
        let mut report = ValidationReport::new();
        let schema = self.schema;

        let filename_index = column_index(header, FILENAME_COLUMN);
        let scene_label_index = column_index(header, SCENE_LABEL_COLUMN);

        if filename_index.is_none() {
            report.error(Category::Output, "No header row in output file");
        }

        if !has_required_fields(header.iter().map(String::as_str), schema.fields) {
            report.error_lines(
                Category::Output,
                vec![
                    "Errors in header fields in the output file".to_string(),
                    format!("Correct header fields are [{}]", schema.fields.join(",")),
                ],
            );
        }

        // Float columns absent from the header were already reported above
        let float_columns: Vec<(&str, usize)> = schema
            .float_fields
            .iter()
            .filter_map(|field| column_index(header, field).map(|index| (*field, index)))
            .collect();

        let mut seen: HashSet<&str> = HashSet::new();
        let mut unique_files = 0usize;

        for (position, row) in rows.iter().enumerate() {
            let row_id = position + 1;

            if let Some(index) = filename_index {
                let cell = row.get(index).map(String::as_str).unwrap_or_default();
                let filename = cell.rsplit('/').next().unwrap_or(cell);

                if seen.insert(filename) {
                    unique_files += 1;
                } else {
                    report.error(
                        Category::Output,
                        format!("Duplicate file [{cell}] at row [{row_id}]"),
                    );
                }

                self.check_filename(&mut report, cell, filename, row_id);
            }

            if row.len() != schema.fields.len() {
                report.error(
                    Category::Output,
                    format!("Wrong field count at row [{row_id}]"),
                );
            }

            if let Some(index) = scene_label_index {
                let label = row.get(index).map(String::as_str).unwrap_or_default();
                if !schema.scene_labels.contains(&label) {
                    report.error(
                        Category::Output,
                        format!("Use of illegal scene label [{label}] at row [{row_id}]"),
                    );
                }
            }

            for (field, index) in &float_columns {
                if let Some(value) = row.get(*index)
                    && !is_float_str(value)
                {
                    report.error(
                        Category::Output,
                        format!("Wrong field type at row [{row_id}] for field [{field}={value}]"),
                    );
                }
            }
        }

        if unique_files != schema.unique_file_count {
            report.error(
                Category::Output,
                format!(
                    "Incorrect number of outputted entries [{unique_files} != {}] (unique filenames counted)",
                    schema.unique_file_count
                ),
            );
        }

        debug!(
            rows = rows.len(),
            unique_files,
            errors = report.error_count(),
            "Output table validated"
        );

        report
    }

    /// Extension and index-range checks on one row's filename
    fn check_filename(&self, report: &mut ValidationReport, cell: &str, filename: &str, row_id: usize) {
        let path = Path::new(filename);

        if path.extension().and_then(|e| e.to_str()) != Some(AUDIO_EXTENSION) {
            report.error(
                Category::Output,
                format!("Wrong file extension for file [{cell}] at row [{row_id}] (use '.wav')"),
            );
        }

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let problem = match classify_int_str(stem) {
            IntegerText::Value(index) if index > self.schema.index_max => "file index too large",
            IntegerText::Overflow { negative: false } => "file index too large",
            IntegerText::Value(index) if index < self.schema.index_min => "file index too small",
            IntegerText::Overflow { negative: true } => "file index too small",
            IntegerText::Value(_) => return,
            IntegerText::Invalid => "file index not a number",
        };
        report.error(
            Category::Output,
            format!("Illegal filename [{cell}] at row [{row_id}] ({problem})"),
        );
    }
}

/// Validate an output table with the given schema
pub fn validate_output(
    rows: &[Vec<String>],
    header: &[String],
    schema: &OutputSchema,
) -> ValidationReport {
    OutputTableValidator::new(schema).validate(rows, header)
}
