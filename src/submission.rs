//! Checking of submission units and whole runs
//!
//! A submission unit is one output file plus one metadata file. Every unit
//! gets its own [`ValidationReport`]; reports are only summed at the end of
//! a run, never shared between units.

use serde::Serialize;
use tracing::info;

use crate::config::CheckerConfig;
use crate::error::{CheckerError, CheckerResult};
use crate::import::{MetadataImporter, OutputTableImporter};
use crate::models::{MetadataDocument, Schema, ValidationReport};
use crate::validation::fields::key_name;
use crate::validation::label::{bare_filename, check_label_consistency};
use crate::validation::{MetadataValidator, OutputTableValidator};

pub const CHALLENGE_NAME: &str = "DCASE2020 Challenge";

/// Exit status when every submission passed, or errors are not fatal to the exit code
pub const EXIT_OK: u8 = 0;
/// Exit status when validation errors were found
pub const EXIT_ERRORS: u8 = 1;
/// Exit status when the run was aborted
pub const EXIT_FATAL: u8 = 2;

/// Raw contents of one submission
#[derive(Debug, Clone, Copy)]
pub struct SubmissionUnit<'a> {
    /// Path of the output file, on disk or inside a package
    pub output_path: &'a str,
    pub output_content: &'a str,
    /// Path of the metadata file, on disk or inside a package
    pub meta_path: &'a str,
    pub meta_content: &'a str,
}

impl SubmissionUnit<'_> {
    pub fn output_filename(&self) -> &str {
        bare_filename(self.output_path)
    }

    pub fn meta_filename(&self) -> &str {
        bare_filename(self.meta_path)
    }
}

/// Reports of the three stages of one submission
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub output: ValidationReport,
    pub meta: ValidationReport,
    pub label: ValidationReport,
    pub declared_label: String,
}

impl SubmissionOutcome {
    /// All stage reports in check order
    pub fn report(&self) -> ValidationReport {
        self.output.clone() + self.meta.clone() + self.label.clone()
    }

    pub fn error_count(&self) -> usize {
        self.output.error_count() + self.meta.error_count() + self.label.error_count()
    }
}

/// Checks submission units against one subtask schema
pub struct SubmissionChecker<'a> {
    schema: &'a Schema,
    config: &'a CheckerConfig,
}

impl<'a> SubmissionChecker<'a> {
    pub fn new(schema: &'a Schema, config: &'a CheckerConfig) -> Self {
        Self { schema, config }
    }

    pub fn schema(&self) -> &Schema {
        self.schema
    }

    /// Decode and validate a system output file
    pub fn check_output(&self, path: &str, content: &str) -> CheckerResult<ValidationReport> {
        let table = OutputTableImporter::new(bare_filename(path)).parse(content)?;
        Ok(OutputTableValidator::new(&self.schema.output).validate_table(&table))
    }

    /// Decode and validate a metadata file
    pub fn check_meta(
        &self,
        path: &str,
        content: &str,
    ) -> CheckerResult<(MetadataDocument, ValidationReport)> {
        let doc = MetadataImporter::new(bare_filename(path)).parse(content)?;
        let report = MetadataValidator::new(&self.schema.meta, self.schema.subtask.task_label())
            .with_strict_numeric(self.config.strict_numeric)
            .validate(&doc)?;
        Ok((doc, report))
    }

    /// Cross-check filenames against the label declared in the metadata
    pub fn check_labels(
        &self,
        unit: &SubmissionUnit<'_>,
        doc: &MetadataDocument,
    ) -> CheckerResult<(String, ValidationReport)> {
        let label = declared_label(doc)?;
        let report = check_label_consistency(unit.output_filename(), unit.meta_filename(), &label);
        Ok((label, report))
    }

    /// Run every stage on one submission unit
    pub fn check(&self, unit: &SubmissionUnit<'_>) -> CheckerResult<SubmissionOutcome> {
        let output = self.check_output(unit.output_path, unit.output_content)?;
        let (doc, meta) = self.check_meta(unit.meta_path, unit.meta_content)?;
        let (declared_label, label) = self.check_labels(unit, &doc)?;

        info!(
            task = self.schema.subtask.task_label(),
            label = %declared_label,
            errors = output.error_count() + meta.error_count() + label.error_count(),
            "Submission checked"
        );

        Ok(SubmissionOutcome {
            output,
            meta,
            label,
            declared_label,
        })
    }
}

/// Check one submission unit against a subtask schema
pub fn check_submission(
    unit: &SubmissionUnit<'_>,
    schema: &Schema,
    config: &CheckerConfig,
) -> CheckerResult<SubmissionOutcome> {
    SubmissionChecker::new(schema, config).check(unit)
}

/// `submission.label` of a metadata document; absent is fatal
pub fn declared_label(doc: &MetadataDocument) -> CheckerResult<String> {
    doc.get("submission")
        .and_then(|submission| submission.get("label"))
        .map(key_name)
        .ok_or_else(|| CheckerError::MissingKey("submission.label".to_string()))
}

/// Report of one submission within a run
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionSummary {
    pub heading: String,
    pub report: ValidationReport,
}

/// Per-submission reports of a run and the final verdict
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    submissions: Vec<SubmissionSummary>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, heading: impl Into<String>, report: ValidationReport) {
        self.submissions.push(SubmissionSummary {
            heading: heading.into(),
            report,
        });
    }

    pub fn submissions(&self) -> &[SubmissionSummary] {
        &self.submissions
    }

    /// Sum of all per-submission error counts
    pub fn total_errors(&self) -> usize {
        self.submissions.iter().map(|s| s.report.error_count()).sum()
    }

    pub fn is_accepted(&self) -> bool {
        self.total_errors() == 0
    }

    /// Final verdict lines
    pub fn verdict(&self) -> Vec<String> {
        match self.total_errors() {
            0 => vec![
                "No errors found!".to_string(),
                format!("Files are ready for submission to {CHALLENGE_NAME}."),
            ],
            count => vec![format!(
                "In total {count} errors found, please correct them before submitting to the challenge."
            )],
        }
    }

    /// Process exit status for this run
    pub fn exit_code(&self, config: &CheckerConfig) -> u8 {
        if config.fail_on_errors && !self.is_accepted() {
            EXIT_ERRORS
        } else {
            EXIT_OK
        }
    }
}
