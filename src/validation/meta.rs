//! Metadata document validation
//!
//! Walks the `submission`, `system` and `results` blocks of a decoded
//! metadata document. Each block is checked independently; a missing block
//! only skips its own nested checks.
//!
//! Numeric checks on development-set results are reported as warnings unless
//! strict numeric checking is enabled, while `system.complexity.total_parameters`
//! is always counted. The two treatments are inconsistent; the lenient one is
//! kept as the default so existing submissions keep their error totals.

use serde_yaml::Value;
use tracing::debug;

use crate::error::{CheckerError, CheckerResult};
use crate::models::{Category, ItemGroupSchema, MetaSchema, MetadataDocument, Severity, ValidationReport};
use crate::validation::fields::{
    is_float_value, is_int_value, is_truthy, key_name, sequence_items, untag,
    value_has_required_fields,
};

const TOP_LEVEL_HINT: &str = "'submission', 'system', and 'results' blocks required at top level.";
const LABEL_SEGMENTS: usize = 4;
const MAX_ABBREVIATION_LENGTH: usize = 10;

/// Metadata validator for one subtask
pub struct MetadataValidator<'a> {
    schema: &'a MetaSchema,
    task_label: &'a str,
    strict_numeric: bool,
}

impl<'a> MetadataValidator<'a> {
    pub fn new(schema: &'a MetaSchema, task_label: &'a str) -> Self {
        Self {
            schema,
            task_label,
            strict_numeric: false,
        }
    }

    /// Count non-numeric development-set results as errors
    pub fn with_strict_numeric(mut self, strict: bool) -> Self {
        self.strict_numeric = strict;
        self
    }

    /// Validate a decoded metadata document
    ///
    /// Returns `Err` only for structural problems that leave later checks
    /// without input, such as a missing `system.complexity.total_parameters`.
    pub fn validate(&self, doc: &MetadataDocument) -> CheckerResult<ValidationReport> {
        let mut report = ValidationReport::new();

        match block(doc, "submission") {
            Some(submission) => report += self.check_submission(submission)?,
            None => missing_block(&mut report, "submission"),
        }

        match block(doc, "system") {
            Some(system) => report += self.check_system(system)?,
            None => missing_block(&mut report, "system"),
        }

        match block(doc, "results") {
            Some(results) => report += self.check_results(results),
            None => missing_block(&mut report, "results"),
        }

        debug!(
            task = self.task_label,
            errors = report.error_count(),
            warnings = report.warning_count(),
            "Metadata validated"
        );

        Ok(report)
    }

    fn check_submission(&self, submission: &Value) -> CheckerResult<ValidationReport> {
        let mut report = ValidationReport::new();
        require_fields(&mut report, submission, "submission", self.schema.submission);

        let authors = block(submission, "authors")
            .ok_or_else(|| CheckerError::MissingKey("submission.authors".to_string()))?;
        if !matches!(untag(authors), Value::Sequence(_)) {
            return Err(CheckerError::InvalidStructure {
                path: "submission.authors".to_string(),
                expected: "a list of author entries",
            });
        }

        let mut corresponding = 0usize;
        for author in sequence_items(authors) {
            require_fields(&mut report, author, "submission.author", self.schema.authors);
            if block(author, "corresponding").is_some_and(is_truthy) {
                corresponding += 1;
            }
        }

        match corresponding {
            0 => report.error(
                Category::Meta,
                "'submission.author' block has to have one corresponding author marked",
            ),
            1 => {}
            _ => report.error(
                Category::Meta,
                "'submission.author' block has more than one corresponding author marked",
            ),
        }

        if let Some(label) = block(submission, "label") {
            let label = key_name(label);
            if !label_matches_task(&label, self.task_label) {
                report.error(
                    Category::Meta,
                    format!("Submission label is wrongly constructed [submission.label={label}]"),
                );
            }
        }

        if let Some(abbreviation) = block(submission, "abbreviation") {
            let abbreviation = key_name(abbreviation);
            if abbreviation.chars().count() > MAX_ABBREVIATION_LENGTH {
                report.error(
                    Category::Meta,
                    format!(
                        "Submission abbreviation is too long ['{abbreviation}' > {MAX_ABBREVIATION_LENGTH}]"
                    ),
                );
            }
        }

        Ok(report)
    }

    fn check_system(&self, system: &Value) -> CheckerResult<ValidationReport> {
        let mut report = ValidationReport::new();
        let schema = self.schema;
        require_fields(&mut report, system, "system", schema.system);

        if let Some(description) = block(system, "description") {
            require_fields(&mut report, description, "system.description", schema.description);
        }

        if let Some(complexity) = block(system, "complexity") {
            require_fields(&mut report, complexity, "system.complexity", schema.complexity);
        }

        // Read without a presence guard: parameter count is mandatory
        let complexity = block(system, "complexity")
            .ok_or_else(|| CheckerError::MissingKey("system.complexity".to_string()))?;
        let total_parameters = block(complexity, "total_parameters").ok_or_else(|| {
            CheckerError::MissingKey("system.complexity.total_parameters".to_string())
        })?;
        if !is_int_value(total_parameters) {
            report.error(
                Category::Meta,
                "'system.complexity.total_parameters' value not a number",
            );
        }

        if let Some(datasets) = block(system, "external_datasets") {
            for dataset in sequence_items(datasets) {
                require_fields(
                    &mut report,
                    dataset,
                    "system.external_datasets",
                    schema.external_datasets,
                );
            }
        }

        Ok(report)
    }

    fn check_results(&self, results: &Value) -> ValidationReport {
        let mut report = ValidationReport::new();
        let schema = self.schema;
        require_fields(&mut report, results, "results", schema.results);

        let Some(development) = block(results, "development_dataset") else {
            return report;
        };
        let prefix = "results.development_dataset";
        require_fields(&mut report, development, prefix, schema.development_dataset);

        if let Some(overall) = non_empty_block(development, "overall") {
            let path = format!("{prefix}.overall");
            require_fields(&mut report, overall, &path, schema.overall);
            self.check_numeric_entries(&mut report, overall, &path);
        }

        if let Some(class_wise) = non_empty_block(development, "class_wise") {
            self.check_item_group(
                &mut report,
                class_wise,
                &format!("{prefix}.class_wise"),
                &schema.class_wise,
            );
        }

        if let Some(group_schema) = &schema.device_wise
            && let Some(device_wise) = non_empty_block(development, "device_wise")
        {
            self.check_item_group(
                &mut report,
                device_wise,
                &format!("{prefix}.device_wise"),
                group_schema,
            );
        }

        report
    }

    /// Class-wise or device-wise results: group keys, per-item keys, numbers
    fn check_item_group(
        &self,
        report: &mut ValidationReport,
        group: &Value,
        path: &str,
        schema: &ItemGroupSchema,
    ) {
        require_fields(report, group, path, schema.items);

        if let Value::Mapping(items) = untag(group) {
            for (item, entry) in items {
                let item_path = format!("{path}.{}", key_name(item));
                require_fields(report, entry, &item_path, schema.per_item);
                self.check_numeric_entries(report, entry, &item_path);
            }
        }
    }

    fn check_numeric_entries(&self, report: &mut ValidationReport, entries: &Value, path: &str) {
        let Value::Mapping(entries) = untag(entries) else {
            return;
        };
        let severity = if self.strict_numeric {
            Severity::Error
        } else {
            Severity::Warning
        };
        for (key, value) in entries {
            if !is_float_value(value) {
                report.push(
                    Category::Meta,
                    severity,
                    vec![format!("'{path}.{}' value is not numeric.", key_name(key))],
                );
            }
        }
    }
}

/// Validate a metadata document with the given schema
pub fn validate_meta(
    doc: &MetadataDocument,
    task_label: &str,
    schema: &MetaSchema,
) -> CheckerResult<ValidationReport> {
    MetadataValidator::new(schema, task_label).validate(doc)
}

/// Whether a submission label has four `_` segments with the task token third
pub fn label_matches_task(label: &str, task_label: &str) -> bool {
    let segments: Vec<&str> = label.split('_').collect();
    segments.len() == LABEL_SEGMENTS && segments[2] == task_label
}

fn block<'v>(value: &'v Value, key: &str) -> Option<&'v Value> {
    untag(value).get(key)
}

fn non_empty_block<'v>(value: &'v Value, key: &str) -> Option<&'v Value> {
    block(value, key).filter(|v| is_truthy(v))
}

fn missing_block(report: &mut ValidationReport, name: &str) {
    report.error_lines(
        Category::Meta,
        vec![
            format!("'{name}' block missing from meta file"),
            TOP_LEVEL_HINT.to_string(),
        ],
    );
}

fn require_fields(report: &mut ValidationReport, source: &Value, path: &str, required: &[&str]) {
    if !value_has_required_fields(source, required) {
        report.error_lines(
            Category::Meta,
            vec![
                format!("'{path}' block does not contain all required fields"),
                format!("Fields required [{}]", required.join(",")),
            ],
        );
    }
}
