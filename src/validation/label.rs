//! Submission label checks across filenames and metadata

use crate::models::{Category, Subtask, ValidationReport};
use crate::validation::fields::parse_int_str;

/// Valid range of the attempt index, the fourth label segment
pub const SUBMISSION_INDEX_RANGE: std::ops::RangeInclusive<i64> = 1..=4;

/// Label part of a filename: everything before the first `.`
pub fn filename_label(filename: &str) -> &str {
    filename.split('.').next().unwrap_or(filename)
}

/// Bare filename of a path inside a package or on disk
pub fn bare_filename(path: &str) -> &str {
    path.rsplit(&['/', '\\'][..]).next().unwrap_or(path)
}

/// Both filenames must carry the label declared in the metadata document
///
/// Each mismatch is counted on its own, so the result holds 0 to 2 errors.
pub fn check_label_consistency(
    output_filename: &str,
    meta_filename: &str,
    declared_label: &str,
) -> ValidationReport {
    let mut report = ValidationReport::new();

    if filename_label(output_filename) != declared_label {
        report.error(
            Category::Label,
            format!(
                "Submission label and filename for system output do not match [{declared_label} != {output_filename}]"
            ),
        );
    }

    if filename_label(meta_filename) != declared_label {
        report.error(
            Category::Label,
            format!(
                "Submission label and filename for meta information do not match [{declared_label} != {meta_filename}]"
            ),
        );
    }

    report
}

/// Filename conventions `LABEL.output.csv` / `LABEL.meta.yaml` for one subtask
pub fn check_filename_conventions(
    output_filename: &str,
    meta_filename: &str,
    subtask: Subtask,
) -> ValidationReport {
    let output = SubmissionFile {
        filename: output_filename,
        description: "System output",
        label_kind: "OUTPUT",
        suffix: "output.csv",
    };
    let meta = SubmissionFile {
        filename: meta_filename,
        description: "System meta information",
        label_kind: "META information",
        suffix: "meta.yaml",
    };

    output.check(subtask) + meta.check(subtask)
}

struct SubmissionFile<'a> {
    filename: &'a str,
    description: &'static str,
    label_kind: &'static str,
    suffix: &'static str,
}

impl SubmissionFile<'_> {
    fn check(&self, subtask: Subtask) -> ValidationReport {
        let mut report = ValidationReport::new();
        let filename = self.filename;
        let task_label = subtask.task_label();

        if filename.split('.').count() != 3 {
            report.error_lines(
                Category::Filename,
                vec![
                    format!("{} has filename in wrong format [{filename}]", self.description),
                    format!("Correct format is [SUBMISSION LABEL].{}", self.suffix),
                ],
            );
        }

        let segments: Vec<&str> = filename_label(filename).split('_').collect();
        let wrong_label = format!(
            "Submission label in system {} filename is wrong [{filename}]",
            self.label_kind
        );

        if segments.get(2) != Some(&task_label) {
            report.error_lines(
                Category::Label,
                vec![
                    wrong_label,
                    format!("Correct format is [AUTHORLASTNAME]_[INSTITUTE]_[{task_label}]_[1-4]"),
                ],
            );
        } else {
            let index = segments.get(3).and_then(|s| parse_int_str(s));
            if !index.is_some_and(|i| SUBMISSION_INDEX_RANGE.contains(&i)) {
                report.error_lines(
                    Category::Label,
                    vec![
                        wrong_label,
                        "Submission index number in submission label has to be 1-4".to_string(),
                    ],
                );
            }
        }

        report
    }
}
