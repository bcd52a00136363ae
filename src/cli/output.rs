//! Output formatting for CLI

use crate::models::ValidationReport;
use crate::submission::RunSummary;

pub const TITLE: &str = "Task1 submission checker";
pub const DOUBLE_RULE: &str = "======================================================";
pub const RULE: &str = "------------------------------------------------------";

/// Banner printed at the start of every run
pub fn format_banner() -> String {
    format!("{TITLE}\n{DOUBLE_RULE}")
}

/// Diagnostics of a report, or nothing when it is empty
pub fn format_report(report: &ValidationReport) -> Option<String> {
    if report.diagnostics().is_empty() {
        None
    } else {
        Some(report.render())
    }
}

/// Rule followed by the verdict lines
pub fn format_verdict(summary: &RunSummary) -> String {
    let mut output = String::from(RULE);
    for line in summary.verdict() {
        output.push('\n');
        output.push_str(&line);
    }
    output
}

/// Whole run as a JSON document
pub fn format_json(summary: &RunSummary) -> serde_json::Result<String> {
    let value = serde_json::json!({
        "total_errors": summary.total_errors(),
        "accepted": summary.is_accepted(),
        "submissions": summary.submissions(),
        "verdict": summary.verdict(),
    });
    serde_json::to_string_pretty(&value)
}
