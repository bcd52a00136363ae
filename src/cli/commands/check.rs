//! Check command implementation
//!
//! Prints a running commentary while each submission is checked, then the
//! final verdict. Fatal errors are returned to `main`, which aborts the run.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::args::{CheckRequest, Cli, ReportFormat};
use crate::cli::output::{RULE, format_banner, format_json, format_report, format_verdict};
use crate::config::CheckerConfig;
use crate::import::read_submission_file;
use crate::models::{Category, Subtask, ValidationReport};
use crate::package::SubmissionPackage;
use crate::submission::{RunSummary, SubmissionChecker, SubmissionUnit};
use crate::validation::label::{bare_filename, check_filename_conventions, filename_label};

/// Result of a completed run
#[derive(Debug)]
pub struct CheckOutcome {
    pub summary: RunSummary,
    pub exit_code: u8,
}

/// Handle the check command, writing the report to `out`
pub fn handle_check(cli: &Cli, out: &mut dyn Write) -> Result<CheckOutcome> {
    let config = cli.checker_config()?;
    let request = cli.request()?;

    let mut sink = std::io::sink();
    let commentary: &mut dyn Write = match cli.format {
        ReportFormat::Text => &mut *out,
        ReportFormat::Json => &mut sink,
    };

    writeln!(commentary, "{}", format_banner())?;

    let summary = match &request {
        CheckRequest::Package(path) => check_package(path, &config, commentary)?,
        CheckRequest::Single {
            subtask,
            output,
            meta,
        } => check_single(*subtask, output, meta, &config, commentary)?,
    };

    match cli.format {
        ReportFormat::Text => writeln!(out, "{}", format_verdict(&summary))?,
        ReportFormat::Json => writeln!(out, "{}", format_json(&summary)?)?,
    }

    let exit_code = summary.exit_code(&config);
    info!(
        total_errors = summary.total_errors(),
        exit_code, "Check finished"
    );
    Ok(CheckOutcome { summary, exit_code })
}

/// One output file and one metadata file given on the command line
fn check_single(
    subtask: Subtask,
    output_path: &Path,
    meta_path: &Path,
    config: &CheckerConfig,
    out: &mut dyn Write,
) -> Result<RunSummary> {
    let output_content = read_submission_file(output_path)?;
    let meta_content = read_submission_file(meta_path)?;
    let output_path = output_path.display().to_string();
    let meta_path = meta_path.display().to_string();

    let unit = SubmissionUnit {
        output_path: &output_path,
        output_content: &output_content,
        meta_path: &meta_path,
        meta_content: &meta_content,
    };

    let mut report =
        check_filename_conventions(unit.output_filename(), unit.meta_filename(), subtask);
    print_report(out, &report)?;

    let (unit_report, _) = check_unit(&SubmissionChecker::new(subtask.schema(), config), &unit, out)?;
    report += unit_report;

    let mut summary = RunSummary::new();
    summary.push(filename_label(unit.output_filename()), report);
    Ok(summary)
}

/// Every submission found in a ZIP package
fn check_package(path: &Path, config: &CheckerConfig, out: &mut dyn Write) -> Result<RunSummary> {
    writeln!(out, "Validating ZIP package [{}]", path.display())?;
    writeln!(out, "{RULE}")?;
    writeln!(out)?;

    let mut package = SubmissionPackage::open(path)?;
    print_report(out, package.notices())?;

    let mut summary = RunSummary::new();
    summary.push(bare_filename(&path.display().to_string()), package.notices().clone());

    for submission in package.submissions().to_vec() {
        writeln!(out, "Validate [{}]", submission.heading())?;
        writeln!(out, "{RULE}")?;

        let (output_entry, meta_entry) = submission.entries()?;
        let (output_content, meta_content) = package
            .read_submission(&submission)
            .with_context(|| format!("Failed to read submission [{}]", submission.label))?;
        let unit = SubmissionUnit {
            output_path: output_entry,
            output_content: &output_content,
            meta_path: meta_entry,
            meta_content: &meta_content,
        };

        let checker = SubmissionChecker::new(submission.subtask.schema(), config);
        let (mut report, declared) = check_unit(&checker, &unit, out)?;

        if declared != submission.label {
            let mut notice = ValidationReport::new();
            notice.warning(
                Category::Label,
                format!(
                    "Submission label used in the dir/filenames and meta information differs [{} != {declared}]",
                    submission.label
                ),
            );
            print_report(out, &notice)?;
            report += notice;
        }
        writeln!(out)?;

        summary.push(submission.heading(), report);
    }

    Ok(summary)
}

/// Output, metadata and label stages of one unit, printed as they run
///
/// Returns the combined report and the label declared in the metadata.
fn check_unit(
    checker: &SubmissionChecker<'_>,
    unit: &SubmissionUnit<'_>,
    out: &mut dyn Write,
) -> Result<(ValidationReport, String)> {
    writeln!(out, " Output file: [{}]", unit.output_path)?;
    let output = checker.check_output(unit.output_path, unit.output_content)?;
    print_report(out, &output)?;
    writeln!(out)?;

    writeln!(out, " Meta file:   [{}]", unit.meta_path)?;
    let (doc, meta) = checker.check_meta(unit.meta_path, unit.meta_content)?;
    print_report(out, &meta)?;

    let (declared, label) = checker.check_labels(unit, &doc)?;
    print_report(out, &label)?;

    Ok((output + meta + label, declared))
}

fn print_report(out: &mut dyn Write, report: &ValidationReport) -> std::io::Result<()> {
    match format_report(report) {
        Some(text) => writeln!(out, "{text}"),
        None => Ok(()),
    }
}
