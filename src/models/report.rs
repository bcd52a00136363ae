//! Diagnostic accumulator shared by all checks

use serde::Serialize;
use std::ops::{Add, AddAssign};

/// Width of the bracketed category tag
const TAG_WIDTH: usize = 6;
/// Indentation of continuation lines, aligned under the first message line
const CONTINUATION_INDENT: &str = "               ";

/// Which part of the submission a diagnostic is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Output,
    Meta,
    Label,
    Filename,
    Zip,
}

impl Category {
    pub fn tag(self) -> &'static str {
        match self {
            Category::Output => "OUTPUT",
            Category::Meta => "META",
            Category::Label => "LABEL",
            Category::Filename => "FILENAME",
            Category::Zip => "ZIP",
        }
    }
}

/// Whether a diagnostic counts toward rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    /// Reported, but not added to the error count
    Warning,
}

/// One reported problem: a message plus optional continuation lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: Category,
    pub severity: Severity,
    pub lines: Vec<String>,
}

impl Diagnostic {
    pub fn message(&self) -> &str {
        self.lines.first().map(String::as_str).unwrap_or_default()
    }

    pub fn continuation(&self) -> &[String] {
        self.lines.get(1..).unwrap_or_default()
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Render as indented text lines
    ///
    /// ```text
    ///   [META  ]    'system' block missing from meta file
    ///                'submission', 'system', and 'results' blocks required at top level.
    /// ```
    pub fn render(&self) -> String {
        let mut out = format!(
            "  [{:<width$}]    {}",
            self.category.tag(),
            self.message(),
            width = TAG_WIDTH
        );
        for line in self.continuation() {
            out.push('\n');
            out.push_str(CONTINUATION_INDENT);
            out.push_str(line);
        }
        out
    }
}

/// Error count plus ordered diagnostics of one submission unit
///
/// Append-only. Independent checks each return their own report and are
/// composed with `+` / [`merge`](Self::merge).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    error_count: usize,
    diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a counted single-line error
    pub fn error(&mut self, category: Category, message: impl Into<String>) {
        self.push(category, Severity::Error, vec![message.into()]);
    }

    /// Record a counted error with continuation lines
    pub fn error_lines(&mut self, category: Category, lines: Vec<String>) {
        self.push(category, Severity::Error, lines);
    }

    /// Record an uncounted notice
    pub fn warning(&mut self, category: Category, message: impl Into<String>) {
        self.push(category, Severity::Warning, vec![message.into()]);
    }

    pub fn push(&mut self, category: Category, severity: Severity, lines: Vec<String>) {
        if severity == Severity::Error {
            self.error_count += 1;
        }
        self.diagnostics.push(Diagnostic {
            category,
            severity,
            lines,
        });
    }

    /// Append another report's diagnostics after this one's
    pub fn merge(&mut self, other: ValidationReport) {
        self.error_count += other.error_count;
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn is_valid(&self) -> bool {
        self.error_count == 0
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// First lines of all diagnostics in a category
    pub fn messages(&self, category: Category) -> impl Iterator<Item = &str> {
        self.diagnostics
            .iter()
            .filter(move |d| d.category == category)
            .map(Diagnostic::message)
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count
    }

    /// Render every diagnostic, one per line group, in recording order
    pub fn render(&self) -> String {
        self.diagnostics
            .iter()
            .map(Diagnostic::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Add for ValidationReport {
    type Output = ValidationReport;

    fn add(mut self, rhs: ValidationReport) -> ValidationReport {
        self.merge(rhs);
        self
    }
}

impl AddAssign for ValidationReport {
    fn add_assign(&mut self, rhs: ValidationReport) {
        self.merge(rhs);
    }
}
