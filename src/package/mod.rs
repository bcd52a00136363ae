//! ZIP submission packages
//!
//! A package bundles up to four submissions per subtask, each in its own
//! directory named after the submission label:
//!
//! ```text
//! Smith_TAU_task1/
//!   task1/
//!     Smith_TAU_task1a_1/
//!       Smith_TAU_task1a_1.output.csv
//!       Smith_TAU_task1a_1.meta.yaml
//! ```
//!
//! Discovery problems are reported as uncounted `zip` notices; only a
//! submission missing one of its two files is fatal, and only once that
//! submission is read.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use tracing::{debug, warn};
use zip::ZipArchive;

use crate::error::{CheckerError, CheckerResult};
use crate::models::{Category, Subtask, ValidationReport};

const TASK_MARKER: &str = "task1";
const OUTPUT_MARKER: &str = ".output.csv";
const META_MARKER: &str = ".meta.yaml";
const DOCUMENT_MARKER: &str = ".pdf";
/// Directory depth of the submission label directory
const LABEL_DIR_DEPTH: usize = 2;

/// One submission found in a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedSubmission {
    pub subtask: Subtask,
    /// Label taken from the submission directory name
    pub label: String,
    pub output_entry: Option<String>,
    pub meta_entry: Option<String>,
}

impl PackagedSubmission {
    fn new(subtask: Subtask, label: String) -> Self {
        Self {
            subtask,
            label,
            output_entry: None,
            meta_entry: None,
        }
    }

    /// Archive paths of the output and metadata files
    pub fn entries(&self) -> CheckerResult<(&str, &str)> {
        let output = self.output_entry.as_deref().ok_or_else(|| self.incomplete("output"))?;
        let meta = self.meta_entry.as_deref().ok_or_else(|| self.incomplete("meta"))?;
        Ok((output, meta))
    }

    /// Heading used when printing this submission's report
    pub fn heading(&self) -> String {
        format!("{} -> {}", self.subtask.task_label(), self.label)
    }

    fn incomplete(&self, missing: &'static str) -> CheckerError {
        CheckerError::IncompleteSubmission {
            label: self.label.clone(),
            missing,
        }
    }
}

/// Opened submission package
pub struct SubmissionPackage<R> {
    archive: ZipArchive<R>,
    submissions: Vec<PackagedSubmission>,
    notices: ValidationReport,
}

impl SubmissionPackage<File> {
    /// Open a package from disk
    pub fn open(path: &Path) -> CheckerResult<Self> {
        if !path.exists() {
            return Err(CheckerError::FileNotFound(path.to_path_buf()));
        }
        let file = File::open(path).map_err(|e| CheckerError::io(path, e))?;
        Self::from_reader(file)
    }
}

impl<R: Read + Seek> SubmissionPackage<R> {
    /// Read the archive directory, verify entries and discover submissions
    pub fn from_reader(reader: R) -> CheckerResult<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut notices = ValidationReport::new();

        if !find_bad_entries(&mut archive).is_empty() {
            notices.warning(Category::Zip, "Bad files found in ZIP package.");
        }

        let mut found: BTreeMap<(Subtask, String), PackagedSubmission> = BTreeMap::new();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();

        for name in names {
            if name.ends_with('/') || !name.contains(TASK_MARKER) || name.contains(DOCUMENT_MARKER) {
                continue;
            }

            let directories: Vec<&str> = name.split('/').collect();
            let directories = &directories[..directories.len() - 1];
            let Some(label) = directories.get(LABEL_DIR_DEPTH) else {
                notices.warning(
                    Category::Zip,
                    format!("Possibly wrongly formatted filename [{name}]"),
                );
                continue;
            };

            let token = label.split('_').nth(2).unwrap_or_default();
            let Some(subtask) = Subtask::from_task_label(token) else {
                warn!(entry = %name, token, "Unknown task indicator");
                notices.warning(
                    Category::Zip,
                    format!("Unknown task indicator [{token}] in [{name}]"),
                );
                continue;
            };

            let submission = found
                .entry((subtask, label.to_string()))
                .or_insert_with(|| PackagedSubmission::new(subtask, label.to_string()));

            if name.contains(OUTPUT_MARKER) {
                submission.output_entry = Some(name.clone());
            } else if name.contains(META_MARKER) {
                submission.meta_entry = Some(name.clone());
            } else {
                notices.warning(
                    Category::Zip,
                    format!("Possibly wrongly formatted filename [{name}]"),
                );
            }
        }

        let submissions: Vec<PackagedSubmission> = found.into_values().collect();
        debug!(
            entries = archive.len(),
            submissions = submissions.len(),
            "Package scanned"
        );

        Ok(Self {
            archive,
            submissions,
            notices,
        })
    }

    /// Submissions grouped by subtask, labels in sorted order
    pub fn submissions(&self) -> &[PackagedSubmission] {
        &self.submissions
    }

    /// Uncounted notices raised while scanning the archive
    pub fn notices(&self) -> &ValidationReport {
        &self.notices
    }

    /// Read one archive entry as UTF-8 text
    pub fn read_entry(&mut self, name: &str) -> CheckerResult<String> {
        let mut entry = self.archive.by_name(name)?;
        let mut content = String::new();
        entry
            .read_to_string(&mut content)
            .map_err(|e| CheckerError::Archive(format!("Failed to read [{name}]: {e}")))?;
        Ok(content)
    }

    /// Read both files of a submission: `(output, meta)` contents
    pub fn read_submission(
        &mut self,
        submission: &PackagedSubmission,
    ) -> CheckerResult<(String, String)> {
        let (output, meta) = submission.entries()?;
        Ok((self.read_entry(output)?, self.read_entry(meta)?))
    }
}

/// Names of entries that fail to decompress or fail their CRC check
fn find_bad_entries<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Vec<String> {
    let mut bad = Vec::new();
    for index in 0..archive.len() {
        match archive.by_index(index) {
            Ok(mut entry) => {
                if entry.is_dir() {
                    continue;
                }
                let name = entry.name().to_string();
                if let Err(err) = std::io::copy(&mut entry, &mut std::io::sink()) {
                    warn!(entry = %name, error = %err, "Corrupt package entry");
                    bad.push(name);
                }
            }
            Err(err) => {
                warn!(index, error = %err, "Unreadable package entry");
                bad.push(format!("#{index}"));
            }
        }
    }
    bad
}
