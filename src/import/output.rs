//! Tab-separated system output decoding

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{CheckerError, CheckerResult};
use crate::models::OutputTable;

const DELIMITER: u8 = b'\t';

/// Decoder for `LABEL.output.csv` files
///
/// Rows may have any width; width is a validation concern, not a decoding
/// one. The first record is the header.
pub struct OutputTableImporter {
    file: String,
}

impl OutputTableImporter {
    /// Create an importer; `file` names the source in error messages
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into() }
    }

    pub fn parse(&self, content: &str) -> CheckerResult<OutputTable> {
        let mut reader = ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut records = reader.records();
        let header = match records.next() {
            Some(record) => record_cells(record.map_err(|e| self.parse_error(e))?),
            None => {
                return Err(CheckerError::OutputParse {
                    file: self.file.clone(),
                    message: "file is empty".to_string(),
                });
            }
        };

        let rows = records
            .map(|record| record.map(record_cells).map_err(|e| self.parse_error(e)))
            .collect::<CheckerResult<Vec<_>>>()?;

        debug!(file = %self.file, columns = header.len(), rows = rows.len(), "Output table decoded");
        Ok(OutputTable::new(header, rows))
    }

    fn parse_error(&self, err: csv::Error) -> CheckerError {
        CheckerError::OutputParse {
            file: self.file.clone(),
            message: err.to_string(),
        }
    }
}

fn record_cells(record: csv::StringRecord) -> Vec<String> {
    record.iter().map(str::to_string).collect()
}
