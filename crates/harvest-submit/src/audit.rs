//! Append-only submission log.
//!
//! One `;`-separated row per attempt: `timestamp;code;message`, UTF-8,
//! newline-terminated. The file is opened for each append and released
//! before the call returns; nothing is ever rewritten or rotated.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use harvest_model::{Code, SubmissionRecord, TIMESTAMP_FORMAT};
use tracing::debug;

use crate::error::AuditError;

const DELIMITER: u8 = b';';

/// Handle on the audit log path.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record and flush it to disk.
    pub fn append(&self, record: &SubmissionRecord) -> Result<(), AuditError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);
        writer
            .write_record([
                record.formatted_timestamp().as_str(),
                record.code.as_str(),
                record.message.as_str(),
            ])
            .map_err(|source| self.csv_error(source))?;
        let file: File = writer
            .into_inner()
            .map_err(|err| self.io_error(err.into_error()))?;
        file.sync_data().map_err(|source| self.io_error(source))?;
        debug!(path = %self.path.display(), code = %record.code, "audit row written");
        Ok(())
    }

    /// Read every record back, oldest first. A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<SubmissionRecord>, AuditError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(self.io_error(source)),
        };
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut records = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let row = row.map_err(|source| self.csv_error(source))?;
            let line = index as u64 + 1;
            records.push(self.parse_row(&row, line)?);
        }
        Ok(records)
    }

    fn parse_row(&self, row: &csv::StringRecord, line: u64) -> Result<SubmissionRecord, AuditError> {
        let malformed = |reason: String| AuditError::Malformed {
            path: self.path.clone(),
            row: line,
            reason,
        };
        if row.len() != 3 {
            return Err(malformed(format!("expected 3 fields, found {}", row.len())));
        }
        let timestamp = NaiveDateTime::parse_from_str(&row[0], TIMESTAMP_FORMAT)
            .map_err(|err| malformed(format!("bad timestamp '{}': {err}", &row[0])))?;
        let code = Code::new(&row[1]).map_err(|err| malformed(err.to_string()))?;
        Ok(SubmissionRecord {
            timestamp,
            code,
            message: row[2].to_string(),
        })
    }

    fn io_error(&self, source: std::io::Error) -> AuditError {
        AuditError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> AuditError {
        AuditError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

