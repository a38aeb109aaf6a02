//! Durable, append-only session log.

use crate::models::SessionRecord;
use chrono::NaiveDate;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Column order of the on-disk log.
pub const FIELDS: [&str; 7] = [
    "date",
    "activity",
    "session_type",
    "duration_minutes",
    "start_time",
    "end_time",
    "completed",
];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session log {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("session log format error: {0}")]
    Csv(#[from] csv::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage for concluded intervals.
///
/// Appends take `&mut self`, so a store has one writer at a time; a
/// multi-threaded host shares it behind a `Mutex`.
pub trait SessionStore {
    /// Durably append one record after all earlier ones.
    fn append(&mut self, record: &SessionRecord) -> StoreResult<()>;

    /// All readable records dated `date`, in append order.
    fn records_on(&self, date: NaiveDate) -> StoreResult<Vec<SessionRecord>>;

    /// Completed focus intervals dated `date`.
    fn count_completed_focus(&self, date: NaiveDate) -> StoreResult<u32> {
        let records = self.records_on(date)?;
        Ok(records.iter().filter(|r| r.is_completed_focus()).count() as u32)
    }
}

/// CSV file with a header row, one row per record.
#[derive(Debug, Clone)]
pub struct CsvSessionLog {
    path: PathBuf,
}

impl CsvSessionLog {
    /// Open the log at `path`, creating it with a header if absent.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let log = Self { path: path.into() };
        if let Some(parent) = log.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| log.io_error(e))?;
        }
        log.ensure_header()?;
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Write the header if the file is missing or empty. Returns the open
    /// file positioned for appending.
    fn ensure_header(&self) -> StoreResult<fs::File> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        let len = file.metadata().map_err(|e| self.io_error(e))?.len();
        if len > 0 {
            return Ok(file);
        }

        debug!(path = %self.path.display(), "writing session log header");
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(FIELDS)?;
        writer.flush().map_err(|e| self.io_error(e))?;
        writer
            .into_inner()
            .map_err(|e| self.io_error(io::Error::new(e.error().kind(), e.to_string())))
    }
}

impl SessionStore for CsvSessionLog {
    fn append(&mut self, record: &SessionRecord) -> StoreResult<()> {
        let file = self.ensure_header()?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush().map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn records_on(&self, date: NaiveDate) -> StoreResult<Vec<SessionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;
        // The record iterator discards header errors, so read it up front.
        reader.headers()?;

        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<SessionRecord>().enumerate() {
            match row {
                Ok(record) if record.date == date => records.push(record),
                Ok(_) => {}
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    // Header is line 1.
                    warn!(line = index + 2, error = %e, "skipping malformed session row");
                }
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
pub use memory::MemoryStore;
