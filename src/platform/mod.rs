//! Platform specific process table readers
//!
//! Each backend turns the OS process table into plain [`ProcessRecord`]s.
//! Records that can not be read are counted and dropped here, so the
//! snapshot layer never sees a half-read process.

use crate::core::models::ProcessRecord;
use thiserror::Error;

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub use unix::read_process_table;
#[cfg(windows)]
pub use windows::read_process_table;

/// Why a single process was left out of the snapshot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Permission denied accessing process: {0}")]
    PermissionDenied(u32),
    #[error("Process exited while being read: {0}")]
    Vanished(u32),
    #[error("Failed to read process {pid}: {message}")]
    Unreadable { pid: u32, message: String },
}

impl RecordError {
    pub fn pid(&self) -> u32 {
        match self {
            RecordError::PermissionDenied(pid) | RecordError::Vanished(pid) => *pid,
            RecordError::Unreadable { pid, .. } => *pid,
        }
    }
}

/// Raw result of walking the process table
#[derive(Debug, Default)]
pub struct TableCapture {
    pub records: Vec<ProcessRecord>,
    /// Processes that were enumerated but could not be read
    pub skipped: usize,
}

impl TableCapture {
    /// Keep a readable record or count an unreadable one
    pub(crate) fn push(&mut self, result: Result<ProcessRecord, RecordError>) {
        match result {
            Ok(record) => self.records.push(record),
            Err(err) => {
                tracing::trace!(pid = err.pid(), error = %err, "Skipping process");
                self.skipped += 1;
            }
        }
    }
}

#[cfg(not(any(unix, windows)))]
pub fn read_process_table() -> Result<TableCapture, crate::core::snapshot::SnapshotError> {
    Err(crate::core::snapshot::SnapshotError::unavailable(
        "Unsupported platform for process table inspection",
    ))
}
