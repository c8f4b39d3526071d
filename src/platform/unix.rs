//! Unix process table reader
//!
//! psutil enumerates processes and reads parent, name and argv. Thread
//! names come straight from procfs on Linux.

use super::{RecordError, TableCapture};
use crate::core::models::{ProcessRecord, ThreadInfo};
use crate::core::snapshot::SnapshotError;
use psutil::process::{processes, Process, ProcessError};

impl From<ProcessError> for RecordError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::AccessDenied { pid } => RecordError::PermissionDenied(pid),
            ProcessError::NoSuchProcess { pid } | ProcessError::ZombieProcess { pid } => {
                RecordError::Vanished(pid)
            }
            ProcessError::PsutilError { pid, source } => RecordError::Unreadable {
                pid,
                message: source.to_string(),
            },
        }
    }
}

/// Walk the process table with psutil
pub fn read_process_table() -> Result<TableCapture, SnapshotError> {
    let entries = processes().map_err(|err| {
        SnapshotError::unavailable_with_source("failed to enumerate processes", err)
    })?;

    let mut capture = TableCapture::default();
    for entry in entries {
        capture.push(
            entry
                .map_err(RecordError::from)
                .and_then(|process| read_record(&process)),
        );
    }
    Ok(capture)
}

fn read_record(process: &Process) -> Result<ProcessRecord, RecordError> {
    let pid = process.pid();
    let ppid = process.ppid()?;
    let name = process.name()?;
    let cmdline = process.cmdline_vec()?.unwrap_or_default();

    Ok(ProcessRecord::new(pid, ppid, name)
        .with_cmdline(cmdline)
        .with_threads(read_threads(pid)))
}

/// Thread names from `/proc/<pid>/task/<tid>/comm`.
///
/// Best effort: a process whose task directory can not be listed simply has
/// no thread entries.
#[cfg(target_os = "linux")]
fn read_threads(pid: u32) -> Vec<ThreadInfo> {
    let task_dir = format!("/proc/{pid}/task");
    let Ok(entries) = std::fs::read_dir(&task_dir) else {
        return Vec::new();
    };

    entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let tid: u32 = entry.file_name().to_str()?.parse().ok()?;
            let comm = std::fs::read_to_string(entry.path().join("comm")).ok()?;
            Some(ThreadInfo::new(tid, comm.trim_end_matches('\n')))
        })
        .collect()
}

#[cfg(not(target_os = "linux"))]
fn read_threads(_pid: u32) -> Vec<ThreadInfo> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_denied_maps_to_permission_denied() {
        let err = RecordError::from(ProcessError::AccessDenied { pid: 42 });
        assert_eq!(err, RecordError::PermissionDenied(42));
    }

    #[test]
    fn missing_process_maps_to_vanished() {
        let err = RecordError::from(ProcessError::NoSuchProcess { pid: 7 });
        assert_eq!(err, RecordError::Vanished(7));
    }

    #[test]
    fn current_process_is_readable() {
        let current_pid = std::process::id();
        let process = Process::new(current_pid).expect("current process should exist");
        let record = read_record(&process).expect("current process should be readable");

        assert_eq!(record.pid, current_pid);
        assert!(!record.name.is_empty());
        assert!(!record.cmdline.is_empty());
        assert!(record.threads.iter().all(|t| t.tid != current_pid));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn reads_threads_of_current_process() {
        use std::sync::mpsc;

        let (ready_tx, ready_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let handle = std::thread::Builder::new()
            .name("pgtree-named".to_string())
            .spawn(move || {
                // the name is applied before this closure runs
                ready_tx.send(()).expect("signal ready");
                let _ = release_rx.recv();
            })
            .expect("spawn named thread");

        ready_rx.recv().expect("named thread started");
        let threads = read_threads(std::process::id());
        release_tx.send(()).expect("release named thread");
        handle.join().expect("named thread");

        assert!(threads.iter().any(|t| t.name == "pgtree-named"));
    }
}
