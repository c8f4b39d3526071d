//! Windows process table reader backed by sysinfo
//!
//! Parent links are passed through untouched, including self-parented
//! entries, so loop handling stays in the tree builder.

use super::TableCapture;
use crate::core::models::ProcessRecord;
use crate::core::snapshot::SnapshotError;
use sysinfo::{ProcessesToUpdate, System};

/// Walk the process table with a fresh sysinfo snapshot.
///
/// sysinfo does not expose thread names on Windows, so records carry none.
pub fn read_process_table() -> Result<TableCapture, SnapshotError> {
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::All, true);

    if system.processes().is_empty() {
        return Err(SnapshotError::unavailable(
            "sysinfo returned an empty process table",
        ));
    }

    let mut capture = TableCapture::default();
    for (pid, process) in system.processes() {
        let pid = pid.as_u32();
        let parent = process.parent().map(|p| p.as_u32());
        let cmdline: Vec<String> = process
            .cmd()
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        capture.push(Ok(ProcessRecord::new(
            pid,
            parent,
            process.name().to_string_lossy().into_owned(),
        )
        .with_cmdline(cmdline)));
    }
    Ok(capture)
}
