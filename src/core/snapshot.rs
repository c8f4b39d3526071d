//! Process table snapshot
//!
//! A [`ProcessSnapshot`] is captured once per invocation and never updated
//! afterwards. Everything downstream (matching, tree building, rendering)
//! works on this immutable view so that a racy process table can not produce
//! an inconsistent tree halfway through.
//!
//! Platform strategy:
//! - Linux/macOS: psutil for enumeration, `/proc/<pid>/task` for threads on Linux
//! - Windows: sysinfo, no thread names

use crate::core::models::ProcessRecord;
use crate::platform;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The process table itself could not be enumerated
    #[error("Process table unavailable: {reason}")]
    Unavailable {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl SnapshotError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        SnapshotError::Unavailable {
            reason: reason.into(),
            source: None,
        }
    }

    pub fn unavailable_with_source(
        reason: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SnapshotError::Unavailable {
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Immutable view of the process table
#[derive(Debug, Clone, Default)]
pub struct ProcessSnapshot {
    records: BTreeMap<u32, Arc<ProcessRecord>>,
    children: HashMap<u32, Vec<u32>>,
}

impl ProcessSnapshot {
    /// Capture every process visible to the current user.
    ///
    /// Processes that can not be read (permission denied, exited while being
    /// read) are left out. Only a failure to enumerate at all is an error.
    pub fn capture() -> Result<Self, SnapshotError> {
        let capture = platform::read_process_table()?;
        if capture.skipped > 0 {
            debug!(
                skipped = capture.skipped,
                "Some processes could not be read and were left out of the snapshot"
            );
        }
        let snapshot = Self::from_records(capture.records);
        debug!(processes = snapshot.len(), "Captured process snapshot");
        Ok(snapshot)
    }

    /// Build a snapshot from already collected records.
    ///
    /// When a pid appears twice the later record wins.
    pub fn from_records(records: impl IntoIterator<Item = ProcessRecord>) -> Self {
        let mut map = BTreeMap::new();
        for record in records {
            let pid = record.pid;
            if map.insert(pid, Arc::new(record)).is_some() {
                warn!(pid, "Duplicate process record in snapshot, keeping the latest");
            }
        }

        let mut children: HashMap<u32, Vec<u32>> = HashMap::new();
        // BTreeMap iteration is ascending, so every child list comes out sorted
        for record in map.values() {
            if let Some(ppid) = record.ppid {
                children.entry(ppid).or_default().push(record.pid);
            }
        }

        Self {
            records: map,
            children,
        }
    }

    pub fn get(&self, pid: u32) -> Option<&Arc<ProcessRecord>> {
        self.records.get(&pid)
    }

    pub fn contains(&self, pid: u32) -> bool {
        self.records.contains_key(&pid)
    }

    /// Pids whose parent is `pid`, ascending. Includes `pid` itself for a
    /// self-parented record.
    pub fn children_of(&self, pid: u32) -> &[u32] {
        self.children.get(&pid).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Records in discovery order (ascending pid)
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ProcessRecord>> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProcessSnapshot {
        ProcessSnapshot::from_records(vec![
            ProcessRecord::new(4, Some(2), "worker"),
            ProcessRecord::new(1, None, "init"),
            ProcessRecord::new(3, Some(2), "worker"),
            ProcessRecord::new(2, Some(1), "shell"),
            ProcessRecord::new(9, Some(77), "orphan"),
        ])
    }

    #[test]
    fn iterates_in_ascending_pid_order() {
        let pids: Vec<u32> = sample().iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![1, 2, 3, 4, 9]);
    }

    #[test]
    fn children_are_indexed_and_sorted() {
        let snapshot = sample();
        assert_eq!(snapshot.children_of(2), &[3, 4]);
        assert_eq!(snapshot.children_of(1), &[2]);
        assert!(snapshot.children_of(3).is_empty());
        // dangling parent keeps its index entry even though 77 is absent
        assert_eq!(snapshot.children_of(77), &[9]);
        assert!(!snapshot.contains(77));
    }

    #[test]
    fn later_duplicate_wins() {
        let snapshot = ProcessSnapshot::from_records(vec![
            ProcessRecord::new(5, Some(1), "old"),
            ProcessRecord::new(5, Some(1), "new"),
        ]);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get(5).map(|r| r.name.as_str()), Some("new"));
        assert_eq!(snapshot.children_of(1), &[5]);
    }

    #[test]
    fn self_parented_record_is_its_own_child() {
        let snapshot = ProcessSnapshot::from_records(vec![ProcessRecord::new(7, Some(7), "loop")]);
        assert_eq!(snapshot.children_of(7), &[7]);
    }

    #[test]
    fn capture_sees_current_process() {
        let snapshot = ProcessSnapshot::capture().expect("process table should be readable");
        assert!(!snapshot.is_empty());
        assert!(snapshot.contains(std::process::id()));
    }
}
