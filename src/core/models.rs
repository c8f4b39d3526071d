//! Core data model
//!
//! Immutable process records as captured from the OS, and the tree nodes
//! built on top of them.

use serde::Serialize;
use std::sync::Arc;

/// Thread belonging to a process (a "long name" entry in the rendered tree)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ThreadInfo {
    pub tid: u32,
    pub name: String,
}

impl ThreadInfo {
    pub fn new(tid: u32, name: impl Into<String>) -> Self {
        Self {
            tid,
            name: name.into(),
        }
    }
}

/// One row of the process table at capture time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessRecord {
    /// Process ID
    pub pid: u32,
    /// Parent process ID, `None` for the root of the OS process tree
    pub ppid: Option<u32>,
    /// Executable short name
    pub name: String,
    /// Full argument vector, empty for kernel threads and unreadable processes
    pub cmdline: Vec<String>,
    /// Non-leader threads, sorted by tid
    pub threads: Vec<ThreadInfo>,
}

impl ProcessRecord {
    /// Create a record with no arguments and no threads.
    ///
    /// A parent id of `0` is treated as "no parent".
    pub fn new(pid: u32, ppid: Option<u32>, name: impl Into<String>) -> Self {
        Self {
            pid,
            ppid: ppid.filter(|parent| *parent != 0),
            name: name.into(),
            cmdline: Vec::new(),
            threads: Vec::new(),
        }
    }

    pub fn with_cmdline<I, S>(mut self, cmdline: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cmdline = cmdline.into_iter().map(Into::into).collect();
        self
    }

    /// Attach threads. The leader thread (`tid == pid`) is dropped and the
    /// rest are sorted by tid.
    pub fn with_threads(mut self, threads: impl IntoIterator<Item = ThreadInfo>) -> Self {
        let pid = self.pid;
        let mut threads: Vec<ThreadInfo> =
            threads.into_iter().filter(|thread| thread.tid != pid).collect();
        threads.sort_by_key(|thread| thread.tid);
        threads.dedup_by_key(|thread| thread.tid);
        self.threads = threads;
        self
    }

    /// Command line joined with single spaces
    pub fn command_line(&self) -> String {
        self.cmdline.join(" ")
    }

    pub fn is_self_parented(&self) -> bool {
        self.ppid == Some(self.pid)
    }
}

/// A process placed in a reconstructed tree
///
/// Traversals and drop use an explicit stack, so arbitrarily deep chains
/// never grow the call stack.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    #[serde(flatten)]
    pub record: Arc<ProcessRecord>,
    /// Set when one of this node's child edges led back to a process already
    /// placed in the tree and was therefore not followed
    pub cycle_truncated: bool,
    /// Children ordered by pid ascending
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(record: Arc<ProcessRecord>) -> Self {
        Self {
            record,
            cycle_truncated: false,
            children: Vec::new(),
        }
    }

    pub fn pid(&self) -> u32 {
        self.record.pid
    }

    /// Pre-order iterator over this subtree with the depth of each node
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(self, 0)],
        }
    }

    /// Number of nodes in this subtree, including itself
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    /// Find the node for `pid` in this subtree
    pub fn find(&self, pid: u32) -> Option<&TreeNode> {
        self.walk()
            .map(|(node, _)| node)
            .find(|node| node.pid() == pid)
    }

    /// Depth of `pid` below this node (0 for the node itself)
    pub fn depth_of(&self, pid: u32) -> Option<usize> {
        self.walk()
            .find(|(node, _)| node.pid() == pid)
            .map(|(_, depth)| depth)
    }

    /// Pids of this subtree in pre-order
    pub fn pids(&self) -> Vec<u32> {
        self.walk().map(|(node, _)| node.pid()).collect()
    }
}

impl Drop for TreeNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Pre-order walk returned by [`TreeNode::walk`]
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<(&'a TreeNode, usize)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (&'a TreeNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        Some((node, depth))
    }
}

/// The tree produced for one matched process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedTree {
    /// The matched process id
    pub seed: u32,
    /// Display root of the seed; shared between seeds with the same root
    #[serde(rename = "tree")]
    pub root: Arc<TreeNode>,
}
