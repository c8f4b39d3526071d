//! Process tree reconstruction
//!
//! Rebuilds parent/child hierarchies from an immutable [`ProcessSnapshot`].
//! For every seed pid the upward walk finds the display root (the highest
//! ancestor still in the snapshot) and the downward walk rebuilds the full
//! descendant tree of that root.
//!
//! The process table is sampled racily, so parent links may dangle or even
//! loop. Dangling links end the upward walk; loops are cut with a visited
//! set and flagged on the node instead of failing the whole tree.

use crate::core::models::{SeedTree, TreeNode};
use crate::core::snapshot::ProcessSnapshot;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolve the display root of `pid`.
///
/// Returns `None` when `pid` is not in the snapshot. When the parent chain
/// loops, the smallest pid on the loop is used so that every member of the
/// loop resolves to the same root.
pub fn display_root(snapshot: &ProcessSnapshot, pid: u32) -> Option<u32> {
    if !snapshot.contains(pid) {
        return None;
    }

    let mut chain = vec![pid];
    let mut visited = HashSet::from([pid]);
    let mut current = pid;

    loop {
        let parent = match snapshot.get(current).and_then(|record| record.ppid) {
            Some(parent) if snapshot.contains(parent) => parent,
            // no parent, or the parent is outside the snapshot boundary
            _ => return Some(current),
        };

        if !visited.insert(parent) {
            debug!(pid, looped_at = parent, "Parent chain loops back on itself");
            let start = chain.iter().position(|p| *p == parent).unwrap_or(0);
            return chain[start..].iter().min().copied();
        }

        chain.push(parent);
        current = parent;
    }
}

/// Builds one tree per seed over a shared snapshot
#[derive(Debug, Clone, Copy)]
pub struct TreeBuilder<'a> {
    snapshot: &'a ProcessSnapshot,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(snapshot: &'a ProcessSnapshot) -> Self {
        Self { snapshot }
    }

    /// Build the tree of every seed, in seed order.
    ///
    /// Seeds sharing a display root share the same built tree. Seeds that
    /// are not in the snapshot are skipped.
    pub fn build(&self, seeds: &[u32]) -> Vec<SeedTree> {
        let mut resolved = Vec::with_capacity(seeds.len());
        let mut unique_roots = Vec::new();
        let mut seen_roots = HashSet::new();

        for &seed in seeds {
            let Some(root) = display_root(self.snapshot, seed) else {
                warn!(pid = seed, "Seed process is not in the snapshot, skipping");
                continue;
            };
            if seen_roots.insert(root) {
                unique_roots.push(root);
            }
            resolved.push((seed, root));
        }

        let trees = self.build_roots(&unique_roots);

        resolved
            .into_iter()
            .filter_map(|(seed, root)| {
                trees.get(&root).map(|tree| SeedTree {
                    seed,
                    root: Arc::clone(tree),
                })
            })
            .collect()
    }

    /// Build the full descendant tree below `root`.
    ///
    /// Depth first with an explicit stack of partially built nodes, so the
    /// depth of the process tree never touches the thread's call stack.
    pub fn build_root(&self, root: u32) -> Option<TreeNode> {
        let record = self.snapshot.get(root)?;
        let mut placed = HashSet::from([root]);
        let mut stack = vec![(TreeNode::new(Arc::clone(record)), 0usize)];

        loop {
            let (node, next) = stack.last_mut()?;
            let children = self.snapshot.children_of(node.pid());

            let Some(&child_pid) = children.get(*next) else {
                let (done, _) = stack.pop()?;
                match stack.last_mut() {
                    Some((parent, _)) => parent.children.push(done),
                    None => return Some(done),
                }
                continue;
            };
            *next += 1;

            if !placed.insert(child_pid) {
                debug!(
                    pid = node.pid(),
                    child = child_pid,
                    "Cycle detected, not descending into an already placed process"
                );
                node.cycle_truncated = true;
                continue;
            }
            if let Some(child) = self.snapshot.get(child_pid) {
                stack.push((TreeNode::new(Arc::clone(child)), 0));
            }
        }
    }

    fn build_chunk(&self, roots: &[u32]) -> Vec<(u32, Arc<TreeNode>)> {
        roots
            .iter()
            .filter_map(|&root| self.build_root(root).map(|tree| (root, Arc::new(tree))))
            .collect()
    }

    /// Build every distinct root, spreading the work over scoped threads
    /// when there is more than one.
    fn build_roots(&self, roots: &[u32]) -> HashMap<u32, Arc<TreeNode>> {
        let workers = worker_count(roots.len());
        if workers <= 1 {
            return self.build_chunk(roots).into_iter().collect();
        }

        let chunk_size = roots.len().div_ceil(workers);
        let built = crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = roots
                .chunks(chunk_size)
                .map(|chunk| (chunk, scope.spawn(move |_| self.build_chunk(chunk))))
                .collect();

            handles
                .into_iter()
                .flat_map(|(chunk, handle)| {
                    handle.join().unwrap_or_else(|_| {
                        warn!("Tree worker panicked, rebuilding its roots inline");
                        self.build_chunk(chunk)
                    })
                })
                .collect::<Vec<_>>()
        });

        match built {
            Ok(trees) => trees.into_iter().collect(),
            Err(_) => self.build_chunk(roots).into_iter().collect(),
        }
    }
}

fn worker_count(roots: usize) -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    roots.min(cpus)
}

/// Convenience wrapper around [`TreeBuilder::build`]
pub fn build_trees(snapshot: &ProcessSnapshot, seeds: &[u32]) -> Vec<SeedTree> {
    TreeBuilder::new(snapshot).build(seeds)
}
