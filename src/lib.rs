//! pgtree library
//!
//! Finds running processes by name and renders the full process tree around
//! each of them from a single, immutable snapshot of the process table.

pub mod commands;
pub mod core;
pub mod error;
pub mod platform;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::matcher::{find_matches, MatchError, MatchMode, MatchOptions, MatchSet};
pub use crate::core::models::{ProcessRecord, SeedTree, ThreadInfo, TreeNode};
pub use crate::core::process_tree::{build_trees, display_root, TreeBuilder};
pub use crate::core::render::{render, render_json, render_to_string, RenderOptions, CYCLE_MARKER};
pub use crate::core::snapshot::{ProcessSnapshot, SnapshotError};
pub use crate::error::{PgtreeError, PgtreeResult};
