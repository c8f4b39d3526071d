//! Name based process lookup

use crate::core::snapshot::ProcessSnapshot;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("Pattern cannot be empty")]
    EmptyPattern,
    #[error("no process matching '{pattern}' found")]
    NoMatches { pattern: String },
}

/// How a pattern is compared against executable names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Name contains the pattern
    #[default]
    Substring,
    /// Name equals the pattern
    Exact,
}

impl MatchMode {
    pub fn matches(self, name: &str, pattern: &str) -> bool {
        match self {
            MatchMode::Substring => name.contains(pattern),
            MatchMode::Exact => name == pattern,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    pub mode: MatchMode,
    /// Pid never reported, typically the caller's own process
    pub exclude_pid: Option<u32>,
}

impl MatchOptions {
    pub fn exact(mut self, exact: bool) -> Self {
        self.mode = if exact {
            MatchMode::Exact
        } else {
            MatchMode::Substring
        };
        self
    }

    pub fn excluding(mut self, pid: u32) -> Self {
        self.exclude_pid = Some(pid);
        self
    }
}

/// Ordered, duplicate free list of matched pids
pub type MatchSet = Vec<u32>;

/// Find every process whose executable name matches `pattern`.
///
/// Comparison is case-sensitive. Pids come back in snapshot discovery order.
pub fn find_matches(
    snapshot: &ProcessSnapshot,
    pattern: &str,
    options: MatchOptions,
) -> Result<MatchSet, MatchError> {
    if pattern.is_empty() {
        return Err(MatchError::EmptyPattern);
    }

    // snapshot pids are unique keys, so no dedup pass is needed
    let matches: MatchSet = snapshot
        .iter()
        .filter(|record| Some(record.pid) != options.exclude_pid)
        .filter(|record| options.mode.matches(&record.name, pattern))
        .map(|record| record.pid)
        .collect();

    if matches.is_empty() {
        return Err(MatchError::NoMatches {
            pattern: pattern.to_string(),
        });
    }

    tracing::debug!(pattern, count = matches.len(), "Matched processes");
    Ok(matches)
}
