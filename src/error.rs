//! Unified error handling for pgtree
//!
//! Component errors (snapshot, matching) are folded into [`PgtreeError`],
//! which knows how to present itself to the user and which exit code the
//! binary should return.

use crate::core::matcher::MatchError;
use crate::core::snapshot::SnapshotError;
use std::fmt;
use std::io;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum PgtreeError {
    /// The process table could not be enumerated at all
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// Pattern was empty or matched nothing
    #[error(transparent)]
    Match(#[from] MatchError),

    /// Configuration file problems
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Writing the rendered trees failed
    #[error("Output error: {0}")]
    Output(#[from] io::Error),
}

/// Error categories, used for exit codes and log fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    SnapshotUnavailable,
    NoMatches,
    Validation,
    Config,
    Output,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorCategory::SnapshotUnavailable => "snapshot_unavailable",
            ErrorCategory::NoMatches => "no_matches",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Config => "config",
            ErrorCategory::Output => "output",
        })
    }
}

impl PgtreeError {
    pub fn config(message: impl Into<String>) -> Self {
        PgtreeError::Config {
            message: message.into(),
            source: None,
        }
    }

    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PgtreeError::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            PgtreeError::Snapshot(_) => ErrorCategory::SnapshotUnavailable,
            PgtreeError::Match(MatchError::NoMatches { .. }) => ErrorCategory::NoMatches,
            PgtreeError::Match(MatchError::EmptyPattern) => ErrorCategory::Validation,
            PgtreeError::Config { .. } => ErrorCategory::Config,
            PgtreeError::Output(_) => ErrorCategory::Output,
        }
    }

    /// Only a missing process table is fatal; everything else is the caller's call
    pub fn is_fatal(&self) -> bool {
        matches!(self, PgtreeError::Snapshot(_))
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::NoMatches => 1,
            ErrorCategory::SnapshotUnavailable => 2,
            ErrorCategory::Validation | ErrorCategory::Config | ErrorCategory::Output => 3,
        }
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            PgtreeError::Snapshot(SnapshotError::Unavailable { reason, .. }) => {
                format!("Cannot read the process table: {}", reason)
            }
            PgtreeError::Match(err) => err.to_string(),
            PgtreeError::Config { message, .. } => format!("Configuration problem: {}", message),
            PgtreeError::Output(err) => format!("Failed to write output: {}", err),
        }
    }
}

/// Convenience result alias
pub type PgtreeResult<T> = Result<T, PgtreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_matches_and_unavailable_have_distinct_exit_codes() {
        let no_matches = PgtreeError::from(MatchError::NoMatches {
            pattern: "nginx".to_string(),
        });
        let unavailable = PgtreeError::from(SnapshotError::unavailable("/proc is not mounted"));

        assert_eq!(no_matches.exit_code(), 1);
        assert_eq!(unavailable.exit_code(), 2);
        assert!(unavailable.is_fatal());
        assert!(!no_matches.is_fatal());
        assert_ne!(no_matches.user_message(), unavailable.user_message());
    }

    #[test]
    fn user_message_mentions_pattern() {
        let err = PgtreeError::from(MatchError::NoMatches {
            pattern: "worker".to_string(),
        });
        assert_eq!(err.category(), ErrorCategory::NoMatches);
        assert_eq!(err.user_message(), "no process matching 'worker' found");
    }

    #[test]
    fn config_errors_keep_their_source() {
        let io_err = io::Error::new(io::ErrorKind::InvalidData, "bad json");
        let err = PgtreeError::config_with_source("invalid config file", io_err);
        assert_eq!(err.category(), ErrorCategory::Config);
        assert_eq!(err.exit_code(), 3);
        assert!(std::error::Error::source(&err).is_some());
    }
}
