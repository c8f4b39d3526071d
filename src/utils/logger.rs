//! Logging setup
//!
//! Logs go to stderr so that stdout only ever carries rendered trees.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when neither an explicit level nor RUST_LOG is set
pub const DEFAULT_FILTER: &str = "warn";

/// Initialize the global subscriber
///
/// # Arguments
/// * `log_level` - filter directive (trace, debug, info, warn, error, or full
///   `RUST_LOG` syntax). When `None`, `RUST_LOG` is used, then [`DEFAULT_FILTER`].
///
/// # Examples
/// ```no_run
/// use pgtree::utils::logger::init_logger;
///
/// init_logger(Some("debug")).unwrap();
/// ```
pub fn init_logger(log_level: Option<&str>) -> Result<()> {
    let env_filter = build_filter(log_level)?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::debug!("Logger initialized");
    Ok(())
}

fn build_filter(log_level: Option<&str>) -> Result<EnvFilter> {
    Ok(match log_level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    })
}
