//! Command handling around the core

pub mod parser;
pub mod tree;

pub use parser::{Cli, OutputFormat, TreeSettings};

use crate::error::{PgtreeError, PgtreeResult};
use crate::utils::config_paths::{default_config_file, UserConfig};

/// Load the user config for this invocation.
///
/// An explicit `--config` path must exist and parse. Problems with the
/// default file are not fatal: defaults are used and the error is handed
/// back so it can be logged once logging is set up.
pub fn resolve_config(cli: &Cli) -> PgtreeResult<(UserConfig, Option<PgtreeError>)> {
    if let Some(path) = &cli.config {
        return match UserConfig::load(path)? {
            Some(config) => Ok((config, None)),
            None => Err(PgtreeError::config(format!(
                "config file not found: {}",
                path.display()
            ))),
        };
    }

    let Some(path) = default_config_file() else {
        return Ok((UserConfig::default(), None));
    };
    match UserConfig::load(&path) {
        Ok(config) => Ok((config.unwrap_or_default(), None)),
        Err(err) => Ok((UserConfig::default(), Some(err))),
    }
}
