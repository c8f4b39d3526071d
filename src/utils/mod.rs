//! Ambient helpers: configuration file and logging setup

pub mod config_paths;
pub mod logger;
