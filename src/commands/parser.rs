//! Command line interface
//!
//! Defined with clap derive. Flags only override; defaults come from the
//! user config file, then from built-in values.

use crate::core::matcher::MatchOptions;
use crate::core::render::RenderOptions;
use crate::utils::config_paths::UserConfig;
use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

/// Find processes by name and print their process trees
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "pgtree", version, about, long_about = None)]
pub struct Cli {
    /// Executable name, or part of it, to look for (case-sensitive)
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    pub pattern: String,

    /// Do not show command line arguments
    #[arg(short = 'A', long = "no-arguments")]
    pub no_arguments: bool,

    /// Do not show thread names
    #[arg(short = 'T', long = "no-long-names")]
    pub no_long_names: bool,

    /// Only match processes whose name is exactly PATTERN
    #[arg(short = 'x', long)]
    pub exact: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log filter (trace, debug, info, warn, error)
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Read defaults from this file instead of ~/.pgtree/config.json
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented ASCII trees separated by blank lines
    #[default]
    Text,
    /// JSON array with one entry per matched process
    Json,
}

impl Cli {
    pub fn parse_command() -> Self {
        Self::parse()
    }

    pub fn try_parse_command_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args)
    }

    /// Merge flags with the user config into the settings of one run
    pub fn resolve(&self, config: &UserConfig) -> TreeSettings {
        let mut match_options = MatchOptions::default().exact(self.exact || config.exact());
        match_options.exclude_pid = Some(std::process::id());

        TreeSettings {
            pattern: self.pattern.clone(),
            match_options,
            render_options: RenderOptions {
                show_arguments: !self.no_arguments && config.show_arguments(),
                show_long_names: !self.no_long_names && config.show_long_names(),
            },
            format: self.format,
        }
    }
}

/// Everything one run of the tree command needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSettings {
    pub pattern: String,
    pub match_options: MatchOptions,
    pub render_options: RenderOptions,
    pub format: OutputFormat,
}

impl TreeSettings {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            match_options: MatchOptions::default(),
            render_options: RenderOptions::default(),
            format: OutputFormat::Text,
        }
    }
}
