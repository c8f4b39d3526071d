use pgtree::commands::{resolve_config, tree, Cli};
use pgtree::utils::logger::init_logger;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_command();

    let (config, config_warning) = match resolve_config(&cli) {
        Ok(resolved) => resolved,
        Err(err) => {
            eprintln!("{}", err.user_message());
            return ExitCode::from(err.exit_code());
        }
    };

    let log_level = cli.log_level.as_deref().or(config.log_level.as_deref());
    if let Err(err) = init_logger(log_level) {
        eprintln!("Failed to initialize logging: {err}");
    }
    if let Some(warning) = config_warning {
        tracing::warn!(error = %warning, "Ignoring user config file, using defaults");
    }

    let settings = cli.resolve(&config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match tree::run(&settings, &mut out) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(category = %err.category(), fatal = err.is_fatal(), error = ?err, "Tree command failed");
            eprintln!("{}", err.user_message());
            ExitCode::from(err.exit_code())
        }
    }
}
