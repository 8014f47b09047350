//! Formbind CLI - bind input documents onto templates from the command line
//!
//! Entry point of the `formbind` binary: binds a JSON or YAML document of
//! field values onto a JSON template and prints the resulting error model,
//! or prints the message codes resolved for an error code.
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands, OutputFormat};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    let cli = Cli::parse_args();

    // The configuration file also carries logging settings, so it is loaded
    // before the subscriber exists and its errors are reported afterwards.
    let config = Config::load_with_file(cli.config.as_deref());

    control::set_override(cli.use_color() && config.as_ref().map_or(true, |c| c.output.color));

    if let Err(e) = init_logging(&cli, config.as_ref().ok()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = config.and_then(|config| run(cli, config));

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = match cli.format {
        Some(format) => format,
        None => OutputFormat::from_name(&config.output.format).ok_or_else(|| {
            error::Error::config(format!("unknown output format '{}'", config.output.format))
        })?,
    };
    let output = OutputWriter::new(format, control::SHOULD_COLORIZE.should_colorize(), cli.quiet);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        format = ?output.format(),
        "Executing command"
    );

    match cli.command {
        Commands::Bind(args) => handlers::handle_bind(args, &config, &output),
        Commands::Codes(args) => handlers::handle_codes(args, &config, &output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: Option<&Config>) -> Result<()> {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);

    if let Some(config) = config {
        logging_config.merge_with_file(&config.logging, verbosity);
    }
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["formbind", "-v", "codes", "required"]);
        assert_eq!(cli.verbosity_level(), 1);
        assert!(cli.format.is_none());

        let cli = Cli::parse_from(["formbind", "--no-color", "codes", "required"]);
        assert!(!cli.use_color());
    }

    #[test]
    fn test_run_rejects_unknown_configured_format() {
        let cli = Cli::parse_from(["formbind", "codes", "required"]);
        let mut config = Config::default();
        config.output.format = "xml".into();

        let err = run(cli, config).unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }
}
