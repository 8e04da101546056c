//! modpin CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use modpin::cli::{Cli, CommandDispatcher};
use modpin::ui::{OutputMode, TerminalUI, UserInterface};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
///
/// Logs always go to stderr; stdout carries the `key=value` result lines.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("modpin=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("modpin=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("modpin starting with args: {:?}", cli);

    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    let mut ui = if cli.no_color {
        TerminalUI::with_colors(output_mode, false)
    } else {
        TerminalUI::new(output_mode)
    };

    let dispatcher = CommandDispatcher::new(cli.project_root.clone(), cli.config.clone());

    match dispatcher.dispatch(&cli, &mut ui) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
