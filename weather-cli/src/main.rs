//! Binary crate for the `weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Resolving startup configuration (fatal if incomplete)
//! - Interactive configuration and the watchlist session
//! - Human-friendly output formatting

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use weather_core::ConfigError;

mod cli;
mod render;
mod session;

/// 1: configuration missing or invalid, 2: anything else.
const EXIT_CONFIG: u8 = 1;
const EXIT_RUNTIME: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cmd = cli::Cli::parse();
    init_logging(cmd.verbose);

    match cmd.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = exit_code_for(&err);
            if code == EXIT_CONFIG {
                eprintln!(
                    "Configuration error: {err:#}\nHint: run `weather configure` or set API_KEY and API_URL."
                );
            } else {
                eprintln!("Error: {err:#}");
            }
            ExitCode::from(code)
        }
    }
}

/// A `ConfigError` anywhere in the chain means startup never completed.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    if err.chain().any(|cause| cause.downcast_ref::<ConfigError>().is_some()) {
        EXIT_CONFIG
    } else {
        EXIT_RUNTIME
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "weather_core=debug,weather_cli=debug,info"
    } else {
        "weather_core=info,weather_cli=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
