use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::warn;
use weather_core::{
    Aggregator, CityRegistry, Config, InitPolicy, Settings, SqliteCityStore, SystemClock,
    provider_from_settings,
};

use crate::{render, session};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Watch live weather for a list of cities")]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the provider API key and base URL in the config file.
    Configure,

    /// Interactive watchlist: list, add and remove cities until you quit.
    Session,

    /// Validate a city with the provider and add it to the watchlist.
    Add {
        /// City name as the provider knows it, e.g. "Paris".
        city: String,
    },

    /// Remove a city from the watchlist.
    Remove { city: String },

    /// Show current weather for every watched city.
    List,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => session::configure(),
            Command::Session => session::run(&open_watchlist(false)?).await,
            Command::Add { city } => {
                let aggregator = open_watchlist(true)?;
                match aggregator.add_city(&city).await {
                    Ok(()) => {
                        println!("Added {city}.");
                        Ok(())
                    }
                    Err(err) => {
                        let message = err.user_message();
                        Err(user_facing(err, message))
                    }
                }
            }
            Command::Remove { city } => {
                let aggregator = open_watchlist(true)?;
                match aggregator.remove_city(&city) {
                    Ok(()) => {
                        println!("Removed {city}.");
                        Ok(())
                    }
                    Err(err) => {
                        let message = err.user_message();
                        Err(user_facing(err, message))
                    }
                }
            }
            Command::List => {
                let aggregator = open_watchlist(true)?;
                let listing = aggregator.list_cities().await.context("Failed to list cities")?;
                print!("{}", render::listing(&listing));
                Ok(())
            }
        }
    }
}

/// Wrap `err` so the binary prints `message` once, followed by its cause.
fn user_facing<E>(err: E, message: String) -> anyhow::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    anyhow::Error::new(err).context(message)
}

/// Resolve configuration and initialise the registry. Runs once per process.
fn open_watchlist(one_shot: bool) -> anyhow::Result<Aggregator> {
    let settings = resolve_settings()?;
    if one_shot && settings.reset_on_start {
        warn!(
            "reset_on_start is enabled, so the watchlist is emptied on every run; \
             set `reset_on_start = false` to keep cities between commands"
        );
    }
    build_aggregator(&settings)
}

/// File config overlaid with the environment. Errors here are fatal.
fn resolve_settings() -> anyhow::Result<Settings> {
    let mut config = Config::load()?;
    config.apply_env(|key| std::env::var(key).ok())?;
    Ok(config.resolve()?)
}

fn build_aggregator(settings: &Settings) -> anyhow::Result<Aggregator> {
    let store = SqliteCityStore::open(&settings.database_path).with_context(|| {
        format!("Failed to open city database: {}", settings.database_path.display())
    })?;

    let registry = CityRegistry::open(
        Arc::new(store),
        InitPolicy::from_reset_flag(settings.reset_on_start),
    )
    .context("Failed to initialise city registry")?;

    Ok(Aggregator::new(
        registry,
        provider_from_settings(settings),
        Arc::new(SystemClock),
        settings.request_timeout,
        settings.max_concurrency,
    ))
}
