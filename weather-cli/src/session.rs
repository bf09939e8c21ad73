use anyhow::Context;
use inquire::{InquireError, Password, Select, Text};
use std::fmt;
use weather_core::{Aggregator, Config};

use crate::render;

const DEFAULT_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Prompt for provider credentials and write them to the config file.
pub fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_url = Text::new("Weather API base URL:")
        .with_default(config.api_url.as_deref().unwrap_or(DEFAULT_API_URL))
        .prompt()
        .context("Failed to read API URL")?;

    config.api_key = Some(api_key.trim().to_string());
    config.api_url = Some(api_url.trim().to_string());
    config.save()?;

    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Action {
    List,
    Add,
    Remove,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::List => "Show weather",
            Self::Add => "Add a city",
            Self::Remove => "Remove a city",
            Self::Quit => "Quit",
        })
    }
}

/// Interactive loop until the user quits or presses Esc / Ctrl-C.
pub async fn run(aggregator: &Aggregator) -> anyhow::Result<()> {
    let actions = vec![Action::List, Action::Add, Action::Remove, Action::Quit];

    loop {
        let action = match Select::new("What next?", actions.clone()).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read menu choice"),
        };

        match action {
            Action::List => {
                let listing = aggregator.list_cities().await.context("Failed to list cities")?;
                print!("{}", render::listing(&listing));
            }
            Action::Add => {
                let Some(city) = ask(Text::new("City name:").prompt())? else { continue };
                let city = city.trim();
                if city.is_empty() {
                    continue;
                }
                match aggregator.add_city(city).await {
                    Ok(()) => println!("Added {city}."),
                    Err(err) => println!("{}", err.user_message()),
                }
            }
            Action::Remove => {
                let mut names: Vec<String> =
                    aggregator.registry().list()?.into_iter().map(|r| r.name).collect();
                if names.is_empty() {
                    println!("No cities on the watchlist yet.");
                    continue;
                }
                names.sort();

                let Some(city) = ask(Select::new("Remove which city?", names).prompt())? else {
                    continue;
                };
                match aggregator.remove_city(&city) {
                    Ok(()) => println!("Removed {city}."),
                    Err(err) => println!("{}", err.user_message()),
                }
            }
            Action::Quit => break,
        }
    }

    Ok(())
}

/// Esc on a sub-prompt goes back to the menu.
fn ask<T>(answer: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match answer {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(e) => Err(e).context("Failed to read input"),
    }
}
