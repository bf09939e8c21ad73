use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{config::Settings, error::FetchError, model::RawWeatherPayload};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// One outbound lookup of current weather by city name.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, city: &str) -> Result<RawWeatherPayload, FetchError>;
}

/// Construct the provider described by resolved settings.
pub fn provider_from_settings(settings: &Settings) -> Arc<dyn WeatherProvider> {
    Arc::new(OpenWeatherProvider::new(settings.api_key.clone(), settings.api_url.clone()))
}
