//! Core library for the `weather` watchlist.
//!
//! This crate defines:
//! - Configuration resolution (file + environment)
//! - The city registry and its storage backends
//! - Abstraction over the weather provider
//! - Enrichment of raw provider payloads into display snapshots
//! - The aggregator that serves list / add / remove
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod aggregator;
pub mod clock;
pub mod config;
pub mod enrich;
pub mod error;
pub mod model;
pub mod provider;
pub mod registry;
pub mod store;

pub use aggregator::Aggregator;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, Settings};
pub use enrich::enrich;
pub use error::{
    AddCityError, CityWeatherError, ConfigError, EnrichError, FetchError, RegistryError,
    RemoveCityError, StoreError,
};
pub use model::{CityRecord, CityWeather, DaytimePeriod, RawWeatherPayload, WeatherSnapshot};
pub use provider::{OpenWeatherProvider, WeatherProvider, provider_from_settings};
pub use registry::{CityRegistry, InitPolicy};
pub use store::{CityStore, MemoryCityStore, SqliteCityStore};
