//! Use cases served to the outer layer: list with weather, add, remove.

use std::{sync::Arc, time::Duration};
use tokio::{sync::Semaphore, task::JoinHandle};
use tracing::{debug, warn};

use crate::{
    clock::Clock,
    enrich::enrich,
    error::{AddCityError, CityWeatherError, FetchError, RegistryError, RemoveCityError},
    model::{CityWeather, RawWeatherPayload, WeatherSnapshot},
    provider::WeatherProvider,
    registry::CityRegistry,
};

#[derive(Debug, Clone)]
pub struct Aggregator {
    registry: CityRegistry,
    provider: Arc<dyn WeatherProvider>,
    clock: Arc<dyn Clock>,
    deadline: Duration,
    max_concurrency: usize,
}

impl Aggregator {
    pub fn new(
        registry: CityRegistry,
        provider: Arc<dyn WeatherProvider>,
        clock: Arc<dyn Clock>,
        deadline: Duration,
        max_concurrency: usize,
    ) -> Self {
        Self { registry, provider, clock, deadline, max_concurrency: max_concurrency.max(1) }
    }

    pub fn registry(&self) -> &CityRegistry {
        &self.registry
    }

    /// Current weather for every watched city.
    ///
    /// Cities are fetched concurrently (at most `max_concurrency` at once) and
    /// returned in the order the registry listed them. A failure for one city
    /// is reported in its own entry and never affects the others.
    pub async fn list_cities(&self) -> Result<Vec<CityWeather>, RegistryError> {
        let records = self.registry.list()?;
        let permits = Arc::new(Semaphore::new(self.max_concurrency));

        let handles: Vec<(String, JoinHandle<Result<WeatherSnapshot, CityWeatherError>>)> = records
            .into_iter()
            .map(|record| {
                let permits = permits.clone();
                let provider = self.provider.clone();
                let clock = self.clock.clone();
                let deadline = self.deadline;
                let name = record.name.clone();

                let handle = tokio::spawn(async move {
                    // the semaphore is never closed
                    let _permit = permits.acquire_owned().await.ok();
                    city_weather(provider.as_ref(), clock.as_ref(), &name, deadline).await
                });
                (record.name, handle)
            })
            .collect();

        let mut out = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            let weather = match handle.await {
                Ok(result) => result,
                Err(join_err) => Err(CityWeatherError::Network(FetchError::Network(format!(
                    "weather task failed: {join_err}"
                )))),
            };

            if let Err(err) = &weather {
                warn!(city = %name, error = %err, "could not load weather");
            }
            out.push(CityWeather { name, weather });
        }

        Ok(out)
    }

    /// Add `name` after the provider confirms it exists.
    pub async fn add_city(&self, name: &str) -> Result<(), AddCityError> {
        if self.registry.contains(name)? {
            return Err(AddCityError::AlreadyExists(name.to_string()));
        }

        match fetch_with_deadline(self.provider.as_ref(), name, self.deadline).await {
            Ok(_) => {}
            Err(FetchError::CityNotFound(_)) => {
                return Err(AddCityError::CityNotFound(name.to_string()));
            }
            Err(err) => return Err(AddCityError::Network(err)),
        }

        // a concurrent add of the same name is rejected by the store here
        self.registry.add(name)?;
        Ok(())
    }

    pub fn remove_city(&self, name: &str) -> Result<(), RemoveCityError> {
        Ok(self.registry.remove(name)?)
    }
}

async fn city_weather(
    provider: &dyn WeatherProvider,
    clock: &dyn Clock,
    city: &str,
    deadline: Duration,
) -> Result<WeatherSnapshot, CityWeatherError> {
    let payload = fetch_with_deadline(provider, city, deadline).await?;
    Ok(enrich(&payload, clock.now())?)
}

async fn fetch_with_deadline(
    provider: &dyn WeatherProvider,
    city: &str,
    deadline: Duration,
) -> Result<RawWeatherPayload, FetchError> {
    debug!(city, ?deadline, "fetching weather");
    match tokio::time::timeout(deadline, provider.fetch(city)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(deadline)),
    }
}
