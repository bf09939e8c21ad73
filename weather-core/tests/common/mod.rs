//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Barrier;
use weather_core::error::StoreError;
use weather_core::model::{RawCondition, RawMain};
use weather_core::{
    Aggregator, CityRegistry, CityStore, FetchError, FixedClock, InitPolicy, MemoryCityStore,
    RawWeatherPayload, WeatherProvider,
};

/// What the scripted provider answers for a given city.
#[derive(Debug, Clone)]
pub enum Reply {
    Weather(RawWeatherPayload),
    NotFound,
    NetworkDown,
    /// Answer after a delay.
    Delayed(Duration, Box<Reply>),
}

/// Provider that answers from a fixed table and counts calls.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    replies: HashMap<String, Reply>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
    barrier: Option<Arc<Barrier>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, city: &str, reply: Reply) -> Self {
        self.replies.insert(city.to_string(), reply);
        self
    }

    /// Every fetch waits on this barrier before answering.
    pub fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherProvider for ScriptedProvider {
    async fn fetch(&self, city: &str) -> Result<RawWeatherPayload, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(city.to_string());

        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }

        let mut reply = self.replies.get(city).cloned().unwrap_or(Reply::NotFound);
        loop {
            match reply {
                Reply::Weather(payload) => return Ok(payload),
                Reply::NotFound => return Err(FetchError::CityNotFound(city.to_string())),
                Reply::NetworkDown => {
                    return Err(FetchError::Network("connection refused".to_string()));
                }
                Reply::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    reply = *inner;
                }
            }
        }
    }
}

/// Store that lists names in insertion order, so ordering can be asserted.
#[derive(Debug, Default)]
pub struct OrderedStore {
    names: Mutex<Vec<String>>,
}

impl CityStore for OrderedStore {
    fn insert(&self, name: &str) -> Result<(), StoreError> {
        let mut names = self.names.lock().unwrap();
        if names.iter().any(|n| n == name) {
            return Err(StoreError::UniqueViolation(name.to_string()));
        }
        names.push(name.to_string());
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<bool, StoreError> {
        let mut names = self.names.lock().unwrap();
        let before = names.len();
        names.retain(|n| n != name);
        Ok(names.len() != before)
    }

    fn contains(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.names.lock().unwrap().iter().any(|n| n == name))
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.names.lock().unwrap().clone())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.names.lock().unwrap().clear();
        Ok(())
    }
}

pub fn weather(name: &str, temp: f64, condition: &str, timezone: i64) -> Reply {
    Reply::Weather(RawWeatherPayload {
        name: Some(name.to_string()),
        main: Some(RawMain { temp: Some(temp) }),
        weather: vec![RawCondition { main: Some(condition.to_string()) }],
        timezone: Some(timezone),
    })
}

pub fn noon_utc() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
}

pub fn aggregator_with(
    store: Arc<dyn CityStore>,
    provider: Arc<ScriptedProvider>,
) -> Aggregator {
    let registry = CityRegistry::open(store, InitPolicy::Keep).unwrap();
    Aggregator::new(
        registry,
        provider,
        Arc::new(FixedClock(noon_utc())),
        Duration::from_secs(5),
        4,
    )
}

pub fn aggregator(provider: Arc<ScriptedProvider>) -> Aggregator {
    aggregator_with(Arc::new(MemoryCityStore::new()), provider)
}
