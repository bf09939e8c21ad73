use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{error::FetchError, model::RawWeatherPayload};

use super::WeatherProvider;

/// OpenWeather "current weather" endpoint, queried in metric units.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self { api_key, base_url, http: Client::new() }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(&self, city: &str) -> Result<RawWeatherPayload, FetchError> {
        debug!(city, url = %self.base_url, "requesting current weather");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[("q", city), ("units", "metric"), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("failed to send request to OpenWeather: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            // the body is only used for the log line
            let body = res.text().await.unwrap_or_default();
            debug!(city, %status, body = %truncate_body(&body), "OpenWeather rejected city");
            return Err(FetchError::CityNotFound(city.to_string()));
        }

        let body = res
            .text()
            .await
            .map_err(|e| FetchError::Network(format!("failed to read OpenWeather response body: {e}")))?;

        serde_json::from_str(&body).map_err(|e| FetchError::MalformedResponse(e.to_string()))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
