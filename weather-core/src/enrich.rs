//! Turns a raw provider payload into a [`WeatherSnapshot`].
//!
//! Pure: the current instant is passed in, nothing is fetched or stored.

use chrono::{DateTime, TimeDelta, Timelike, Utc};

use crate::{
    error::EnrichError,
    model::{DaytimePeriod, RawWeatherPayload, WeatherSnapshot},
};

pub fn enrich(
    payload: &RawWeatherPayload,
    now: DateTime<Utc>,
) -> Result<WeatherSnapshot, EnrichError> {
    let city_name = payload.name.clone().ok_or(EnrichError::MissingField("name"))?;

    let temp = payload
        .main
        .as_ref()
        .and_then(|m| m.temp)
        .ok_or(EnrichError::MissingField("main.temp"))?;

    let offset = payload.timezone.ok_or(EnrichError::MissingField("timezone"))?;

    let condition_label = payload
        .weather
        .first()
        .and_then(|w| w.main.clone())
        .ok_or(EnrichError::MissingCondition)?;

    Ok(WeatherSnapshot {
        city_name,
        temp_rounded_celsius: round_celsius(temp),
        condition_label,
        daytime_period: DaytimePeriod::from_local_hour(local_hour(now, offset)?),
    })
}

/// Nearest integer, halves rounded away from zero (20.5 -> 21, -0.5 -> -1).
pub fn round_celsius(temp: f64) -> i64 {
    temp.round() as i64
}

/// Hour of day at `now` shifted by `offset_secs` from UTC.
pub fn local_hour(now: DateTime<Utc>, offset_secs: i64) -> Result<u32, EnrichError> {
    let delta =
        TimeDelta::try_seconds(offset_secs).ok_or(EnrichError::OffsetOutOfRange(offset_secs))?;
    now.checked_add_signed(delta)
        .map(|local| local.hour())
        .ok_or(EnrichError::OffsetOutOfRange(offset_secs))
}
