use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::CityWeatherError;

/// A watched city. The name is unique within the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CityRecord {
    pub name: String,
}

impl CityRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Coarse classification of a city's local hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaytimePeriod {
    Night,
    Day,
    EveningMorning,
}

impl DaytimePeriod {
    /// 22..=23 and 0..=3 are night, 10..=17 is day, the rest is evening/morning.
    pub fn from_local_hour(hour: u32) -> Self {
        match hour {
            22..=23 | 0..=3 => Self::Night,
            10..=17 => Self::Day,
            _ => Self::EveningMorning,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Night => "night",
            Self::Day => "day",
            Self::EveningMorning => "evening-morning",
        }
    }
}

impl fmt::Display for DaytimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display-ready weather for one city, computed on every listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city_name: String,
    pub temp_rounded_celsius: i64,
    pub condition_label: String,
    pub daytime_period: DaytimePeriod,
}

/// Provider response as received. Every field is optional so that an
/// incomplete payload is reported by the enricher rather than the decoder.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawWeatherPayload {
    pub name: Option<String>,
    #[serde(default)]
    pub main: Option<RawMain>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub weather: Vec<RawCondition>,
    /// Seconds east of UTC.
    pub timezone: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawMain {
    pub temp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCondition {
    pub main: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<RawCondition>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<RawCondition>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One entry of a listing, tagged with the registry name it was fetched for.
#[derive(Debug)]
pub struct CityWeather {
    pub name: String,
    pub weather: Result<WeatherSnapshot, CityWeatherError>,
}
