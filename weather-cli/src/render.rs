use chrono::Utc;
use std::fmt::Write;
use weather_core::{CityWeather, WeatherSnapshot};

pub fn snapshot_line(snapshot: &WeatherSnapshot) -> String {
    format!(
        "{:<20} {:>4}°C  {:<14} ({})",
        snapshot.city_name,
        snapshot.temp_rounded_celsius,
        snapshot.condition_label,
        snapshot.daytime_period
    )
}

pub fn listing(cities: &[CityWeather]) -> String {
    if cities.is_empty() {
        return "No cities on the watchlist yet.\n".to_string();
    }

    let mut out = format!("Weather as of {} UTC\n", Utc::now().format("%Y-%m-%d %H:%M"));
    for city in cities {
        let line = match &city.weather {
            Ok(snapshot) => snapshot_line(snapshot),
            Err(err) => format!("{:<20} {}", city.name, err.user_message()),
        };
        let _ = writeln!(out, "{line}");
    }
    out
}
