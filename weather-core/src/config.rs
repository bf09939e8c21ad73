use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::error::ConfigError;

pub const ENV_API_KEY: &str = "API_KEY";
pub const ENV_API_URL: &str = "API_URL";
pub const ENV_DB_PATH: &str = "WEATHER_DB_PATH";
pub const ENV_RESET_ON_START: &str = "WEATHER_RESET_ON_START";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "WEATHER_REQUEST_TIMEOUT_SECS";
pub const ENV_MAX_CONCURRENCY: &str = "WEATHER_MAX_CONCURRENCY";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Configuration as stored on disk. Every field is optional; environment
/// variables override the file and [`Config::resolve`] fills in defaults.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// api_url = "https://api.openweathermap.org/data/2.5/weather"
/// reset_on_start = false
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub database_path: Option<PathBuf>,
    /// Wipe the city registry every time the process starts. Defaults to true.
    pub reset_on_start: Option<bool>,
    pub request_timeout_secs: Option<u64>,
    pub max_concurrency: Option<usize>,
}

/// Fully resolved startup configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: String,
    pub api_url: String,
    pub database_path: PathBuf,
    pub reset_on_start: bool,
    pub request_timeout: Duration,
    pub max_concurrency: usize,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        let dirs = project_dirs().ok_or(ConfigError::NoPlatformDir("config"))?;
        Self::load_from(&dirs.config_dir().join("config.toml"))
    }

    /// An unreadable or unparseable file is a configuration error, not a runtime one.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let unreadable = |reason: String| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason,
        };

        let contents = fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
        toml::from_str(&contents).map_err(|e| unreadable(e.to_string()))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = project_dirs().ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Overlay values found through `lookup` (normally `std::env::var`).
    /// Empty strings count as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_API_KEY) {
            self.api_key = Some(v);
        }
        if let Some(v) = get(ENV_API_URL) {
            self.api_url = Some(v);
        }
        if let Some(v) = get(ENV_DB_PATH) {
            self.database_path = Some(PathBuf::from(v));
        }
        if let Some(v) = get(ENV_RESET_ON_START) {
            self.reset_on_start = Some(parse_bool(ENV_RESET_ON_START, &v)?);
        }
        if let Some(v) = get(ENV_REQUEST_TIMEOUT_SECS) {
            self.request_timeout_secs = Some(parse_num(ENV_REQUEST_TIMEOUT_SECS, &v)?);
        }
        if let Some(v) = get(ENV_MAX_CONCURRENCY) {
            self.max_concurrency = Some(parse_num(ENV_MAX_CONCURRENCY, &v)?);
        }
        Ok(())
    }

    /// Validate and fill defaults. Missing API key or URL is fatal.
    pub fn resolve(self) -> Result<Settings, ConfigError> {
        let api_key = self.api_key.filter(|k| !k.is_empty()).ok_or(ConfigError::Missing("api_key"))?;
        let api_url = self.api_url.filter(|u| !u.is_empty()).ok_or(ConfigError::Missing("api_url"))?;

        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "api_url",
                reason: format!("`{api_url}` is not an http(s) URL"),
            });
        }

        let database_path = match self.database_path {
            Some(path) => path,
            None => default_database_path()?,
        };

        let request_timeout_secs = self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "request_timeout_secs",
                reason: "must be greater than zero".into(),
            });
        }

        let max_concurrency = self.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY);
        if max_concurrency == 0 {
            return Err(ConfigError::Invalid {
                key: "max_concurrency",
                reason: "must be greater than zero".into(),
            });
        }

        Ok(Settings {
            api_key,
            api_url,
            database_path,
            reset_on_start: self.reset_on_start.unwrap_or(true),
            request_timeout: Duration::from_secs(request_timeout_secs),
            max_concurrency,
        })
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "weather-task", "weather-cli")
}

fn default_database_path() -> Result<PathBuf, ConfigError> {
    let dirs = project_dirs().ok_or(ConfigError::NoPlatformDir("data"))?;
    Ok(dirs.data_dir().join("cities.db"))
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid { key, reason: format!("`{other}` is not a boolean") }),
    }
}

fn parse_num<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, reason: format!("`{value}` is not a number") })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    fn complete() -> Config {
        Config {
            api_key: Some("KEY".into()),
            api_url: Some("https://api.example.test/weather".into()),
            database_path: Some(PathBuf::from("/tmp/cities.db")),
            ..Config::default()
        }
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let cfg = Config { api_key: None, ..complete() };
        assert_eq!(cfg.resolve().unwrap_err(), ConfigError::Missing("api_key"));
    }

    #[test]
    fn missing_api_url_is_fatal() {
        let cfg = Config { api_url: Some(String::new()), ..complete() };
        assert_eq!(cfg.resolve().unwrap_err(), ConfigError::Missing("api_url"));
    }

    #[test]
    fn defaults_follow_reference_behaviour() {
        let settings = complete().resolve().unwrap();

        assert!(settings.reset_on_start);
        assert_eq!(settings.request_timeout, Duration::from_secs(10));
        assert_eq!(settings.max_concurrency, 4);
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = Config { api_key: Some("FILE_KEY".into()), ..complete() };
        cfg.apply_env(env(&[
            ("API_KEY", "ENV_KEY"),
            ("WEATHER_RESET_ON_START", "false"),
            ("WEATHER_MAX_CONCURRENCY", "8"),
            ("API_URL", ""),
        ]))
        .unwrap();

        let settings = cfg.resolve().unwrap();
        assert_eq!(settings.api_key, "ENV_KEY");
        assert_eq!(settings.api_url, "https://api.example.test/weather");
        assert!(!settings.reset_on_start);
        assert_eq!(settings.max_concurrency, 8);
    }

    #[test]
    fn invalid_env_values_are_rejected() {
        let mut cfg = complete();
        let err = cfg.apply_env(env(&[("WEATHER_RESET_ON_START", "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "WEATHER_RESET_ON_START", .. }));

        let err = cfg.apply_env(env(&[("WEATHER_REQUEST_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "WEATHER_REQUEST_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn non_http_url_and_zero_limits_are_invalid() {
        let cfg = Config { api_url: Some("ftp://nope".into()), ..complete() };
        assert!(matches!(cfg.resolve(), Err(ConfigError::Invalid { key: "api_url", .. })));

        let cfg = Config { max_concurrency: Some(0), ..complete() };
        assert!(matches!(cfg.resolve(), Err(ConfigError::Invalid { key: "max_concurrency", .. })));

        let cfg = Config { request_timeout_secs: Some(0), ..complete() };
        assert!(matches!(
            cfg.resolve(),
            Err(ConfigError::Invalid { key: "request_timeout_secs", .. })
        ));
    }

    #[test]
    fn save_and_load_roundtrip_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("config.toml");

        let cfg = Config { reset_on_start: Some(false), ..complete() };
        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"unterminated\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Unreadable { .. }), "got {err:?}");

        fs::write(&path, "reset_on_start = \"sometimes\"\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Unreadable { .. })));
    }

    #[test]
    fn load_missing_file_gives_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }
}
