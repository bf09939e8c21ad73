//! Error types for the city registry and weather pipeline.
//!
//! Each boundary gets its own enum so callers can match on exactly the
//! failures that boundary can produce.

use thiserror::Error;

/// Startup configuration could not be resolved. Fatal for the binary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration value `{0}`")]
    Missing(&'static str),

    #[error("Invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("Could not read config file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Could not determine platform {0} directory")]
    NoPlatformDir(&'static str),
}

/// Failures of the underlying persistence handle.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store's uniqueness constraint rejected a write.
    #[error("City `{0}` violates the unique name constraint")]
    UniqueViolation(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("City `{0}` is already in the registry")]
    DuplicateCity(String),

    #[error("City `{0}` is not in the registry")]
    NotFound(String),

    #[error(transparent)]
    Storage(StoreError),
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(name) => Self::DuplicateCity(name),
            other => Self::Storage(other),
        }
    }
}

/// Outbound provider call failed.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The provider answered with a non-success status.
    #[error("Provider could not resolve city `{0}`")]
    CityNotFound(String),

    #[error("Network error talking to weather provider: {0}")]
    Network(String),

    #[error("Weather provider did not answer within {0:?}")]
    Timeout(std::time::Duration),

    #[error("Weather provider returned an unreadable response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    /// Everything except `CityNotFound` is a transport-level failure.
    pub fn is_network(&self) -> bool {
        !matches!(self, Self::CityNotFound(_))
    }
}

/// The provider payload was incomplete.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnrichError {
    #[error("Weather payload is missing field `{0}`")]
    MissingField(&'static str),

    #[error("Weather payload has no condition entry")]
    MissingCondition,

    #[error("UTC offset of {0} seconds is out of range")]
    OffsetOutOfRange(i64),
}

#[derive(Error, Debug)]
pub enum AddCityError {
    #[error("City `{0}` has already been added")]
    AlreadyExists(String),

    #[error("City `{0}` does not exist")]
    CityNotFound(String),

    #[error(transparent)]
    Network(FetchError),

    #[error(transparent)]
    Storage(StoreError),
}

impl AddCityError {
    pub fn user_message(&self) -> String {
        match self {
            Self::AlreadyExists(_) => "The city has already been added to the list!".to_string(),
            Self::CityNotFound(_) => "The city doesn't exist!".to_string(),
            Self::Network(_) => {
                "Could not reach the weather service. Please try again later.".to_string()
            }
            Self::Storage(_) => "Local storage error".to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<RegistryError> for AddCityError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::DuplicateCity(name) => Self::AlreadyExists(name),
            // add never removes, but keep the mapping total
            RegistryError::NotFound(name) => Self::CityNotFound(name),
            RegistryError::Storage(e) => Self::Storage(e),
        }
    }
}

#[derive(Error, Debug)]
pub enum RemoveCityError {
    #[error("City `{0}` is not in the list")]
    NotFound(String),

    #[error(transparent)]
    Storage(StoreError),
}

impl RemoveCityError {
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(_) => "The city is not in the list!".to_string(),
            Self::Storage(_) => "Local storage error".to_string(),
        }
    }
}

impl From<RegistryError> for RemoveCityError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(name) => Self::NotFound(name),
            RegistryError::DuplicateCity(name) => {
                Self::Storage(StoreError::UniqueViolation(name))
            }
            RegistryError::Storage(e) => Self::Storage(e),
        }
    }
}

/// Per-city failure inside a listing. Never aborts the other cities.
#[derive(Error, Debug)]
pub enum CityWeatherError {
    #[error("City `{0}` could not be resolved by the provider")]
    CityNotFound(String),

    #[error(transparent)]
    Network(FetchError),

    #[error(transparent)]
    Enrich(#[from] EnrichError),
}

impl CityWeatherError {
    pub fn user_message(&self) -> String {
        match self {
            Self::CityNotFound(_) => "City not recognised by the weather service".to_string(),
            Self::Network(FetchError::Timeout(_)) => "Weather service timed out".to_string(),
            Self::Network(_) => "Weather unavailable. Check your connection.".to_string(),
            Self::Enrich(_) => "Weather service returned incomplete data".to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<FetchError> for CityWeatherError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::CityNotFound(name) => Self::CityNotFound(name),
            other => Self::Network(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn unique_violation_becomes_duplicate_city() {
        let err: RegistryError = StoreError::UniqueViolation("Paris".into()).into();
        assert!(matches!(err, RegistryError::DuplicateCity(ref n) if n == "Paris"));

        let err: AddCityError = err.into();
        assert!(matches!(err, AddCityError::AlreadyExists(ref n) if n == "Paris"));
    }

    #[test]
    fn timeout_is_a_network_kind() {
        assert!(FetchError::Timeout(Duration::from_secs(1)).is_network());
        assert!(FetchError::MalformedResponse("eof".into()).is_network());
        assert!(!FetchError::CityNotFound("X".into()).is_network());

        let err: CityWeatherError = FetchError::Timeout(Duration::from_secs(1)).into();
        assert!(err.is_retryable());
        assert!(err.user_message().contains("timed out"));
    }

    #[test]
    fn user_messages_per_kind() {
        assert!(AddCityError::AlreadyExists("A".into()).user_message().contains("already"));
        assert!(AddCityError::CityNotFound("A".into()).user_message().contains("doesn't exist"));
        assert!(RemoveCityError::NotFound("A".into()).user_message().contains("not in the list"));

        let err = AddCityError::Network(FetchError::Network("refused".into()));
        assert!(err.is_retryable());
        assert!(!AddCityError::CityNotFound("A".into()).is_retryable());
    }
}
