//! # Ephemeris environment settings
//!
//! This module defines [`EphemerisConfig`](crate::env_state::EphemerisConfig), the settings
//! shared by the remote transport and the arbitration layer:
//!
//! - the **Horizons endpoint** queried by [`HorizonsClient`](crate::horizons::client::HorizonsClient),
//! - the **observer code** sent with every request and used in cache keys,
//! - the **request timeout** bounding each remote fetch,
//! - the **cache TTL** after which a remote answer is fetched again.
//!
//! ## Structure
//!
//! ```text
//! EphemerisConfig
//! ├── api_url          (String)
//! ├── observer_code    (String, default 500@399)
//! ├── request_timeout  (std::time::Duration, default 10 s)
//! └── cache_ttl        (hifitime::Duration, default 1 h)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use planetpos::env_state::EphemerisConfig;
//!
//! // stock settings
//! let config = EphemerisConfig::default();
//!
//! // stock settings overridden by PLANETPOS_* environment variables
//! let config = EphemerisConfig::from_env().unwrap();
//! ```
//!
//! ## Environment variables
//!
//! | variable                   | field             |
//! |----------------------------|-------------------|
//! | `PLANETPOS_HORIZONS_URL`   | `api_url`         |
//! | `PLANETPOS_OBSERVER`       | `observer_code`   |
//! | `PLANETPOS_TIMEOUT_SECS`   | `request_timeout` |
//! | `PLANETPOS_CACHE_TTL_SECS` | `cache_ttl`       |
use std::time::Duration;

use crate::{
    constants::{
        DEFAULT_CACHE_TTL_SECS, DEFAULT_TIMEOUT_SECS, GEOCENTER_OBSERVER, HORIZONS_API_URL,
    },
    planet_errors::PlanetError,
};

pub const ENV_HORIZONS_URL: &str = "PLANETPOS_HORIZONS_URL";
pub const ENV_OBSERVER: &str = "PLANETPOS_OBSERVER";
pub const ENV_TIMEOUT_SECS: &str = "PLANETPOS_TIMEOUT_SECS";
pub const ENV_CACHE_TTL_SECS: &str = "PLANETPOS_CACHE_TTL_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisConfig {
    pub api_url: String,
    pub observer_code: String,
    pub request_timeout: Duration,
    pub cache_ttl: hifitime::Duration,
}

impl Default for EphemerisConfig {
    fn default() -> Self {
        EphemerisConfig {
            api_url: HORIZONS_API_URL.into(),
            observer_code: GEOCENTER_OBSERVER.into(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_ttl: hifitime::Duration::from_seconds(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl EphemerisConfig {
    /// Stock settings overridden by the `PLANETPOS_*` environment variables.
    pub fn from_env() -> Result<Self, PlanetError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Stock settings overridden by whatever `lookup` returns for each variable name.
    ///
    /// Return
    /// ----------
    /// * the settings, or [`PlanetError::InvalidConfig`] if a numeric variable does not
    ///   hold a positive number
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PlanetError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = EphemerisConfig::default();

        if let Some(url) = lookup(ENV_HORIZONS_URL) {
            config.api_url = url;
        }
        if let Some(observer) = lookup(ENV_OBSERVER) {
            config.observer_code = observer;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.request_timeout = Duration::from_secs_f64(positive_seconds(ENV_TIMEOUT_SECS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_CACHE_TTL_SECS) {
            config.cache_ttl = hifitime::Duration::from_seconds(positive_seconds(ENV_CACHE_TTL_SECS, &raw)?);
        }

        Ok(config)
    }
}

fn positive_seconds(name: &str, raw: &str) -> Result<f64, PlanetError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(PlanetError::InvalidConfig(format!(
            "{name} must be a positive number of seconds, got '{raw}'"
        ))),
    }
}

#[cfg(test)]
mod env_state_test {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = EphemerisConfig::default();
        assert_eq!(config.api_url, "https://ssd.jpl.nasa.gov/api/horizons.api");
        assert_eq!(config.observer_code, "500@399");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.cache_ttl, hifitime::Duration::from_seconds(3600.0));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_HORIZONS_URL, "http://localhost:8080/api"),
            (ENV_OBSERVER, "675@399"),
            (ENV_TIMEOUT_SECS, "12.5"),
            (ENV_CACHE_TTL_SECS, "60"),
        ]);
        let config =
            EphemerisConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();

        assert_eq!(config.api_url, "http://localhost:8080/api");
        assert_eq!(config.observer_code, "675@399");
        assert_eq!(config.request_timeout, Duration::from_millis(12_500));
        assert_eq!(config.cache_ttl, hifitime::Duration::from_seconds(60.0));
    }

    #[test]
    fn test_invalid_numbers() {
        let bad_timeout = EphemerisConfig::from_lookup(|name| {
            (name == ENV_TIMEOUT_SECS).then(|| "ten".to_string())
        });
        assert!(matches!(bad_timeout, Err(PlanetError::InvalidConfig(_))));

        let zero_ttl = EphemerisConfig::from_lookup(|name| {
            (name == ENV_CACHE_TTL_SECS).then(|| "0".to_string())
        });
        assert!(matches!(zero_ttl, Err(PlanetError::InvalidConfig(_))));
    }
}
