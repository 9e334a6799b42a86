//! Provider credentials and planner options.
//!
//! Both read from environment variables. The `from_lookup` constructors take
//! any key lookup so callers (and tests) can supply values from elsewhere.

use crate::error::ConfigError;

pub const API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";
pub const BASE_URL_VAR: &str = "GOOGLE_MAPS_BASE_URL";
pub const TIMEOUT_VAR: &str = "GOOGLE_MAPS_TIMEOUT_SECS";
pub const CAPACITY_VAR: &str = "TRIP_PLANNER_DEFAULT_CAPACITY";
pub const WORKERS_VAR: &str = "TRIP_PLANNER_WORKERS";
pub const CACHE_VAR: &str = "TRIP_PLANNER_GEOCODE_CACHE";

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";
pub const DEFAULT_VEHICLE_CAPACITY: u32 = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleMapsConfig {
    pub base_url: String,
    pub api_key: String,
    /// `None` keeps the HTTP client's default.
    pub timeout_secs: Option<u64>,
}

impl GoogleMapsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout_secs: None,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Missing or blank credentials are fatal.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingCredentials(API_KEY_VAR))?;

        let base_url = lookup(BASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = lookup(TIMEOUT_VAR)
            .map(|value| parse(TIMEOUT_VAR, &value))
            .transpose()?;

        Ok(Self {
            base_url,
            api_key,
            timeout_secs,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerOptions {
    /// Used when a request does not name a capacity.
    pub default_vehicle_capacity: u32,
    /// Groups routed concurrently. 1 routes them one after another.
    pub workers: usize,
    pub cache_geocodes: bool,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            default_vehicle_capacity: DEFAULT_VEHICLE_CAPACITY,
            workers: 1,
            cache_geocodes: true,
        }
    }
}

impl PlannerOptions {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let default_vehicle_capacity = match lookup(CAPACITY_VAR) {
            Some(value) => positive(CAPACITY_VAR, &value)?,
            None => defaults.default_vehicle_capacity,
        };
        let workers = match lookup(WORKERS_VAR) {
            Some(value) => positive(WORKERS_VAR, &value)?,
            None => defaults.workers,
        };
        let cache_geocodes = match lookup(CACHE_VAR) {
            Some(value) => parse_flag(CACHE_VAR, &value)?,
            None => defaults.cache_geocodes,
        };

        Ok(Self {
            default_vehicle_capacity,
            workers,
            cache_geocodes,
        })
    }
}

fn parse<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
    })
}

fn positive<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let parsed: T = parse(var, value)?;
    if parsed > T::default() {
        Ok(parsed)
    } else {
        Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        })
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        }),
    }
}
