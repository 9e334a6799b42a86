//! Geocoding adapter with an optional address cache.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::GeocodeError;
use crate::model::GeocodeResult;
use crate::traits::Geocoder;

/// Resolves addresses through a [`Geocoder`], taking the first candidate.
///
/// Successful lookups are memoized by normalized address unless the cache
/// is disabled. Failures are never cached.
pub struct GeocodingService<G> {
    geocoder: G,
    cache: Option<Mutex<HashMap<String, GeocodeResult>>>,
}

impl<G: Geocoder> GeocodingService<G> {
    pub fn new(geocoder: G) -> Self {
        Self {
            geocoder,
            cache: Some(Mutex::new(HashMap::new())),
        }
    }

    /// One provider call per invocation.
    pub fn without_cache(geocoder: G) -> Self {
        Self {
            geocoder,
            cache: None,
        }
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    pub fn geocode(&self, address: &str) -> Result<GeocodeResult, GeocodeError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodeError::BlankAddress);
        }

        let key = normalize_address(address);
        if let Some(hit) = self.cached(&key) {
            debug!(address, "geocode cache hit");
            return Ok(hit);
        }

        debug!(address, "geocoding address");
        let result = self
            .geocoder
            .geocode(address)
            .map_err(GeocodeError::from)
            .and_then(|candidates| {
                candidates
                    .into_iter()
                    .next()
                    .ok_or(GeocodeError::NoCandidates)
            });

        match result {
            Ok(found) => {
                self.remember(key, &found);
                Ok(found)
            }
            Err(err) => {
                warn!(address, error = %err, "geocoding failed");
                Err(err)
            }
        }
    }

    fn cached(&self, key: &str) -> Option<GeocodeResult> {
        let cache = self.cache.as_ref()?;
        // Poisoning leaves the map intact.
        let entries = cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.get(key).cloned()
    }

    fn remember(&self, key: String, result: &GeocodeResult) {
        if let Some(cache) = &self.cache {
            let mut entries = cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            entries.insert(key, result.clone());
        }
    }
}

/// Cache key: lowercase, single-spaced.
pub fn normalize_address(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
