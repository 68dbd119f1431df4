//! Geocoding client: provider seam, HTTP adapter, retry policy, and cache.

use std::collections::HashMap;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use rayon::prelude::*;
use serde::Deserialize;

use crate::error::{Error, ProviderError, Result};
use crate::normalize::identity;

/// Resolves a free-text place name to a (lat, lng) pair.
///
/// The single seam to the external provider; tests substitute doubles here.
pub trait Geocoder {
    fn lookup(&self, name: &str) -> std::result::Result<(f64, f64), ProviderError>;
}

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

#[derive(Debug, Clone)]
pub struct GeocodeConfig {
    pub base_url: String,
    pub api_key: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl GeocodeConfig {
    /// Reads configuration from the environment.
    ///
    /// `GMAPS_KEY` is required. `GEOCODE_BASE_URL`,
    /// `GEOCODE_CONNECT_TIMEOUT_MS` and `GEOCODE_READ_TIMEOUT_MS` are
    /// optional with defaults of the Google endpoint, 5s and 10s.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GMAPS_KEY")
            .map_err(|_| Error::configuration("GMAPS_KEY is not set"))?;
        let base_url =
            std::env::var("GEOCODE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            base_url,
            api_key,
            connect_timeout: env_millis("GEOCODE_CONNECT_TIMEOUT_MS", 5_000)?,
            read_timeout: env_millis("GEOCODE_READ_TIMEOUT_MS", 10_000)?,
        })
    }
}

fn env_millis(var: &str, default_ms: u64) -> Result<Duration> {
    match std::env::var(var) {
        Ok(value) => value.parse::<u64>().map(Duration::from_millis).map_err(|_| {
            Error::configuration(format!(
                "{var} must be an integer millisecond count, got {value:?}"
            ))
        }),
        Err(_) => Ok(Duration::from_millis(default_ms)),
    }
}

/// Bounded retry schedule for transient provider failures.
///
/// Attempt numbering is 1-based. The first attempt is immediate; each
/// further attempt waits an exponentially growing delay capped at
/// `max_delay`. The schedule is a pure function of the attempt number, so it
/// composes with any execution model.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    /// Builds the policy from `GEOCODE_MAX_ATTEMPTS`, keeping default delays.
    pub fn from_env() -> Result<Self> {
        let mut policy = Self::default();
        if let Ok(value) = std::env::var("GEOCODE_MAX_ATTEMPTS") {
            policy.max_attempts = value
                .parse::<u32>()
                .ok()
                .filter(|&attempts| attempts >= 1)
                .ok_or_else(|| {
                    Error::configuration(format!(
                        "GEOCODE_MAX_ATTEMPTS must be a positive integer, got {value:?}"
                    ))
                })?;
        }
        Ok(policy)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait before the given attempt. The first attempt never waits.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let exp = (attempt - 2).min(16);
        self.base_delay.saturating_mul(1u32 << exp).min(self.max_delay)
    }
}

/// Process-wide cache of resolved coordinates, keyed by name identity.
///
/// Created once at startup and shared across requests; entries are never
/// invalidated since coordinates of named places do not change. Keys are
/// exact identity matches only, never approximate. A single coarse lock is
/// enough: writes are rare relative to reads.
#[derive(Debug, Default)]
pub struct GeocodeCache {
    entries: Mutex<HashMap<String, (f64, f64)>>,
}

impl GeocodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<(f64, f64)> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).copied())
    }

    pub fn insert(&self, key: String, coord: (f64, f64)) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, coord);
        }
    }
}

/// Google Geocoding API adapter.
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    config: GeocodeConfig,
    client: reqwest::blocking::Client,
}

impl GoogleGeocoder {
    pub fn new(config: GeocodeConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .build()
            .map_err(|err| Error::configuration(format!("could not build http client: {err}")))?;

        Ok(Self { config, client })
    }

    /// Builds the adapter from environment configuration.
    pub fn from_env() -> Result<Self> {
        Self::new(GeocodeConfig::from_env()?)
    }
}

impl Geocoder for GoogleGeocoder {
    fn lookup(&self, name: &str) -> std::result::Result<(f64, f64), ProviderError> {
        let response: GeocodeResponse = self
            .client
            .get(&self.config.base_url)
            .query(&[("address", name), ("key", self.config.api_key.as_str())])
            .send()?
            .error_for_status()?
            .json()?;

        match response.status.as_str() {
            "OK" => response
                .results
                .first()
                .map(|result| (result.geometry.location.lat, result.geometry.location.lng))
                .ok_or(ProviderError::NoResults),
            "ZERO_RESULTS" => Err(ProviderError::NoResults),
            "OVER_QUERY_LIMIT" => Err(ProviderError::RateLimited),
            other => Err(ProviderError::Rejected(match &response.error_message {
                Some(message) => format!("{other}: {message}"),
                None => other.to_string(),
            })),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

/// Resolves every name to a coordinate, or fails the whole set.
///
/// Cache hits short-circuit the network. Misses are looked up in parallel;
/// the node set is distinct by identity, so no name is in flight twice
/// within a request. Any single failure aborts the resolution and no partial
/// result escapes. Output is keyed by display name regardless of completion
/// order, and successful lookups populate the cache before returning.
pub fn resolve_names<G: Geocoder + Sync>(
    geocoder: &G,
    cache: &GeocodeCache,
    retry: &RetryPolicy,
    names: &[String],
) -> Result<HashMap<String, (f64, f64)>> {
    let mut resolved = HashMap::with_capacity(names.len());
    let mut pending: Vec<&String> = Vec::new();
    for name in names {
        match cache.get(&identity(name)) {
            Some(coord) => {
                resolved.insert(name.clone(), coord);
            }
            None => pending.push(name),
        }
    }

    tracing::debug!(
        total = names.len(),
        cached = resolved.len(),
        "resolving place names"
    );

    let looked_up = pending
        .par_iter()
        .map(|&name| {
            lookup_with_retry(geocoder, name.as_str(), retry)
                .map(|coord| (name.clone(), coord))
                .map_err(|cause| Error::geocode(name.as_str(), cause))
        })
        .collect::<Result<Vec<_>>>()?;

    for (name, coord) in looked_up {
        cache.insert(identity(&name), coord);
        resolved.insert(name, coord);
    }

    Ok(resolved)
}

fn lookup_with_retry<G: Geocoder + ?Sized>(
    geocoder: &G,
    name: &str,
    retry: &RetryPolicy,
) -> std::result::Result<(f64, f64), ProviderError> {
    let mut attempt = 1;
    loop {
        let delay = retry.delay_before(attempt);
        if !delay.is_zero() {
            thread::sleep(delay);
        }

        match geocoder.lookup(name) {
            Ok(coord) => return Ok(coord),
            Err(cause) if cause.is_transient() && attempt < retry.max_attempts() => {
                tracing::warn!(name, attempt, error = %cause, "transient geocode failure, retrying");
                attempt += 1;
            }
            Err(cause) => return Err(cause),
        }
    }
}
