//! Cache-aware weather lookups.
//!
//! Every operation computes a namespaced cache key, returns a fresh cached
//! value when there is one, and otherwise asks the provider, normalizes the
//! answer, and caches it. Provider failures are terminal for the request.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    Config,
    cache::{TtlCache, city_key, coords_key, search_key},
    error::{LookupTarget, WeatherError},
    model::{CitySearchResult, Coordinates, WeatherSnapshot},
    provider::{WeatherProvider, provider_from_config},
};

/// Queries shorter than this (in characters) return no matches.
pub const MIN_SEARCH_CHARS: usize = 2;
pub const SEARCH_LIMIT: usize = 5;

const SEARCH_SLOT: &str = "city-search";

/// Values shared in one response cache, told apart by key namespace.
#[derive(Debug, Clone, PartialEq)]
pub enum Cached {
    Snapshot(WeatherSnapshot),
    Cities(Vec<CitySearchResult>),
}

pub type ResponseCache = TtlCache<Cached>;

/// Identifies one issued request within a logical slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    slot: String,
    seq: u64,
}

/// Tracks the latest request issued per slot so late answers to superseded
/// requests can be dropped.
#[derive(Debug, Default)]
pub struct RequestTracker {
    next: AtomicU64,
    latest: Mutex<HashMap<String, u64>>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, slot: &str) -> RequestToken {
        let seq = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest.lock().insert(slot.to_string(), seq);
        RequestToken { slot: slot.to_string(), seq }
    }

    pub fn is_current(&self, token: &RequestToken) -> bool {
        self.latest.lock().get(&token.slot) == Some(&token.seq)
    }
}

#[derive(Debug)]
pub struct WeatherClient {
    provider: Box<dyn WeatherProvider>,
    cache: Arc<ResponseCache>,
    searches: RequestTracker,
}

impl WeatherClient {
    pub fn new(provider: Box<dyn WeatherProvider>, cache: Arc<ResponseCache>) -> Self {
        Self { provider, cache, searches: RequestTracker::new() }
    }

    /// Build a client for the configured provider with a fresh, empty cache.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = provider_from_config(config)?;

        let mut cache = ResponseCache::new(config.cache_ttl());
        if let Some(capacity) = config.cache_capacity {
            cache = cache.with_capacity(capacity);
        }

        Ok(Self::new(provider, Arc::new(cache)))
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub async fn weather_by_city(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        let key = city_key(city);
        if let Some(snapshot) = self.cached_snapshot(&key) {
            return Ok(snapshot);
        }

        let snapshot = self.provider.current_by_city(city).await.map_err(|e| {
            let err = WeatherError::NotFound {
                target: LookupTarget::City(city.to_string()),
                reason: format!("{e:#}"),
            };
            tracing::warn!(error = %err, "weather lookup failed");
            err
        })?;

        self.cache.set(key, Cached::Snapshot(snapshot.clone()));
        Ok(snapshot)
    }

    pub async fn weather_by_coords(
        &self,
        coords: Coordinates,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let key = coords_key(coords);
        if let Some(snapshot) = self.cached_snapshot(&key) {
            return Ok(snapshot);
        }

        let snapshot = self.provider.current_by_coords(coords).await.map_err(|e| {
            let err = WeatherError::NotFound {
                target: LookupTarget::Coordinates(coords),
                reason: format!("{e:#}"),
            };
            tracing::warn!(error = %err, "weather lookup failed");
            err
        })?;

        self.cache.set(key, Cached::Snapshot(snapshot.clone()));
        Ok(snapshot)
    }

    /// Up to [`SEARCH_LIMIT`] matches in provider relevance order. Queries
    /// shorter than [`MIN_SEARCH_CHARS`] yield an empty list without touching
    /// the cache or the network.
    pub async fn search_cities(&self, query: &str) -> Result<Vec<CitySearchResult>, WeatherError> {
        if query.chars().count() < MIN_SEARCH_CHARS {
            return Ok(Vec::new());
        }

        let key = search_key(query);
        if let Some(Cached::Cities(cities)) = self.cache.get(&key) {
            tracing::debug!(key = %key, "cache hit");
            return Ok(cities);
        }
        tracing::debug!(key = %key, "cache miss");

        let cities = self.provider.search_cities(query, SEARCH_LIMIT).await.map_err(|e| {
            let err = WeatherError::SearchFailed {
                query: query.to_string(),
                reason: format!("{e:#}"),
            };
            tracing::warn!(error = %err, "city search failed");
            err
        })?;

        self.cache.set(key, Cached::Cities(cities.clone()));
        Ok(cities)
    }

    /// Like [`Self::search_cities`], but returns `None` when a newer search
    /// was issued while this one was in flight.
    pub async fn search_latest(
        &self,
        query: &str,
    ) -> Result<Option<Vec<CitySearchResult>>, WeatherError> {
        let token = self.searches.issue(SEARCH_SLOT);
        let result = self.search_cities(query).await;

        if !self.searches.is_current(&token) {
            tracing::debug!(query, "discarding superseded search result");
            return Ok(None);
        }

        result.map(Some)
    }

    fn cached_snapshot(&self, key: &str) -> Option<WeatherSnapshot> {
        match self.cache.get(key) {
            Some(Cached::Snapshot(snapshot)) => {
                tracing::debug!(key, "cache hit");
                Some(snapshot)
            }
            _ => {
                tracing::debug!(key, "cache miss");
                None
            }
        }
    }
}
