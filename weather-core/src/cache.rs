//! In-memory time-to-live cache for provider responses.
//!
//! Entries expire lazily: an expired entry is only removed when it is read.
//! An optional capacity bound evicts the least recently used entry on insert.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::model::Coordinates;

pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

const WEATHER_NAMESPACE: &str = "weather";
const CITIES_NAMESPACE: &str = "cities";

/// Key for a lookup by city name. Case-insensitive.
pub fn city_key(city: &str) -> String {
    format!("{WEATHER_NAMESPACE}:{}", city.to_lowercase())
}

/// Key for a lookup by coordinates, e.g. `weather:35.68,139.69`.
pub fn coords_key(coords: Coordinates) -> String {
    format!("{WEATHER_NAMESPACE}:{coords}")
}

/// Key for a city search query. Case-insensitive.
pub fn search_key(query: &str) -> String {
    format!("{CITIES_NAMESPACE}:{}", query.to_lowercase())
}

/// Source of "now" in epoch milliseconds.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now_millis(&self) -> i64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ManualClock {
    now: std::sync::atomic::AtomicI64,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new(start_millis: i64) -> Self {
        Self { now: std::sync::atomic::AtomicI64::new(start_millis) }
    }

    pub(crate) fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as i64, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub stored_at: i64,
}

impl<T> CacheEntry<T> {
    pub fn is_fresh(&self, now: i64, ttl_ms: i64) -> bool {
        now - self.stored_at <= ttl_ms
    }
}

#[derive(Debug)]
struct Slot<T> {
    entry: CacheEntry<T>,
    last_used: u64,
}

#[derive(Debug)]
struct Inner<T> {
    slots: HashMap<String, Slot<T>>,
    tick: u64,
}

impl<T> Inner<T> {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

#[derive(Debug)]
pub struct TtlCache<T> {
    inner: Mutex<Inner<T>>,
    ttl_ms: i64,
    capacity: Option<usize>,
    clock: Box<dyn Clock>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Box::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Box<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner { slots: HashMap::new(), tick: 0 }),
            ttl_ms: ttl.as_millis() as i64,
            capacity: None,
            clock,
        }
    }

    /// Bound the number of entries; the least recently used one is evicted
    /// to make room. A capacity of zero is treated as one.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity.max(1));
        self
    }

    /// Return the value stored under `key` if it is still fresh. Stale
    /// entries are removed.
    pub fn get(&self, key: &str) -> Option<T> {
        let now = self.clock.now_millis();
        let mut inner = self.inner.lock();
        let tick = inner.next_tick();

        let fresh = match inner.slots.get_mut(key) {
            None => return None,
            Some(slot) if slot.entry.is_fresh(now, self.ttl_ms) => {
                slot.last_used = tick;
                Some(slot.entry.value.clone())
            }
            Some(_) => None,
        };

        if fresh.is_none() {
            inner.slots.remove(key);
            tracing::debug!(key, "cache entry expired");
        }
        fresh
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn set(&self, key: impl Into<String>, value: T) {
        let key = key.into();
        let stored_at = self.clock.now_millis();
        let mut inner = self.inner.lock();
        let tick = inner.next_tick();

        if let Some(capacity) = self.capacity {
            if !inner.slots.contains_key(&key) && inner.slots.len() >= capacity {
                let oldest = inner
                    .slots
                    .iter()
                    .min_by_key(|(_, slot)| slot.last_used)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    inner.slots.remove(&oldest);
                    tracing::debug!(key = %oldest, "cache entry evicted (capacity)");
                }
            }
        }

        inner.slots.insert(key, Slot { entry: CacheEntry { value, stored_at }, last_used: tick });
    }

    pub fn len(&self) -> usize {
        self.inner.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
