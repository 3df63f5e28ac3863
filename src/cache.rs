//! Single-entry, time-bounded cache in front of a [`RateSource`].

use log::debug;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::api::RateSource;
use crate::config::CACHE_DURATION;
use crate::error::BoardResult;
use crate::models::{CacheEntry, RatesSnapshot};

/// Source of the current time, swappable in tests.
pub trait Clock {
    fn now(&self) -> SystemTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

pub struct RateCache<S, C = SystemClock> {
    source: S,
    clock: C,
    base: String,
    ttl: Duration,
    entry: Option<CacheEntry>,
}

impl<S: RateSource> RateCache<S> {
    pub fn new(source: S, base: &str) -> Self {
        Self::with_clock(source, base, SystemClock)
    }
}

impl<S: RateSource, C: Clock> RateCache<S, C> {
    pub fn with_clock(source: S, base: &str, clock: C) -> Self {
        Self {
            source,
            clock,
            base: base.to_string(),
            ttl: CACHE_DURATION,
            entry: None,
        }
    }

    /// Returns the cached snapshot until its age exceeds the TTL, then
    /// fetches a new one and replaces the entry.
    pub async fn get(&mut self) -> BoardResult<Arc<RatesSnapshot>> {
        let now = self.clock.now();

        if let Some(entry) = &self.entry {
            if self.is_fresh(entry, now) {
                debug!("Cache hit for {}", self.base);
                return Ok(Arc::clone(&entry.snapshot));
            }
            debug!("Cache entry for {} expired", self.base);
        } else {
            debug!("Cache miss for {}", self.base);
        }

        let snapshot = Arc::new(self.source.fetch_all_exchange_rates(&self.base).await?);
        self.entry = Some(CacheEntry {
            snapshot: Arc::clone(&snapshot),
            timestamp: self.clock.now(),
        });
        Ok(snapshot)
    }

    /// Age of the current entry, if any.
    pub fn age(&self) -> Option<Duration> {
        let entry = self.entry.as_ref()?;
        self.clock.now().duration_since(entry.timestamp).ok()
    }

    // A clock that reads earlier than the entry counts as expired.
    fn is_fresh(&self, entry: &CacheEntry, now: SystemTime) -> bool {
        match now.duration_since(entry.timestamp) {
            Ok(age) => age <= self.ttl,
            Err(_) => false,
        }
    }
}
