//! Dictionary loader metrics.
//!
//! Counters for cache behaviour, bundle fetches and fallbacks. Each loader
//! owns its own instance so isolated loaders (e.g. in tests) do not share
//! counts.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for one dictionary loader.
#[derive(Debug, Default)]
pub struct LoaderMetrics {
    /// Number of lookups served by an existing cache entry (resolved or in flight)
    cache_hits: AtomicUsize,

    /// Number of lookups that had to start a new load
    cache_misses: AtomicUsize,

    /// Number of bundle fetch attempts made against the bundle source
    bundle_fetches: AtomicUsize,

    /// Number of loads that ended in an error
    load_failures: AtomicUsize,

    /// Number of requests served with the default dictionary after a failure
    fallbacks: AtomicUsize,
}

impl LoaderMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cache hit.
    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cache miss.
    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a bundle fetch attempt.
    pub fn record_bundle_fetch(&self) {
        self.bundle_fetches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed load.
    pub fn record_load_failure(&self) {
        self.load_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a fallback to the default dictionary.
    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> usize {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn bundle_fetches(&self) -> usize {
        self.bundle_fetches.load(Ordering::Relaxed)
    }

    pub fn load_failures(&self) -> usize {
        self.load_failures.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits();
        let misses = self.cache_misses();
        let total = hits + misses;
        let cache_hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate,
            bundle_fetches: self.bundle_fetches(),
            load_failures: self.load_failures(),
            fallbacks: self.fallbacks(),
        }
    }
}

/// Snapshot of loader metrics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub cache_hits: usize,
    pub cache_misses: usize,

    /// Cache hit rate as a percentage (0-100)
    pub cache_hit_rate: f64,

    pub bundle_fetches: usize,
    pub load_failures: usize,
    pub fallbacks: usize,
}
