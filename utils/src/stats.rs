//! Named event counters, e.g. rejected messages per error kind.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

/// A fixed set of thread-safe counters.
///
/// Names are registered up front so the hot path never allocates or locks.
/// Events under an unregistered name land in a catch-all counter.
pub struct StatsCounter {
    counters: BTreeMap<&'static str, AtomicU64>,
    unregistered: AtomicU64,
}

impl StatsCounter {
    pub fn new(names: &[&'static str]) -> Self {
        Self {
            counters: names.iter().map(|&name| (name, AtomicU64::new(0))).collect(),
            unregistered: AtomicU64::new(0),
        }
    }

    /// Bump `name` by one and return its new value.
    pub fn increment(&self, name: &str) -> u64 {
        self.add(name, 1)
    }

    /// Bump `name` by `value` and return its new value.
    pub fn add(&self, name: &str, value: u64) -> u64 {
        match self.counters.get(name) {
            Some(counter) => counter.fetch_add(value, Ordering::Relaxed) + value,
            None => {
                debug!(counter = name, "event for unregistered counter");
                self.unregistered.fetch_add(value, Ordering::Relaxed) + value
            }
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn unregistered(&self) -> u64 {
        self.unregistered.load(Ordering::Relaxed)
    }

    /// Sum over every counter, unregistered events included.
    pub fn total(&self) -> u64 {
        self.counters
            .values()
            .map(|c| c.load(Ordering::Relaxed))
            .sum::<u64>()
            + self.unregistered()
    }

    /// Current values, sorted by name.
    pub fn snapshot(&self) -> BTreeMap<&'static str, u64> {
        self.counters
            .iter()
            .map(|(&k, v)| (k, v.load(Ordering::Relaxed)))
            .collect()
    }

    pub fn reset(&self) {
        for counter in self.counters.values() {
            counter.store(0, Ordering::Relaxed);
        }
        self.unregistered.store(0, Ordering::Relaxed);
    }
}
