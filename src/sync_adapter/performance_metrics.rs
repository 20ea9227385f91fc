//! A synchronization adapter which records performance metrics.

use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::KeyedSync;

/// The performance metrics synchronization adapter. Accumulates call counts.
///
/// It is intended to aid in testing by allowing the application to validate
/// that the number of synchronized operations matches expected values for
/// specific workloads.
#[derive(Debug)]
pub struct PerformanceMetricsAdapter<K> {
    sync: KeyedSync<K>,
    runs: AtomicUsize,
    evaluates: AtomicUsize,
    pair_runs: AtomicUsize,
    pair_evaluates: AtomicUsize,
}

impl<K> PerformanceMetricsAdapter<K> {
    /// Create a new performance metrics adapter.
    #[must_use]
    pub fn new(sync: KeyedSync<K>) -> Self {
        Self {
            sync,
            runs: AtomicUsize::default(),
            evaluates: AtomicUsize::default(),
            pair_runs: AtomicUsize::default(),
            pair_evaluates: AtomicUsize::default(),
        }
    }

    /// Returns the number of single-key `run` calls.
    #[must_use]
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::Relaxed)
    }

    /// Returns the number of single-key `evaluate` calls.
    #[must_use]
    pub fn evaluates(&self) -> usize {
        self.evaluates.load(Ordering::Relaxed)
    }

    /// Returns the number of `run_pair` calls.
    #[must_use]
    pub fn pair_runs(&self) -> usize {
        self.pair_runs.load(Ordering::Relaxed)
    }

    /// Returns the number of `evaluate_pair` calls.
    #[must_use]
    pub fn pair_evaluates(&self) -> usize {
        self.pair_evaluates.load(Ordering::Relaxed)
    }
}

impl<K: Clone + Eq + Hash> PerformanceMetricsAdapter<K> {
    /// Runs `work` while holding the lock for `key`, counting the call.
    pub fn run(&self, key: &K, work: impl FnOnce()) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        self.sync.run(key, work);
    }

    /// Runs `work` while holding the lock for `key` and returns its result,
    /// counting the call.
    pub fn evaluate<R>(&self, key: &K, work: impl FnOnce() -> R) -> R {
        self.evaluates.fetch_add(1, Ordering::Relaxed);
        self.sync.evaluate(key, work)
    }

    /// Runs `work` while holding the locks for both keys, counting the call.
    pub fn run_pair(&self, key_a: &K, key_b: &K, work: impl FnOnce())
    where
        K: Ord,
    {
        self.pair_runs.fetch_add(1, Ordering::Relaxed);
        self.sync.run_pair(key_a, key_b, work);
    }

    /// Runs `work` while holding the locks for both keys and returns its
    /// result, counting the call.
    pub fn evaluate_pair<R>(&self, key_a: &K, key_b: &K, work: impl FnOnce() -> R) -> R
    where
        K: Ord,
    {
        self.pair_evaluates.fetch_add(1, Ordering::Relaxed);
        self.sync.evaluate_pair(key_a, key_b, work)
    }
}
