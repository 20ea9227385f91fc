//! A synchronization adapter which prints function calls.

use std::fmt::Debug;
use std::hash::Hash;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::KeyedSync;

/// The usage log synchronization adapter. Logs facade method calls.
///
/// It is intended to aid in debugging by revealing lock access patterns and
/// how long each key is awaited and held. One line is written per call, after
/// the lock has been released; a call that panics is not logged.
///
/// ### Example (log to stdout)
/// ```rust
/// # use std::sync::Arc;
/// # use parking_lot::Mutex;
/// # use keyed_sync::KeyedSync;
/// # use keyed_sync::sync_adapter::usage_log::UsageLogAdapter;
/// let log_writer = Arc::new(Mutex::new(std::io::stdout()));
/// let sync = UsageLogAdapter::new(KeyedSync::new(), log_writer, || {
///     chrono::Utc::now().format("[%T%.3f] ").to_string()
/// });
/// sync.run(&42, || {});
/// ```
///
/// Running facade methods through the adapter prints output like:
/// ```text
/// [23:41:19.885] run(42) -> 13.21µs
/// [23:41:19.885] evaluate(42) -> 4.56µs
/// [23:41:19.886] run_pair(128, 129) -> 9.30µs
/// ```
pub struct UsageLogAdapter<K> {
    sync: KeyedSync<K>,
    handle: Arc<Mutex<dyn Write + Send + Sync>>,
    prefix_func: fn() -> String,
}

impl<K> core::fmt::Debug for UsageLogAdapter<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        writeln!(f, "usage log")
    }
}

impl<K> UsageLogAdapter<K> {
    /// Create a new usage log adapter.
    #[must_use]
    pub fn new(
        sync: KeyedSync<K>,
        handle: Arc<Mutex<dyn Write + Send + Sync>>,
        prefix_func: fn() -> String,
    ) -> Self {
        Self {
            sync,
            handle,
            prefix_func,
        }
    }
}

impl<K: Clone + Eq + Hash + Debug> UsageLogAdapter<K> {
    /// Runs `work` while holding the lock for `key`, logging the call.
    pub fn run(&self, key: &K, work: impl FnOnce()) {
        let start = Instant::now();
        self.sync.run(key, work);
        let _ = writeln!(
            self.handle.lock(),
            "{}run({key:?}) -> {:.2?}",
            (self.prefix_func)(),
            start.elapsed()
        );
    }

    /// Runs `work` while holding the lock for `key` and returns its result,
    /// logging the call.
    pub fn evaluate<R>(&self, key: &K, work: impl FnOnce() -> R) -> R {
        let start = Instant::now();
        let result = self.sync.evaluate(key, work);
        let _ = writeln!(
            self.handle.lock(),
            "{}evaluate({key:?}) -> {:.2?}",
            (self.prefix_func)(),
            start.elapsed()
        );
        result
    }

    /// Runs `work` while holding the locks for both keys, logging the call.
    pub fn run_pair(&self, key_a: &K, key_b: &K, work: impl FnOnce())
    where
        K: Ord,
    {
        let start = Instant::now();
        self.sync.run_pair(key_a, key_b, work);
        let _ = writeln!(
            self.handle.lock(),
            "{}run_pair({key_a:?}, {key_b:?}) -> {:.2?}",
            (self.prefix_func)(),
            start.elapsed()
        );
    }

    /// Runs `work` while holding the locks for both keys and returns its
    /// result, logging the call.
    pub fn evaluate_pair<R>(&self, key_a: &K, key_b: &K, work: impl FnOnce() -> R) -> R
    where
        K: Ord,
    {
        let start = Instant::now();
        let result = self.sync.evaluate_pair(key_a, key_b, work);
        let _ = writeln!(
            self.handle.lock(),
            "{}evaluate_pair({key_a:?}, {key_b:?}) -> {:.2?}",
            (self.prefix_func)(),
            start.elapsed()
        );
        result
    }
}
