//! Run closures while holding value-keyed locks.

use std::cmp::Ordering;
use std::hash::Hash;
use std::sync::Arc;

use crate::lock_pool::LockPool;

/// Runs units of work while holding the lock for a key, or for a pair of keys.
///
/// Work on equal keys is mutually exclusive; work on unrelated keys proceeds
/// independently. Locks are acquired through a [`LockPool`], which creates
/// them on first demand and reclaims them as soon as no thread holds or
/// awaits them, and they are released on every exit path, including when the
/// work panics.
///
/// Mutual exclusion is a property of the pool, not of the facade: facades
/// backed by one shared pool (see [`with_pool`](KeyedSync::with_pool), or
/// clones of one facade) serialize against each other, while facades backed
/// by different pools never contend, even for equal keys.
///
/// ### Example
/// ```rust
/// use keyed_sync::KeyedSync;
///
/// let sync = KeyedSync::new();
/// let mut balance = 100;
/// sync.run(&"account-7", || balance += 25);
/// assert_eq!(sync.evaluate(&"account-7", || balance), 125);
/// ```
#[derive(Debug)]
pub struct KeyedSync<K> {
    pool: Arc<LockPool<K>>,
}

impl<K> KeyedSync<K> {
    /// Create a facade backed by its own private pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pool: Arc::new(LockPool::new()),
        }
    }

    /// Create a facade backed by an existing pool.
    ///
    /// Facades constructed from clones of the same [`Arc`] serialize against
    /// each other for equal keys.
    #[must_use]
    pub fn with_pool(pool: Arc<LockPool<K>>) -> Self {
        Self { pool }
    }

    /// Returns the pool backing this facade.
    #[must_use]
    pub fn pool(&self) -> &Arc<LockPool<K>> {
        &self.pool
    }
}

impl<K> Default for KeyedSync<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for KeyedSync<K> {
    fn clone(&self) -> Self {
        Self {
            pool: Arc::clone(&self.pool),
        }
    }
}

impl<K: Clone + Eq + Hash> KeyedSync<K> {
    /// Runs `work` while holding the lock for `key`.
    ///
    /// Blocks until every current holder of an equal key has finished. A
    /// panic raised by `work` propagates to the caller after the lock is
    /// released and the pool interest is withdrawn.
    pub fn run(&self, key: &K, work: impl FnOnce()) {
        self.evaluate(key, work);
    }

    /// Runs `work` while holding the lock for `key` and returns its result.
    ///
    /// Blocks until every current holder of an equal key has finished. A
    /// panic raised by `work` propagates to the caller after the lock is
    /// released and the pool interest is withdrawn.
    pub fn evaluate<R>(&self, key: &K, work: impl FnOnce() -> R) -> R {
        let handle = self.pool.acquire(key);
        let _guard = handle.lock();
        work()
    }

    /// Runs `work` while holding the locks for `key_a` and `key_b`.
    ///
    /// The locks are acquired in the keys' own total order regardless of
    /// argument order, so concurrent calls with the keys swapped cannot
    /// deadlock against this one. Equal keys collapse to a single
    /// acquisition. Release is in reverse acquisition order on every exit
    /// path, panicking work included.
    pub fn run_pair(&self, key_a: &K, key_b: &K, work: impl FnOnce())
    where
        K: Ord,
    {
        self.evaluate_pair(key_a, key_b, work);
    }

    /// Runs `work` while holding the locks for `key_a` and `key_b` and
    /// returns its result.
    ///
    /// Ordering, equal-key collapse, and release behave as in
    /// [`run_pair`](KeyedSync::run_pair).
    pub fn evaluate_pair<R>(&self, key_a: &K, key_b: &K, work: impl FnOnce() -> R) -> R
    where
        K: Ord,
    {
        match key_a.cmp(key_b) {
            Ordering::Equal => self.evaluate(key_a, work),
            Ordering::Less => self.evaluate_in_order(key_a, key_b, work),
            Ordering::Greater => self.evaluate_in_order(key_b, key_a, work),
        }
    }

    fn evaluate_in_order<R>(&self, lower: &K, higher: &K, work: impl FnOnce() -> R) -> R {
        let lower_handle = self.pool.acquire(lower);
        let _lower_guard = lower_handle.lock();
        let higher_handle = self.pool.acquire(higher);
        let _higher_guard = higher_handle.lock();
        // Locals drop in reverse declaration order: the higher key's guard and
        // handle release before the lower key's.
        work()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_executes_the_work() {
        let sync = KeyedSync::new();
        let mut ran = false;
        sync.run(&0u64, || ran = true);
        assert!(ran);
    }

    #[test]
    fn evaluate_returns_the_result() {
        let sync = KeyedSync::new();
        assert_eq!(sync.evaluate(&0u64, || 42), 42);
    }

    #[test]
    fn key_is_tracked_only_while_held() {
        let sync = KeyedSync::new();
        sync.run(&0u64, || assert_eq!(sync.pool().size(), 1));
        assert_eq!(sync.pool().size(), 0);
    }

    #[test]
    fn clones_share_the_pool() {
        let sync = KeyedSync::<u64>::new();
        let clone = sync.clone();
        assert!(Arc::ptr_eq(sync.pool(), clone.pool()));
    }

    #[test]
    fn facades_with_pool_share_it() {
        let pool = Arc::new(LockPool::<u64>::new());
        let first = KeyedSync::with_pool(pool.clone());
        let second = KeyedSync::with_pool(pool);
        assert!(Arc::ptr_eq(first.pool(), second.pool()));
    }

    #[test]
    fn pair_acquires_both_keys() {
        let sync = KeyedSync::new();
        sync.run_pair(&1u64, &2u64, || assert_eq!(sync.pool().size(), 2));
        assert_eq!(sync.pool().size(), 0);
    }

    #[test]
    fn pair_order_of_arguments_is_irrelevant() {
        let sync = KeyedSync::new();
        let mut runs = 0;
        sync.run_pair(&1u64, &2u64, || runs += 1);
        sync.run_pair(&2u64, &1u64, || runs += 1);
        assert_eq!(runs, 2);
        assert_eq!(sync.pool().size(), 0);
    }

    #[test]
    fn equal_pair_collapses_to_one_acquisition() {
        let sync = KeyedSync::new();
        let mut runs = 0;
        sync.run_pair(&7u64, &7u64, || runs += 1);
        assert_eq!(runs, 1);
        assert_eq!(sync.pool().size(), 0);
    }

    #[test]
    fn evaluate_pair_returns_the_result() {
        let sync = KeyedSync::new();
        assert_eq!(sync.evaluate_pair(&2u64, &1u64, || "both held"), "both held");
    }
}
