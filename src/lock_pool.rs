//! A reference-counted pool of keyed locks.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::keyed_lock::{KeyedLock, KeyedLockGuard};

#[derive(Debug)]
struct PoolEntry<K> {
    lock: Arc<KeyedLock<K>>,
    refs: usize,
}

/// A pool of [`KeyedLock`]s with at most one live lock per distinct key value.
///
/// [`acquire`](LockPool::acquire) registers interest in a key and returns a
/// [`LockHandle`] referring to the one lock shared by every thread presenting
/// an equal key, creating it on first demand. The handle does not yet hold
/// the lock; [`LockHandle::lock`] does. Dropping the handle releases the
/// interest, and the entry for a key is removed exactly when the last handle
/// for it is dropped, so the pool never retains a lock that no thread holds
/// or awaits.
///
/// All registry bookkeeping runs under a single pool mutex and never blocks
/// on an individual key's lock, so reference counts stay accurate while
/// threads queue for a contended key.
#[derive(Debug)]
pub struct LockPool<K> {
    entries: Mutex<HashMap<K, PoolEntry<K>>>,
}

impl<K> LockPool<K> {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the number of distinct keys currently tracked.
    ///
    /// Diagnostic only. The count is immediately stale under concurrent
    /// acquisition and release, so it must not inform synchronization
    /// decisions.
    #[must_use]
    pub fn size(&self) -> usize {
        self.entries.lock().len()
    }
}

impl<K> Default for LockPool<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Eq + Hash> LockPool<K> {
    /// Registers interest in `key` and returns a handle to its lock.
    ///
    /// If the pool already tracks an equal key, the existing lock is shared
    /// and its reference count incremented; otherwise a new lock is created
    /// with a count of one. The returned handle is not locked. Call
    /// [`LockHandle::lock`] to acquire exclusivity, and drop the handle to
    /// withdraw the registered interest.
    #[must_use]
    pub fn acquire(&self, key: &K) -> LockHandle<'_, K> {
        let mut entries = self.entries.lock();
        let entry = entries.entry(key.clone()).or_insert_with(|| PoolEntry {
            lock: Arc::new(KeyedLock::new(key.clone())),
            refs: 0,
        });
        entry.refs += 1;
        LockHandle {
            pool: self,
            lock: Arc::clone(&entry.lock),
        }
    }
}

impl<K: Eq + Hash> LockPool<K> {
    /// Withdraws one registered interest in `key`, removing the entry when no
    /// interest remains.
    fn release(&self, key: &K) {
        let mut entries = self.entries.lock();
        let entry = entries
            .get_mut(key)
            .expect("released a key that the pool does not track");
        assert!(entry.refs > 0, "reference count underflow for a tracked key");
        entry.refs -= 1;
        if entry.refs == 0 {
            entries.remove(key);
        }
    }
}

/// Registered interest in one key of a [`LockPool`].
///
/// The handle does not hold the lock; [`lock`](LockHandle::lock) does.
/// Dropping the handle withdraws the interest and, if it was the last for its
/// key, removes the key's entry from the pool. Releasing a key the pool does
/// not track is a pool protocol violation and panics.
#[derive(Debug)]
#[must_use = "dropping the handle immediately withdraws the registered interest"]
pub struct LockHandle<'a, K: Eq + Hash> {
    pool: &'a LockPool<K>,
    lock: Arc<KeyedLock<K>>,
}

impl<K: Eq + Hash> LockHandle<'_, K> {
    /// Acquires the lock, blocking the current thread until it is able to do so.
    ///
    /// When the returned guard goes out of scope, the lock will be unlocked.
    #[must_use]
    pub fn lock(&self) -> KeyedLockGuard<'_> {
        self.lock.lock()
    }

    /// Returns the shared lock this handle refers to.
    #[must_use]
    pub fn keyed_lock(&self) -> &Arc<KeyedLock<K>> {
        &self.lock
    }
}

impl<K: Eq + Hash> Drop for LockHandle<'_, K> {
    fn drop(&mut self) {
        self.pool.release(self.lock.key());
    }
}
