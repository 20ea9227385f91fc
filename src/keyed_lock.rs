//! A value-keyed exclusive lock.

use std::hash::{Hash, Hasher};

use parking_lot::{Mutex, MutexGuard};

/// An exclusive lock identified by a key value.
///
/// Equality and hashing delegate entirely to the key: two locks constructed
/// from equal keys are equal and hash identically even though they are
/// distinct objects, so any hash-keyed structure treats them as the same
/// logical lock.
///
/// Locks handed out by a [`LockPool`](crate::LockPool) are shared, with every
/// acquisition of an equal key yielding the same underlying instance. A lock
/// constructed directly with [`KeyedLock::new`] is a plain keyed mutex that
/// does not participate in any pool.
///
/// The lock is not reentrant. Locking it again from the thread that already
/// holds it deadlocks, as with a plain exclusive mutex.
#[derive(Debug)]
pub struct KeyedLock<K> {
    key: K,
    mutex: Mutex<()>,
}

impl<K> KeyedLock<K> {
    /// Create a new lock for `key`.
    #[must_use]
    pub const fn new(key: K) -> Self {
        Self {
            key,
            mutex: Mutex::new(()),
        }
    }

    /// Returns the key this lock is associated with.
    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Acquires the lock, blocking the current thread until it is able to do so.
    ///
    /// When the returned guard goes out of scope, the lock will be unlocked.
    #[must_use]
    pub fn lock(&self) -> KeyedLockGuard<'_> {
        KeyedLockGuard(self.mutex.lock())
    }
}

impl<K: PartialEq> PartialEq for KeyedLock<K> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Eq> Eq for KeyedLock<K> {}

impl<K: Hash> Hash for KeyedLock<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// Keyed lock guard. The lock is unlocked when the guard is dropped.
#[derive(Debug)]
pub struct KeyedLockGuard<'a>(MutexGuard<'a, ()>);
