//! Value-keyed mutual exclusion for unbounded key spaces.
//!
//! Callers synchronize on an arbitrary key value (a user id, an order id, a
//! resource path) rather than on a lock object they share by reference: all
//! callers presenting an equal key observe a single lock, while callers
//! presenting unrelated keys proceed independently. Locks are created on
//! first demand and reclaimed exactly when no thread holds or awaits them,
//! so the pool stays as small as the set of keys in active use.
//!
//! - [`KeyedSync`] runs a closure while holding the lock for one key, or for
//!   a pair of keys acquired in a deadlock-free total order.
//! - [`LockPool`] is the reference-counted registry behind a facade, with one
//!   live [`KeyedLock`] per distinct key value.
//! - [`sync_adapter`] offers optional layers over a facade: a usage log and
//!   performance metrics.
//!
//! ## Example
//! ```rust
//! use std::collections::HashMap;
//!
//! use keyed_sync::KeyedSync;
//!
//! let sync = KeyedSync::new();
//! let mut accounts = HashMap::from([(1001, 250), (1002, 75)]);
//!
//! sync.run_pair(&1001, &1002, || {
//!     let amount = 50;
//!     *accounts.get_mut(&1001).unwrap() -= amount;
//!     *accounts.get_mut(&1002).unwrap() += amount;
//! });
//!
//! assert_eq!(accounts[&1001], 200);
//! assert_eq!(accounts[&1002], 125);
//! ```
//!
//! ## Licence
//! `keyed_sync` is licensed under either of
//! - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//! - the MIT license <http://opensource.org/licenses/MIT>, at your option.
#![warn(unused_variables)]
#![warn(dead_code)]
#![deny(missing_docs)]
// #![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![deny(clippy::missing_panics_doc)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod keyed_lock;
mod keyed_sync;
mod lock_pool;
pub mod sync_adapter;

pub use keyed_lock::{KeyedLock, KeyedLockGuard};
pub use keyed_sync::KeyedSync;
pub use lock_pool::{LockHandle, LockPool};
