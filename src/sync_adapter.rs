//! Synchronization adapters.
//!
//! Adapters can be layered on a [`KeyedSync`](crate::KeyedSync) facade.

pub mod performance_metrics;
pub mod usage_log;
