//! Adapter implementations for planning ports.
//!
//! - [`memory`]: a lock-guarded store for tests and embedded use
//! - [`postgres`]: a Diesel-backed store with transactional cascades

pub mod memory;
pub mod postgres;
