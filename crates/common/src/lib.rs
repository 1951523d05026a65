//! # Tessera Common
//!
//! Generic, reusable building blocks shared across Tessera crates.
//!
//! Currently this is the resilience library: retry execution with
//! configurable backoff/jitter and a circuit breaker, both generic over
//! the caller's error type and aware of cooperative cancellation.

pub mod resilience;

pub use resilience::*;
