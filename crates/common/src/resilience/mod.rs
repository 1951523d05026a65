//! Resilience patterns for fault tolerance
//!
//! This module provides **generic, reusable** resilience patterns:
//! - **Retry**: configurable retry strategies with backoff and jitter
//! - **Circuit Breaker**: detects repeated failures and stops sending
//!   until the downstream has had time to recover
//!
//! Both are generic over the operation's error type (`<E>`) and honor a
//! [`tokio_util::sync::CancellationToken`]: once cancellation is
//! observed, no further attempt is started and any backoff sleep is
//! abandoned.

pub mod circuit_breaker;
pub mod retry;

// Re-export circuit breaker types
pub use circuit_breaker::{
    CircuitBreaker, CircuitBreakerConfig, CircuitState, Clock, ConfigError, MockClock,
    ResilienceError, SystemClock,
};
// Re-export retry types
pub use retry::{
    policies, BackoffStrategy, Jitter, RetryConfig, RetryConfigBuilder, RetryDecision, RetryError,
    RetryExecutor, RetryPolicy,
};
