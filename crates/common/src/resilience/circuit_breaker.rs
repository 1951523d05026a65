//! Circuit breaker for protecting a repeatedly failing downstream
//!
//! Classic three-state machine: `Closed` passes calls through and counts
//! consecutive failures; `Open` rejects calls until a cool-down interval
//! elapses; `HalfOpen` lets a bounded number of probe calls through and
//! closes again after enough of them succeed.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

/// Trait for time operations to enable deterministic testing
pub trait Clock: Send + Sync + 'static {
    /// Current monotonic instant.
    fn now(&self) -> Instant;
}

/// Real system clock for production use
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Mock clock for deterministic tests; advance it manually.
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    elapsed: Arc<Mutex<Duration>>,
}

impl MockClock {
    pub fn new() -> Self {
        Self { start: Instant::now(), elapsed: Arc::new(Mutex::new(Duration::ZERO)) }
    }

    /// Advance the clock without any real delay.
    pub fn advance(&self, duration: Duration) {
        if let Ok(mut elapsed) = self.elapsed.lock() {
            *elapsed += duration;
        }
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        let elapsed = self.elapsed.lock().map(|e| *e).unwrap_or(Duration::ZERO);
        self.start + elapsed
    }
}

/// Configuration validation error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Errors produced around the wrapped operation
#[derive(Debug, Error)]
pub enum ResilienceError<E> {
    /// The circuit is open; the call was rejected without being sent.
    #[error("Circuit breaker is open, rejecting calls")]
    CircuitOpen,

    /// The wrapped operation itself failed.
    #[error("Operation failed")]
    OperationFailed {
        #[source]
        source: E,
    },
}

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Passing calls through.
    Closed,
    /// Rejecting calls until the cool-down elapses.
    Open,
    /// Letting a bounded number of probe calls through.
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "CLOSED"),
            Self::Open => write!(f, "OPEN"),
            Self::HalfOpen => write!(f, "HALF_OPEN"),
        }
    }
}

/// Configuration for circuit breaker behavior
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before the circuit opens.
    pub failure_threshold: u32,
    /// Probe successes needed to close again from half-open.
    pub success_threshold: u32,
    /// Cool-down before an open circuit admits probes.
    pub open_interval: Duration,
    /// Maximum probe calls admitted while half-open.
    pub half_open_max_calls: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 2,
            open_interval: Duration::from_secs(60),
            half_open_max_calls: 3,
        }
    }
}

impl CircuitBreakerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.failure_threshold == 0 {
            return Err(ConfigError::Invalid {
                message: "failure_threshold must be greater than 0".to_string(),
            });
        }
        if self.success_threshold == 0 {
            return Err(ConfigError::Invalid {
                message: "success_threshold must be greater than 0".to_string(),
            });
        }
        if self.half_open_max_calls == 0 {
            return Err(ConfigError::Invalid {
                message: "half_open_max_calls must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug)]
enum Inner {
    Closed { consecutive_failures: u32 },
    Open { since: Instant },
    HalfOpen { admitted: u32, successes: u32 },
}

/// The circuit breaker
pub struct CircuitBreaker<C = SystemClock> {
    config: CircuitBreakerConfig,
    clock: C,
    inner: Mutex<Inner>,
}

impl CircuitBreaker<SystemClock> {
    pub fn new(config: CircuitBreakerConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> CircuitBreaker<C> {
    pub fn with_clock(config: CircuitBreakerConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, clock, inner: Mutex::new(Inner::Closed { consecutive_failures: 0 }) })
    }

    /// Current state, resolving an elapsed open interval to half-open.
    pub fn state(&self) -> CircuitState {
        let Ok(inner) = self.inner.lock() else { return CircuitState::Open };
        match &*inner {
            Inner::Closed { .. } => CircuitState::Closed,
            Inner::HalfOpen { .. } => CircuitState::HalfOpen,
            Inner::Open { since } => {
                if self.clock.now().duration_since(*since) >= self.config.open_interval {
                    CircuitState::HalfOpen
                } else {
                    CircuitState::Open
                }
            }
        }
    }

    /// Run the operation through the breaker.
    ///
    /// Rejected calls return `ResilienceError::CircuitOpen` without the
    /// operation being invoked; a failing operation has its error
    /// preserved in `OperationFailed`.
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, ResilienceError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.try_acquire()?;
        match operation().await {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(err) => {
                self.record_failure();
                Err(ResilienceError::OperationFailed { source: err })
            }
        }
    }

    fn try_acquire<E>(&self) -> Result<(), ResilienceError<E>> {
        let Ok(mut inner) = self.inner.lock() else {
            return Err(ResilienceError::CircuitOpen);
        };
        match &mut *inner {
            Inner::Closed { .. } => Ok(()),
            Inner::Open { since } => {
                if self.clock.now().duration_since(*since) >= self.config.open_interval {
                    debug!("circuit cool-down elapsed, admitting probe call");
                    *inner = Inner::HalfOpen { admitted: 1, successes: 0 };
                    Ok(())
                } else {
                    Err(ResilienceError::CircuitOpen)
                }
            }
            Inner::HalfOpen { admitted, .. } => {
                if *admitted < self.config.half_open_max_calls {
                    *admitted += 1;
                    Ok(())
                } else {
                    Err(ResilienceError::CircuitOpen)
                }
            }
        }
    }

    fn record_success(&self) {
        let Ok(mut inner) = self.inner.lock() else { return };
        match &mut *inner {
            Inner::Closed { consecutive_failures } => *consecutive_failures = 0,
            Inner::HalfOpen { successes, .. } => {
                *successes += 1;
                if *successes >= self.config.success_threshold {
                    debug!("probe calls succeeded, closing circuit");
                    *inner = Inner::Closed { consecutive_failures: 0 };
                }
            }
            Inner::Open { .. } => {}
        }
    }

    fn record_failure(&self) {
        let Ok(mut inner) = self.inner.lock() else { return };
        match &mut *inner {
            Inner::Closed { consecutive_failures } => {
                *consecutive_failures += 1;
                if *consecutive_failures >= self.config.failure_threshold {
                    warn!(
                        failures = *consecutive_failures,
                        "failure threshold reached, opening circuit"
                    );
                    *inner = Inner::Open { since: self.clock.now() };
                }
            }
            Inner::HalfOpen { .. } => {
                warn!("probe call failed, reopening circuit");
                *inner = Inner::Open { since: self.clock.now() };
            }
            Inner::Open { .. } => {}
        }
    }
}
