//! Generic retry execution with backoff, jitter, and cancellation
//!
//! The executor re-runs a fallible async operation according to a
//! [`RetryConfig`] and a [`RetryPolicy`]. Cancellation is cooperative: the
//! token is checked before every attempt and raced against the backoff
//! sleep, so no attempt starts after cancellation is observed.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Errors that can terminate a retry sequence
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// All attempts were used; carries the error from the final attempt.
    #[error("All {attempts} retry attempts exhausted")]
    Exhausted {
        attempts: u32,
        #[source]
        source: E,
    },

    /// The policy classified the error as non-retryable.
    #[error("Operation failed with non-retryable error")]
    NonRetryable {
        #[source]
        source: E,
    },

    /// The total-time budget was spent before an attempt succeeded.
    #[error("Retry time budget exceeded after {elapsed:?}")]
    TimeBudgetExceeded { elapsed: Duration },

    /// Cancellation was observed between or during attempts.
    #[error("Retry cancelled")]
    Cancelled,

    /// The retry configuration is invalid.
    #[error("Invalid retry configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl<E> RetryError<E> {
    /// The underlying operation error, when one is carried.
    pub fn into_source(self) -> Option<E> {
        match self {
            Self::Exhausted { source, .. } | Self::NonRetryable { source } => Some(source),
            _ => None,
        }
    }
}

/// Trait for deciding whether an error should be retried
pub trait RetryPolicy<E>: Send + Sync {
    fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision;
}

/// Decision for a failed attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry with the configured backoff delay.
    Retry,
    /// Retry after a caller-chosen delay.
    RetryAfter(Duration),
    /// Give up immediately.
    Stop,
}

/// Backoff strategy for calculating retry delays
#[derive(Debug, Clone, PartialEq)]
pub enum BackoffStrategy {
    /// Fixed delay between retries.
    Fixed(Duration),
    /// Linear backoff: initial_delay + attempt * increment.
    Linear { initial_delay: Duration, increment: Duration },
    /// Exponential backoff: initial_delay * base^attempt, capped.
    Exponential { initial_delay: Duration, base: f64, max_delay: Duration },
}

impl BackoffStrategy {
    /// Delay before the retry following the given 0-based attempt.
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        match self {
            Self::Fixed(delay) => *delay,
            Self::Linear { initial_delay, increment } => {
                *initial_delay + increment.saturating_mul(attempt)
            }
            Self::Exponential { initial_delay, base, max_delay } => {
                let delay = initial_delay.as_millis() as f64 * base.powi(attempt as i32);
                let delay_ms = delay.min(max_delay.as_millis() as f64) as u64;
                Duration::from_millis(delay_ms)
            }
        }
    }
}

/// Jitter applied on top of the calculated delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jitter {
    /// Use the calculated delay as-is.
    None,
    /// Anywhere between zero and the calculated delay.
    Full,
    /// Between half and the full calculated delay.
    Equal,
}

impl Jitter {
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            Self::None => delay,
            Self::Full => Duration::from_millis(random_below(delay.as_millis() as u64)),
            Self::Equal => {
                let half = delay.as_millis() as u64 / 2;
                Duration::from_millis(half + random_below(half))
            }
        }
    }
}

/// Pseudo-random value in `[0, max)` seeded from the monotonic clock.
/// Good enough distribution for jitter without pulling in a RNG crate.
fn random_below(max: u64) -> u64 {
    if max == 0 {
        return 0;
    }
    let nanos = Instant::now().elapsed().subsec_nanos() as u64;
    let mut seed = nanos.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
    seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
    seed % max
}

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of attempts (initial try + retries).
    pub max_attempts: u32,
    /// Backoff strategy for calculating delays.
    pub backoff: BackoffStrategy,
    /// Jitter applied to each delay.
    pub jitter: Jitter,
    /// Maximum total time to spend retrying, if bounded.
    pub max_total_time: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: BackoffStrategy::Exponential {
                initial_delay: Duration::from_millis(100),
                base: 2.0,
                max_delay: Duration::from_secs(30),
            },
            jitter: Jitter::Equal,
            max_total_time: Some(Duration::from_secs(300)),
        }
    }
}

impl RetryConfig {
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), RetryError<()>> {
        if self.max_attempts == 0 {
            return Err(RetryError::InvalidConfiguration {
                message: "max_attempts must be greater than 0".to_string(),
            });
        }
        if let BackoffStrategy::Exponential { base, .. } = &self.backoff {
            if *base <= 0.0 {
                return Err(RetryError::InvalidConfiguration {
                    message: "exponential base must be greater than 0".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Builder for [`RetryConfig`] with a fluent API
#[derive(Debug, Default)]
pub struct RetryConfigBuilder {
    config: RetryConfig,
}

impl RetryConfigBuilder {
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    pub fn fixed_backoff(mut self, delay: Duration) -> Self {
        self.config.backoff = BackoffStrategy::Fixed(delay);
        self
    }

    pub fn linear_backoff(mut self, initial_delay: Duration, increment: Duration) -> Self {
        self.config.backoff = BackoffStrategy::Linear { initial_delay, increment };
        self
    }

    pub fn exponential_backoff(
        mut self,
        initial_delay: Duration,
        base: f64,
        max_delay: Duration,
    ) -> Self {
        self.config.backoff = BackoffStrategy::Exponential { initial_delay, base, max_delay };
        self
    }

    pub fn no_jitter(mut self) -> Self {
        self.config.jitter = Jitter::None;
        self
    }

    pub fn full_jitter(mut self) -> Self {
        self.config.jitter = Jitter::Full;
        self
    }

    pub fn equal_jitter(mut self) -> Self {
        self.config.jitter = Jitter::Equal;
        self
    }

    pub fn max_total_time(mut self, duration: Duration) -> Self {
        self.config.max_total_time = Some(duration);
        self
    }

    pub fn unlimited_time(mut self) -> Self {
        self.config.max_total_time = None;
        self
    }

    pub fn build(self) -> Result<RetryConfig, RetryError<()>> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// The retry executor
pub struct RetryExecutor<P> {
    config: RetryConfig,
    policy: P,
}

impl<P> RetryExecutor<P> {
    pub fn new(config: RetryConfig, policy: P) -> Self {
        Self { config, policy }
    }

    /// Create with the default configuration.
    pub fn with_policy(policy: P) -> Self {
        Self::new(RetryConfig::default(), policy)
    }

    /// Run the operation until it succeeds, the policy stops it, attempts
    /// or the time budget run out, or cancellation is observed.
    pub async fn execute<F, Fut, T, E>(
        &self,
        cancel: &CancellationToken,
        mut operation: F,
    ) -> Result<T, RetryError<E>>
    where
        P: RetryPolicy<E>,
        E: fmt::Debug,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let start = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                debug!(attempt, "retry sequence cancelled before attempt");
                return Err(RetryError::Cancelled);
            }

            if let Some(budget) = self.config.max_total_time {
                let elapsed = start.elapsed();
                if elapsed >= budget {
                    warn!(?elapsed, attempt, "retry time budget exceeded");
                    return Err(RetryError::TimeBudgetExceeded { elapsed });
                }
            }

            debug!(attempt = attempt + 1, max = self.config.max_attempts, "executing attempt");

            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(retries = attempt, "operation succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(error) => {
                    if attempt + 1 >= self.config.max_attempts {
                        warn!(attempts = attempt + 1, ?error, "retry attempts exhausted");
                        return Err(RetryError::Exhausted {
                            attempts: attempt + 1,
                            source: error,
                        });
                    }

                    let delay = match self.policy.should_retry(&error, attempt) {
                        RetryDecision::Stop => {
                            debug!(?error, "policy stopped retrying");
                            return Err(RetryError::NonRetryable { source: error });
                        }
                        RetryDecision::Retry => {
                            self.config.jitter.apply(self.config.backoff.calculate_delay(attempt))
                        }
                        RetryDecision::RetryAfter(custom) => custom,
                    };

                    warn!(attempt = attempt + 1, ?delay, "attempt failed, backing off");
                    tokio::select! {
                        () = cancel.cancelled() => return Err(RetryError::Cancelled),
                        () = tokio::time::sleep(delay) => {}
                    }
                    attempt += 1;
                }
            }
        }
    }
}

/// Pre-defined retry policies for common scenarios
pub mod policies {
    use super::{RetryDecision, RetryPolicy};

    /// Retries on any error.
    #[derive(Debug, Clone, Copy)]
    pub struct AlwaysRetry;

    impl<E> RetryPolicy<E> for AlwaysRetry {
        fn should_retry(&self, _error: &E, _attempt: u32) -> RetryDecision {
            RetryDecision::Retry
        }
    }

    /// Never retries.
    #[derive(Debug, Clone, Copy)]
    pub struct NeverRetry;

    impl<E> RetryPolicy<E> for NeverRetry {
        fn should_retry(&self, _error: &E, _attempt: u32) -> RetryDecision {
            RetryDecision::Stop
        }
    }

    /// Predicate-based retry policy.
    #[derive(Debug)]
    pub struct PredicateRetry<F> {
        predicate: F,
    }

    impl<F> PredicateRetry<F> {
        pub fn new(predicate: F) -> Self {
            Self { predicate }
        }
    }

    impl<F, E> RetryPolicy<E> for PredicateRetry<F>
    where
        F: Fn(&E, u32) -> bool + Send + Sync,
    {
        fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision {
            if (self.predicate)(error, attempt) {
                RetryDecision::Retry
            } else {
                RetryDecision::Stop
            }
        }
    }
}
