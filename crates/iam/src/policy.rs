//! Call policies
//!
//! The resiliency seam: a policy owns re-execution of the single
//! idempotent send action. Classified API errors never reach a policy —
//! a 400 or 500 *response* is a completed send — so retry and
//! circuit-breaking apply only to transport-level failures.

use async_trait::async_trait;
use reqwest::Response;
use tessera_common::resilience::policies::PredicateRetry;
use tessera_common::resilience::{
    CircuitBreaker, ResilienceError, RetryConfig, RetryError, RetryExecutor,
};
use tessera_domain::{IamError, Result};
use tokio_util::sync::CancellationToken;

use crate::sender::SendAction;

/// Resiliency policy wrapped around one request send.
#[async_trait]
pub trait CallPolicy: Send + Sync {
    /// Drive the send action to a single logical response.
    async fn execute(
        &self,
        action: &SendAction<'_>,
        cancel: &CancellationToken,
    ) -> Result<Response>;
}

/// Retries transport failures with the configured backoff.
pub struct RetryCallPolicy {
    config: RetryConfig,
}

impl RetryCallPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }
}

impl Default for RetryCallPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

#[async_trait]
impl CallPolicy for RetryCallPolicy {
    async fn execute(
        &self,
        action: &SendAction<'_>,
        cancel: &CancellationToken,
    ) -> Result<Response> {
        let policy = PredicateRetry::new(|error: &IamError, _attempt: u32| {
            matches!(error, IamError::Transport(_))
        });
        let executor = RetryExecutor::new(self.config.clone(), policy);

        executor.execute(cancel, || action.attempt()).await.map_err(|err| match err {
            RetryError::Exhausted { source, .. } | RetryError::NonRetryable { source } => source,
            RetryError::Cancelled => IamError::Cancelled,
            RetryError::TimeBudgetExceeded { elapsed } => {
                IamError::Transport(format!("retry time budget exceeded after {elapsed:?}"))
            }
            RetryError::InvalidConfiguration { message } => IamError::InvalidArgument(message),
        })
    }
}

/// Rejects sends while the wrapped circuit breaker is open.
pub struct CircuitBreakerPolicy {
    breaker: CircuitBreaker,
}

impl CircuitBreakerPolicy {
    pub fn new(breaker: CircuitBreaker) -> Self {
        Self { breaker }
    }
}

#[async_trait]
impl CallPolicy for CircuitBreakerPolicy {
    async fn execute(
        &self,
        action: &SendAction<'_>,
        cancel: &CancellationToken,
    ) -> Result<Response> {
        if cancel.is_cancelled() {
            return Err(IamError::Cancelled);
        }
        match self.breaker.execute(|| action.attempt()).await {
            Ok(response) => Ok(response),
            Err(ResilienceError::CircuitOpen) => {
                Err(IamError::Transport("circuit breaker is open, rejecting calls".to_string()))
            }
            Err(ResilienceError::OperationFailed { source }) => Err(source),
        }
    }
}
