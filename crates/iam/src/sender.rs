//! Policy-wrapped sending
//!
//! One logical send per call. With a policy, the policy drives
//! re-execution of the idempotent "send this exact request" action, each
//! attempt working on a fresh clone of the request; without one the
//! request goes out once. Cancellation is checked up front and raced
//! against the in-flight send, and the request is dropped on every exit
//! path.

use reqwest::{Client, Request, Response};
use tessera_domain::{IamError, Result};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::policy::CallPolicy;

/// One idempotent send attempt, re-invocable by a policy.
pub struct SendAction<'a> {
    client: &'a Client,
    request: &'a Request,
    cancel: &'a CancellationToken,
}

impl SendAction<'_> {
    /// Send a fresh clone of the request.
    pub async fn attempt(&self) -> Result<Response> {
        let request = self.request.try_clone().ok_or_else(|| {
            IamError::InvalidArgument("request body cannot be cloned for resend".to_string())
        })?;
        send_once(self.client, request, self.cancel).await
    }
}

/// Send through the policy when one is configured, directly otherwise.
pub(crate) async fn send_with_policy(
    client: &Client,
    request: Request,
    policy: Option<&dyn CallPolicy>,
    cancel: &CancellationToken,
) -> Result<Response> {
    if cancel.is_cancelled() {
        return Err(IamError::Cancelled);
    }

    match policy {
        None => send_once(client, request, cancel).await,
        Some(policy) => {
            // Policies may resend; an uncloneable body surfaces here
            // instead of failing mid-retry.
            if request.try_clone().is_none() {
                return Err(IamError::InvalidArgument(
                    "request body cannot be cloned for resend".to_string(),
                ));
            }
            let action = SendAction { client, request: &request, cancel };
            policy.execute(&action, cancel).await
        }
    }
}

async fn send_once(client: &Client, request: Request, cancel: &CancellationToken) -> Result<Response> {
    let method = request.method().clone();
    let url = request.url().clone();
    debug!(%method, %url, "sending HTTP request");

    let outcome = tokio::select! {
        () = cancel.cancelled() => return Err(IamError::Cancelled),
        outcome = client.execute(request) => outcome,
    };

    match outcome {
        Ok(response) => {
            debug!(%method, %url, status = %response.status(), "received HTTP response");
            Ok(response)
        }
        Err(err) => {
            debug!(%method, %url, error = %err, "HTTP request failed");
            Err(IamError::Transport(err.to_string()))
        }
    }
}
