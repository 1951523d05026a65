//! Request interceptors
//!
//! An ordered chain of hooks that may mutate the outgoing request
//! immediately before send: inject headers, log, trace. Interceptors are
//! registered globally or per operation; the global ones run first, in
//! registration order.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use tessera_domain::{IamError, Result};

use crate::auth::AccessTokenProvider;
use crate::client::Operation;

/// Hook invoked immediately before a request is sent.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    async fn before_send(&self, operation: Operation, request: &mut reqwest::Request)
        -> Result<()>;
}

/// Ordered interceptor registrations for a client.
#[derive(Clone, Default)]
pub(crate) struct InterceptorChain {
    global: Vec<Arc<dyn RequestInterceptor>>,
    per_operation: HashMap<Operation, Vec<Arc<dyn RequestInterceptor>>>,
}

impl InterceptorChain {
    pub(crate) fn push_global(&mut self, interceptor: Arc<dyn RequestInterceptor>) {
        self.global.push(interceptor);
    }

    pub(crate) fn push_for(
        &mut self,
        operation: Operation,
        interceptor: Arc<dyn RequestInterceptor>,
    ) {
        self.per_operation.entry(operation).or_default().push(interceptor);
    }

    pub(crate) async fn run(
        &self,
        operation: Operation,
        request: &mut reqwest::Request,
    ) -> Result<()> {
        for interceptor in &self.global {
            interceptor.before_send(operation, request).await?;
        }
        if let Some(interceptors) = self.per_operation.get(&operation) {
            for interceptor in interceptors {
                interceptor.before_send(operation, request).await?;
            }
        }
        Ok(())
    }
}

/// Attaches `Authorization: Bearer <token>` from an injected provider.
pub struct BearerAuthInterceptor {
    provider: Arc<dyn AccessTokenProvider>,
}

impl BearerAuthInterceptor {
    pub fn new(provider: Arc<dyn AccessTokenProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl RequestInterceptor for BearerAuthInterceptor {
    async fn before_send(
        &self,
        _operation: Operation,
        request: &mut reqwest::Request,
    ) -> Result<()> {
        let token = self.provider.access_token(false).await?;
        let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            IamError::InvalidArgument("access token is not a valid header value".to_string())
        })?;
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}
