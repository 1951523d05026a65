//! # Tessera IAM
//!
//! Typed client for the Tessera IAM API: tenant, account, and ACL
//! operations plus current-user details.
//!
//! The client is layered the same way the API behaves:
//!
//! - raw operations (`*_response`) build and send a request and hand back
//!   the status and body; 4xx/5xx responses are data here, not errors
//! - result operations (`*_result`) run the response through a fixed
//!   status decision table and return a tagged [`ApiResult`]
//! - the facade (plain-named methods) unwraps the tag into a standard
//!   `Result` for callers that just want the value
//!
//! Resilience is injected: a [`CallPolicy`] wraps the single idempotent
//! send, and an ordered [`RequestInterceptor`] chain (bearer auth lives
//! here) may mutate each outgoing request before it leaves the client.
//!
//! [`ApiResult`]: tessera_domain::ApiResult

pub mod auth;
pub mod client;
pub mod config;
pub mod interceptor;
pub mod policy;
pub mod request;
mod results;
mod sender;

mod facade;

pub use auth::{AccessTokenProvider, StaticTokenProvider};
pub use client::{IamClient, IamClientBuilder, Operation, RawResponse};
pub use config::{IamClientConfig, DEFAULT_API_KEY_HEADER, DEFAULT_API_VERSION};
pub use interceptor::{BearerAuthInterceptor, RequestInterceptor};
pub use policy::{CallPolicy, CircuitBreakerPolicy, RetryCallPolicy};
pub use request::RequestTemplate;
pub use sender::SendAction;
