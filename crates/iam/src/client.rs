//! IAM client and raw operations
//!
//! Raw operations build a request from typed parameters, run the
//! interceptor chain, send through the configured policy, and return the
//! status and body as data. Only local argument errors, transport faults,
//! and cancellation are errors at this layer; any status the server
//! returns is a valid raw outcome.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tessera_domain::{
    AclCheckRequest, CheckTenantAccessRequest, CreateTenantRequest, IamError, Result,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};
use url::Url;
use uuid::Uuid;

use crate::auth::AccessTokenProvider;
use crate::config::IamClientConfig;
use crate::interceptor::{BearerAuthInterceptor, InterceptorChain, RequestInterceptor};
use crate::policy::CallPolicy;
use crate::request::RequestTemplate;
use crate::sender::send_with_policy;

/// The IAM API operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListTenants,
    CreateTenant,
    GetTenant,
    ListAccounts,
    CheckAccess,
    GrantAccess,
    RevokeAccess,
    GetUserInfo,
    CheckTenantAccess,
}

impl Operation {
    /// Stable name used in diagnostics and error payloads.
    pub fn name(self) -> &'static str {
        match self {
            Self::ListTenants => "list_tenants",
            Self::CreateTenant => "create_tenant",
            Self::GetTenant => "get_tenant",
            Self::ListAccounts => "list_accounts",
            Self::CheckAccess => "check_access",
            Self::GrantAccess => "grant_access",
            Self::RevokeAccess => "revoke_access",
            Self::GetUserInfo => "get_user_info",
            Self::CheckTenantAccess => "check_tenant_access",
        }
    }
}

/// Raw outcome of one send: the status and the unparsed body.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub operation: &'static str,
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Client for the Tessera IAM API.
pub struct IamClient {
    http: reqwest::Client,
    config: IamClientConfig,
    policy: Option<Arc<dyn CallPolicy>>,
    interceptors: InterceptorChain,
}

impl IamClient {
    /// Start building a new client.
    pub fn builder() -> IamClientBuilder {
        IamClientBuilder::default()
    }

    /// Client with default configuration against the given endpoint.
    pub fn new(base_url: Url) -> Result<Self> {
        Self::builder().base_url(base_url).build()
    }

    /// The active configuration.
    pub fn config(&self) -> &IamClientConfig {
        &self.config
    }

    /// List tenants, optionally scoped to a subject.
    pub async fn list_tenants_response(
        &self,
        subject_id: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<RawResponse> {
        let template = RequestTemplate::get("tenants").query_param("userId", subject_id);
        self.dispatch(Operation::ListTenants, template, cancel).await
    }

    /// Create a tenant.
    pub async fn create_tenant_response(
        &self,
        request: &CreateTenantRequest,
        cancel: &CancellationToken,
    ) -> Result<RawResponse> {
        let template = RequestTemplate::post("tenants").json_body(request)?;
        self.dispatch(Operation::CreateTenant, template, cancel).await
    }

    /// Fetch a single tenant by id.
    pub async fn get_tenant_response(
        &self,
        tenant_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<RawResponse> {
        let template =
            RequestTemplate::get("tenants/{tenantId}").replace_token("{tenantId}", tenant_id);
        self.dispatch(Operation::GetTenant, template, cancel).await
    }

    /// List accounts.
    pub async fn list_accounts_response(&self, cancel: &CancellationToken) -> Result<RawResponse> {
        self.dispatch(Operation::ListAccounts, RequestTemplate::get("accounts"), cancel).await
    }

    /// Check which of the given subjects have access to the tenant.
    pub async fn check_access_response(
        &self,
        tenant_id: Uuid,
        request: &AclCheckRequest,
        cancel: &CancellationToken,
    ) -> Result<RawResponse> {
        let template = RequestTemplate::post("tenants/{tenantId}/acl/check")
            .replace_token("{tenantId}", tenant_id)
            .json_body(request)?;
        self.dispatch(Operation::CheckAccess, template, cancel).await
    }

    /// Grant a subject access to the tenant.
    pub async fn grant_access_response(
        &self,
        tenant_id: Uuid,
        subject_id: &str,
        cancel: &CancellationToken,
    ) -> Result<RawResponse> {
        require_subject(subject_id)?;
        let template = RequestTemplate::post("tenants/{tenantId}/acl/grant")
            .replace_token("{tenantId}", tenant_id)
            .query_param("subjectId", Some(subject_id));
        self.dispatch(Operation::GrantAccess, template, cancel).await
    }

    /// Revoke a subject's access to the tenant.
    pub async fn revoke_access_response(
        &self,
        tenant_id: Uuid,
        subject_id: &str,
        cancel: &CancellationToken,
    ) -> Result<RawResponse> {
        require_subject(subject_id)?;
        let template = RequestTemplate::post("tenants/{tenantId}/acl/remove")
            .replace_token("{tenantId}", tenant_id)
            .query_param("subjectId", Some(subject_id));
        self.dispatch(Operation::RevokeAccess, template, cancel).await
    }

    /// Details about the currently authenticated user.
    pub async fn get_user_info_response(
        &self,
        subject_id: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<RawResponse> {
        let template = RequestTemplate::get("users/me").query_param("userId", subject_id);
        self.dispatch(Operation::GetUserInfo, template, cancel).await
    }

    /// Legacy batch access check (`checkMemberUsers` route).
    pub async fn check_tenant_access_response(
        &self,
        tenant_id: Uuid,
        request: &CheckTenantAccessRequest,
        cancel: &CancellationToken,
    ) -> Result<RawResponse> {
        let template = RequestTemplate::post("tenants/{tenantId}/checkMemberUsers")
            .replace_token("{tenantId}", tenant_id)
            .json_body(request)?;
        self.dispatch(Operation::CheckTenantAccess, template, cancel).await
    }

    #[instrument(skip_all, fields(operation = operation.name()))]
    async fn dispatch(
        &self,
        operation: Operation,
        template: RequestTemplate,
        cancel: &CancellationToken,
    ) -> Result<RawResponse> {
        let mut request = template.build(&self.config)?;
        self.interceptors.run(operation, &mut request).await?;

        let response =
            send_with_policy(&self.http, request, self.policy.as_deref(), cancel).await?;
        let status = response.status();

        let body = tokio::select! {
            () = cancel.cancelled() => return Err(IamError::Cancelled),
            bytes = response.bytes() => {
                bytes.map_err(|err| IamError::Transport(err.to_string()))?.to_vec()
            }
        };

        debug!(status = status.as_u16(), bytes = body.len(), "operation completed");
        Ok(RawResponse { operation: operation.name(), status, body })
    }
}

fn require_subject(subject_id: &str) -> Result<()> {
    if subject_id.trim().is_empty() {
        return Err(IamError::InvalidArgument("subject_id must not be blank".to_string()));
    }
    Ok(())
}

/// Builder for [`IamClient`].
#[derive(Default)]
pub struct IamClientBuilder {
    base_url: Option<Url>,
    api_version: Option<String>,
    api_key: Option<String>,
    api_key_header: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    policy: Option<Arc<dyn CallPolicy>>,
    interceptors: InterceptorChain,
}

impl IamClientBuilder {
    /// Set the IAM API endpoint (required).
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Override the `api-version` query parameter value.
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// Configure the API subscription key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the header name carrying the subscription key.
    pub fn api_key_header(mut self, header: impl Into<String>) -> Self {
        self.api_key_header = Some(header.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Inject the resiliency policy wrapped around every send.
    pub fn policy(mut self, policy: Arc<dyn CallPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Register an interceptor for every operation.
    pub fn interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptors.push_global(interceptor);
        self
    }

    /// Register an interceptor for a single operation.
    pub fn operation_interceptor(
        mut self,
        operation: Operation,
        interceptor: Arc<dyn RequestInterceptor>,
    ) -> Self {
        self.interceptors.push_for(operation, interceptor);
        self
    }

    /// Attach bearer authentication from the given token provider.
    pub fn token_provider(self, provider: Arc<dyn AccessTokenProvider>) -> Self {
        self.interceptor(Arc::new(BearerAuthInterceptor::new(provider)))
    }

    /// Build the client.
    pub fn build(self) -> Result<IamClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| IamError::InvalidArgument("base_url is required".to_string()))?;

        let mut config = IamClientConfig::new(base_url);
        if let Some(api_version) = self.api_version {
            config.api_version = api_version;
        }
        config.api_key = self.api_key;
        if let Some(header) = self.api_key_header {
            config.api_key_header = header;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        config.user_agent = self.user_agent;

        let mut http = reqwest::Client::builder().timeout(config.timeout);
        if let Some(agent) = &config.user_agent {
            http = http.user_agent(agent.clone());
        }
        let http = http
            .build()
            .map_err(|err| IamError::Transport(format!("failed to build HTTP client: {err}")))?;

        Ok(IamClient { http, config, policy: self.policy, interceptors: self.interceptors })
    }
}
