//! Convenience facade
//!
//! Plain-named methods that unwrap the tagged result: the value (wrapped
//! in `Option` so a 204 stays distinguishable) on success, the classified
//! error via `Err` otherwise. The error payload passes through untouched
//! so callers can still branch on its kind.

use tessera_domain::{
    Account, AclCheckRequest, AclCheckResponse, CheckTenantAccessRequest,
    CheckTenantAccessResponse, CreateTenantRequest, Result, Tenant, UserInfoResponse,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::client::IamClient;

impl IamClient {
    /// List tenants, optionally scoped to a subject.
    pub async fn list_tenants(
        &self,
        subject_id: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<Tenant>>> {
        self.list_tenants_result(subject_id, cancel).await.into_result()
    }

    /// Create a tenant.
    pub async fn create_tenant(
        &self,
        request: &CreateTenantRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<Tenant>> {
        self.create_tenant_result(request, cancel).await.into_result()
    }

    /// Fetch a single tenant by id.
    pub async fn get_tenant(
        &self,
        tenant_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<Option<Tenant>> {
        self.get_tenant_result(tenant_id, cancel).await.into_result()
    }

    /// List accounts.
    pub async fn list_accounts(&self, cancel: &CancellationToken) -> Result<Option<Vec<Account>>> {
        self.list_accounts_result(cancel).await.into_result()
    }

    /// Check which of the given subjects have access to the tenant.
    pub async fn check_access(
        &self,
        tenant_id: Uuid,
        request: &AclCheckRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<AclCheckResponse>> {
        self.check_access_result(tenant_id, request, cancel).await.into_result()
    }

    /// Grant a subject access to the tenant.
    pub async fn grant_access(
        &self,
        tenant_id: Uuid,
        subject_id: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.grant_access_result(tenant_id, subject_id, cancel).await.into_result().map(|_| ())
    }

    /// Revoke a subject's access to the tenant.
    pub async fn revoke_access(
        &self,
        tenant_id: Uuid,
        subject_id: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.revoke_access_result(tenant_id, subject_id, cancel).await.into_result().map(|_| ())
    }

    /// Details about the currently authenticated user.
    pub async fn get_user_info(
        &self,
        subject_id: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Option<UserInfoResponse>> {
        self.get_user_info_result(subject_id, cancel).await.into_result()
    }

    /// Legacy batch access check.
    pub async fn check_tenant_access(
        &self,
        tenant_id: Uuid,
        request: &CheckTenantAccessRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<CheckTenantAccessResponse>> {
        self.check_tenant_access_result(tenant_id, request, cancel).await.into_result()
    }

    /// Whether a single subject has access to the tenant.
    ///
    /// A 204 from the batch check means no subject was allowed.
    pub async fn is_subject_allowed(
        &self,
        tenant_id: Uuid,
        subject_id: &str,
        cancel: &CancellationToken,
    ) -> Result<bool> {
        self.is_subject_allowed_result(tenant_id, subject_id, cancel)
            .await
            .into_result()
            .map(|allowed| allowed.unwrap_or(false))
    }
}
