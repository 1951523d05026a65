//! Response mapping
//!
//! The fixed decision table applied to every raw response:
//!
//! | status | outcome |
//! |---|---|
//! | 200 | deserialize the declared success type; parse failure is a malformed-response error |
//! | 204 | `NoContent` |
//! | 400, 500 | deserialize `ErrorResponse` and surface its embedded error |
//! | anything else | unexpected-status error with operation name and body snippet |

use serde::de::DeserializeOwned;
use tessera_domain::{
    Account, AclCheckRequest, AclCheckResponse, ApiResult, CheckTenantAccessRequest,
    CheckTenantAccessResponse, CreateTenantRequest, ErrorResponse, IamError, Tenant,
    UserInfoResponse,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::client::{IamClient, RawResponse};

/// Classify a response whose 200 body is the given type.
pub(crate) fn map_json<T: DeserializeOwned>(raw: &RawResponse) -> ApiResult<T> {
    match raw.status.as_u16() {
        200 => match serde_json::from_slice::<T>(&raw.body) {
            Ok(value) => ApiResult::Ok(value),
            Err(err) => {
                ApiResult::Err(IamError::malformed_response(raw.operation, err.to_string()))
            }
        },
        204 => ApiResult::NoContent,
        400 | 500 => ApiResult::Err(classify_error_body(raw)),
        status => ApiResult::Err(IamError::unexpected_status(
            raw.operation,
            status,
            &String::from_utf8_lossy(&raw.body),
        )),
    }
}

/// Classify a response whose 200 carries no interesting body.
pub(crate) fn map_unit(raw: &RawResponse) -> ApiResult<()> {
    match raw.status.as_u16() {
        200 => ApiResult::Ok(()),
        204 => ApiResult::NoContent,
        400 | 500 => ApiResult::Err(classify_error_body(raw)),
        status => ApiResult::Err(IamError::unexpected_status(
            raw.operation,
            status,
            &String::from_utf8_lossy(&raw.body),
        )),
    }
}

/// Surface the structured error carried by a 400/500 body.
fn classify_error_body(raw: &RawResponse) -> IamError {
    match serde_json::from_slice::<ErrorResponse>(&raw.body) {
        Ok(response) => IamError::Api(response.error),
        Err(err) => IamError::malformed_response(raw.operation, format!("error body: {err}")),
    }
}

impl IamClient {
    /// List tenants as a tagged result.
    pub async fn list_tenants_result(
        &self,
        subject_id: Option<&str>,
        cancel: &CancellationToken,
    ) -> ApiResult<Vec<Tenant>> {
        match self.list_tenants_response(subject_id, cancel).await {
            Ok(raw) => map_json(&raw),
            Err(err) => ApiResult::Err(err),
        }
    }

    /// Create a tenant as a tagged result.
    pub async fn create_tenant_result(
        &self,
        request: &CreateTenantRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<Tenant> {
        match self.create_tenant_response(request, cancel).await {
            Ok(raw) => map_json(&raw),
            Err(err) => ApiResult::Err(err),
        }
    }

    /// Fetch a tenant as a tagged result.
    pub async fn get_tenant_result(
        &self,
        tenant_id: Uuid,
        cancel: &CancellationToken,
    ) -> ApiResult<Tenant> {
        match self.get_tenant_response(tenant_id, cancel).await {
            Ok(raw) => map_json(&raw),
            Err(err) => ApiResult::Err(err),
        }
    }

    /// List accounts as a tagged result.
    pub async fn list_accounts_result(
        &self,
        cancel: &CancellationToken,
    ) -> ApiResult<Vec<Account>> {
        match self.list_accounts_response(cancel).await {
            Ok(raw) => map_json(&raw),
            Err(err) => ApiResult::Err(err),
        }
    }

    /// Batch ACL check as a tagged result.
    pub async fn check_access_result(
        &self,
        tenant_id: Uuid,
        request: &AclCheckRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<AclCheckResponse> {
        match self.check_access_response(tenant_id, request, cancel).await {
            Ok(raw) => map_json(&raw),
            Err(err) => ApiResult::Err(err),
        }
    }

    /// Grant access as a tagged result.
    pub async fn grant_access_result(
        &self,
        tenant_id: Uuid,
        subject_id: &str,
        cancel: &CancellationToken,
    ) -> ApiResult<()> {
        match self.grant_access_response(tenant_id, subject_id, cancel).await {
            Ok(raw) => map_unit(&raw),
            Err(err) => ApiResult::Err(err),
        }
    }

    /// Revoke access as a tagged result.
    pub async fn revoke_access_result(
        &self,
        tenant_id: Uuid,
        subject_id: &str,
        cancel: &CancellationToken,
    ) -> ApiResult<()> {
        match self.revoke_access_response(tenant_id, subject_id, cancel).await {
            Ok(raw) => map_unit(&raw),
            Err(err) => ApiResult::Err(err),
        }
    }

    /// Current-user details as a tagged result.
    pub async fn get_user_info_result(
        &self,
        subject_id: Option<&str>,
        cancel: &CancellationToken,
    ) -> ApiResult<UserInfoResponse> {
        match self.get_user_info_response(subject_id, cancel).await {
            Ok(raw) => map_json(&raw),
            Err(err) => ApiResult::Err(err),
        }
    }

    /// Legacy batch access check as a tagged result.
    pub async fn check_tenant_access_result(
        &self,
        tenant_id: Uuid,
        request: &CheckTenantAccessRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<CheckTenantAccessResponse> {
        match self.check_tenant_access_response(tenant_id, request, cancel).await {
            Ok(raw) => map_json(&raw),
            Err(err) => ApiResult::Err(err),
        }
    }

    /// Whether a single subject has access to the tenant.
    ///
    /// Wraps the batch ACL check with a one-element subject set and tests
    /// case-insensitive membership in the returned allowed set. A batch
    /// failure propagates unchanged; nothing is re-sent.
    pub async fn is_subject_allowed_result(
        &self,
        tenant_id: Uuid,
        subject_id: &str,
        cancel: &CancellationToken,
    ) -> ApiResult<bool> {
        if subject_id.trim().is_empty() {
            return ApiResult::Err(IamError::InvalidArgument(
                "subject_id must not be blank".to_string(),
            ));
        }

        let request = AclCheckRequest::single(subject_id);
        match self.check_access_result(tenant_id, &request, cancel).await {
            ApiResult::Ok(response) => ApiResult::Ok(response.allows(subject_id)),
            ApiResult::NoContent => ApiResult::NoContent,
            ApiResult::Err(err) => ApiResult::Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use tessera_domain::ErrorDetail;

    use super::*;

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            operation: "list_tenants",
            status: StatusCode::from_u16(status).unwrap(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_200_parses_declared_type() {
        let raw = raw(
            200,
            r#"[{"tenantId":"6f9e1b9e-8c53-4a3e-9d20-0a4a70a7c9d1","name":"Acme"}]"#,
        );
        let result: ApiResult<Vec<Tenant>> = map_json(&raw);
        match result {
            ApiResult::Ok(tenants) => {
                assert_eq!(tenants.len(), 1);
                assert_eq!(tenants[0].name, "Acme");
            }
            other => panic!("expected Ok, got {other:?}"),
        }
    }

    #[test]
    fn test_200_with_unparseable_body_is_malformed_response() {
        let raw = raw(200, r#"[{"name":"missing id"}]"#);
        let result: ApiResult<Vec<Tenant>> = map_json(&raw);
        match result {
            ApiResult::Err(IamError::MalformedResponse { operation, .. }) => {
                assert_eq!(operation, "list_tenants");
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn test_204_is_no_content_not_empty_value() {
        let raw = raw(204, "");
        let result: ApiResult<Vec<Tenant>> = map_json(&raw);
        assert!(result.is_no_content());
        assert_ne!(result, ApiResult::Ok(vec![]));
    }

    #[test]
    fn test_400_and_500_surface_embedded_error() {
        for status in [400, 500] {
            let raw = raw(status, r#"{"error":{"code":"invalid_tenant","message":"nope"}}"#);
            let result: ApiResult<Vec<Tenant>> = map_json(&raw);
            match result {
                ApiResult::Err(IamError::Api(detail)) => {
                    assert_eq!(
                        detail,
                        ErrorDetail::new("invalid_tenant").with_message("nope"),
                        "status {status}"
                    );
                }
                other => panic!("expected Api error for {status}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_400_with_unparseable_body_is_malformed_response() {
        let raw = raw(400, "not json");
        let result: ApiResult<Vec<Tenant>> = map_json(&raw);
        assert!(matches!(result, ApiResult::Err(IamError::MalformedResponse { .. })));
    }

    #[test]
    fn test_other_status_is_unexpected_with_operation_and_snippet() {
        let raw = raw(418, "short and stout");
        let result: ApiResult<Vec<Tenant>> = map_json(&raw);
        match result {
            ApiResult::Err(IamError::UnexpectedStatus { operation, status, body }) => {
                assert_eq!(operation, "list_tenants");
                assert_eq!(status, 418);
                assert_eq!(body, "short and stout");
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[test]
    fn test_unit_mapping_accepts_200_and_204() {
        assert_eq!(map_unit(&raw(200, "")), ApiResult::Ok(()));
        assert_eq!(map_unit(&raw(204, "")), ApiResult::NoContent);
        assert!(matches!(
            map_unit(&raw(403, "forbidden")),
            ApiResult::Err(IamError::UnexpectedStatus { status: 403, .. })
        ));
    }
}
