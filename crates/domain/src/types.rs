//! Request and response types exchanged with the IAM API
//!
//! Property names follow the wire contract exactly; everything here is a
//! plain value object constructed either by the caller or by response
//! deserialization.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tenant known to the IAM service.
///
/// Both fields are mandatory on deserialization: a body missing `tenantId`
/// or `name` fails to parse instead of producing a defaulted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub tenant_id: Uuid,
    pub name: String,
}

/// An account known to the IAM service.
///
/// The accounts listing returns these; both fields are mandatory on parse,
/// mirroring [`Tenant`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: Uuid,
    pub name: String,
}

/// Body for the create-tenant operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CreateTenantRequest {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()) }
    }
}

/// Subjects to check for tenant access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AclCheckRequest {
    #[serde(default)]
    pub subject_ids: BTreeSet<String>,
}

impl AclCheckRequest {
    /// Request carrying a single subject.
    pub fn single(subject_id: impl Into<String>) -> Self {
        let mut subject_ids = BTreeSet::new();
        subject_ids.insert(subject_id.into());
        Self { subject_ids }
    }
}

/// The subset of checked subjects that have access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AclCheckResponse {
    #[serde(default)]
    pub subject_ids: BTreeSet<String>,
}

impl AclCheckResponse {
    /// Case-insensitive membership test against the allowed set.
    pub fn allows(&self, subject_id: &str) -> bool {
        self.subject_ids.iter().any(|s| s.eq_ignore_ascii_case(subject_id))
    }
}

/// Legacy batch access-check request; ordered user id list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckTenantAccessRequest {
    #[serde(default, rename = "userIds")]
    pub user_ids: Vec<String>,
}

/// Legacy batch access-check response; ordered value list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckTenantAccessResponse {
    #[serde(default)]
    pub values: Vec<String>,
}

/// Details about the currently authenticated user.
///
/// Every field is independently optional on the wire; the confirmation
/// flags default to `false` when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenants: Option<Vec<Tenant>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub phone_confirmed: bool,
}

/// Structured error embedded in 400/500 response bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_error: Option<Box<ErrorDetail>>,
}

impl ErrorDetail {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into(), message: None, target: None, inner_error: None }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.code, message),
            None => write!(f, "{}", self.code),
        }
    }
}

/// Envelope every 4xx/5xx body is expected to conform to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_parses_with_both_fields() {
        let tenant: Tenant = serde_json::from_str(
            r#"{"tenantId":"6f9e1b9e-8c53-4a3e-9d20-0a4a70a7c9d1","name":"Acme"}"#,
        )
        .unwrap();
        assert_eq!(tenant.name, "Acme");
        assert_eq!(tenant.tenant_id.to_string(), "6f9e1b9e-8c53-4a3e-9d20-0a4a70a7c9d1");
    }

    #[test]
    fn test_tenant_rejects_missing_name() {
        let result: Result<Tenant, _> =
            serde_json::from_str(r#"{"tenantId":"6f9e1b9e-8c53-4a3e-9d20-0a4a70a7c9d1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_tenant_rejects_null_name() {
        let result: Result<Tenant, _> = serde_json::from_str(
            r#"{"tenantId":"6f9e1b9e-8c53-4a3e-9d20-0a4a70a7c9d1","name":null}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_create_tenant_request_omits_absent_name() {
        let body = serde_json::to_string(&CreateTenantRequest::default()).unwrap();
        assert_eq!(body, "{}");

        let body = serde_json::to_string(&CreateTenantRequest::named("Acme")).unwrap();
        assert_eq!(body, r#"{"name":"Acme"}"#);
    }

    #[test]
    fn test_acl_check_request_serializes_subject_ids() {
        let request = AclCheckRequest::single("user-1");
        let body = serde_json::to_string(&request).unwrap();
        assert_eq!(body, r#"{"subjectIds":["user-1"]}"#);
    }

    #[test]
    fn test_acl_check_response_membership_is_case_insensitive() {
        let response: AclCheckResponse =
            serde_json::from_str(r#"{"subjectIds":["User-1","user-2"]}"#).unwrap();
        assert!(response.allows("user-1"));
        assert!(response.allows("USER-2"));
        assert!(!response.allows("user-3"));
    }

    #[test]
    fn test_acl_check_response_defaults_to_empty() {
        let response: AclCheckResponse = serde_json::from_str("{}").unwrap();
        assert!(response.subject_ids.is_empty());
    }

    #[test]
    fn test_legacy_check_uses_user_ids_and_values() {
        let request =
            CheckTenantAccessRequest { user_ids: vec!["a".to_string(), "b".to_string()] };
        let body = serde_json::to_string(&request).unwrap();
        assert_eq!(body, r#"{"userIds":["a","b"]}"#);

        let response: CheckTenantAccessResponse =
            serde_json::from_str(r#"{"values":["a"]}"#).unwrap();
        assert_eq!(response.values, vec!["a".to_string()]);
    }

    #[test]
    fn test_user_info_fields_are_independently_optional() {
        let info: UserInfoResponse =
            serde_json::from_str(r#"{"email":"dev@example.com"}"#).unwrap();
        assert_eq!(info.email.as_deref(), Some("dev@example.com"));
        assert_eq!(info.subject_id, None);
        assert_eq!(info.tenants, None);
        assert!(!info.email_confirmed);
        assert!(!info.phone_confirmed);
    }

    #[test]
    fn test_user_info_parses_nested_tenants() {
        let info: UserInfoResponse = serde_json::from_str(
            r#"{
                "tenants":[{"tenantId":"6f9e1b9e-8c53-4a3e-9d20-0a4a70a7c9d1","name":"Acme"}],
                "subjectId":"sub-1",
                "emailConfirmed":true
            }"#,
        )
        .unwrap();
        assert_eq!(info.tenants.as_ref().map(Vec::len), Some(1));
        assert!(info.email_confirmed);
    }

    #[test]
    fn test_error_response_round_trip() {
        let response: ErrorResponse = serde_json::from_str(
            r#"{"error":{"code":"invalid_tenant","message":"unknown tenant","innerError":{"code":"not_found"}}}"#,
        )
        .unwrap();
        assert_eq!(response.error.code, "invalid_tenant");
        assert_eq!(response.error.message.as_deref(), Some("unknown tenant"));
        assert_eq!(response.error.inner_error.as_ref().map(|e| e.code.as_str()), Some("not_found"));
    }

    #[test]
    fn test_error_detail_display() {
        let detail = ErrorDetail::new("invalid_tenant").with_message("unknown tenant");
        assert_eq!(detail.to_string(), "invalid_tenant: unknown tenant");
        assert_eq!(ErrorDetail::new("invalid_tenant").to_string(), "invalid_tenant");
    }
}
