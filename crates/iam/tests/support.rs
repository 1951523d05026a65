//! Shared helpers for the integration tests.

use serde_json::{json, Value};
use tessera_iam::IamClient;
use url::Url;
use uuid::Uuid;
use wiremock::MockServer;

/// Client with default configuration against the mock server.
pub fn client_for(server: &MockServer) -> IamClient {
    IamClient::builder()
        .base_url(Url::parse(&server.uri()).expect("mock server uri"))
        .build()
        .expect("client")
}

/// JSON body for a single tenant.
pub fn tenant_json(tenant_id: Uuid, name: &str) -> Value {
    json!({ "tenantId": tenant_id, "name": name })
}

/// JSON body for a structured API error.
pub fn error_json(code: &str, message: &str) -> Value {
    json!({ "error": { "code": code, "message": message } })
}
