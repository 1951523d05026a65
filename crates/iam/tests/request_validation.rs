//! Wire-convention tests: api-version, subscription key, bearer auth,
//! interceptor effects.

mod support;

use std::sync::Arc;

use async_trait::async_trait;
use support::client_for;
use tessera_domain::Result;
use tessera_iam::{IamClient, Operation, RequestInterceptor, StaticTokenProvider};
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn default_api_version_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tenants"))
        .and(query_param("api-version", "2019-09-01"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.list_tenants(None, &CancellationToken::new()).await.expect("success");
}

#[tokio::test]
async fn custom_api_version_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tenants"))
        .and(query_param("api-version", "2024-06-01"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = IamClient::builder()
        .base_url(Url::parse(&server.uri()).expect("uri"))
        .api_version("2024-06-01")
        .build()
        .expect("client");
    client.list_tenants(None, &CancellationToken::new()).await.expect("success");
}

#[tokio::test]
async fn subscription_key_absent_when_not_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tenants"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.list_tenants(None, &CancellationToken::new()).await.expect("success");

    let requests = server.received_requests().await.expect("recorded requests");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("Subscription-Key").is_none());
}

#[tokio::test]
async fn subscription_key_sent_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tenants"))
        .and(header("Subscription-Key", "secret-key"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = IamClient::builder()
        .base_url(Url::parse(&server.uri()).expect("uri"))
        .api_key("secret-key")
        .build()
        .expect("client");
    client.list_tenants(None, &CancellationToken::new()).await.expect("success");
}

#[tokio::test]
async fn custom_api_key_header_name_is_honored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tenants"))
        .and(header("X-Api-Key", "secret-key"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = IamClient::builder()
        .base_url(Url::parse(&server.uri()).expect("uri"))
        .api_key("secret-key")
        .api_key_header("X-Api-Key")
        .build()
        .expect("client");
    client.list_tenants(None, &CancellationToken::new()).await.expect("success");

    let requests = server.received_requests().await.expect("recorded requests");
    assert!(requests[0].headers.get("Subscription-Key").is_none());
}

#[tokio::test]
async fn bearer_token_is_attached_by_the_auth_interceptor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tenants"))
        .and(header("Authorization", "Bearer access-token-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = IamClient::builder()
        .base_url(Url::parse(&server.uri()).expect("uri"))
        .token_provider(Arc::new(StaticTokenProvider::new("access-token-1")))
        .build()
        .expect("client");
    client.list_tenants(None, &CancellationToken::new()).await.expect("success");
}

struct CorrelationId(&'static str);

#[async_trait]
impl RequestInterceptor for CorrelationId {
    async fn before_send(
        &self,
        _operation: Operation,
        request: &mut reqwest::Request,
    ) -> Result<()> {
        request.headers_mut().insert(
            reqwest::header::HeaderName::from_static("x-correlation-id"),
            reqwest::header::HeaderValue::from_static(self.0),
        );
        Ok(())
    }
}

#[tokio::test]
async fn interceptor_mutations_are_visible_on_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tenants"))
        .and(header("x-correlation-id", "trace-42"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = IamClient::builder()
        .base_url(Url::parse(&server.uri()).expect("uri"))
        .interceptor(Arc::new(CorrelationId("trace-42")))
        .build()
        .expect("client");
    client.list_tenants(None, &CancellationToken::new()).await.expect("success");
}

#[tokio::test]
async fn per_operation_interceptor_only_fires_for_its_operation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = IamClient::builder()
        .base_url(Url::parse(&server.uri()).expect("uri"))
        .operation_interceptor(Operation::ListAccounts, Arc::new(CorrelationId("accounts-only")))
        .build()
        .expect("client");

    let cancel = CancellationToken::new();
    client.list_tenants(None, &cancel).await.expect("tenants");
    client.list_accounts(&cancel).await.expect("accounts");

    let requests = server.received_requests().await.expect("recorded requests");
    assert_eq!(requests.len(), 2);
    let tenants_request =
        requests.iter().find(|r| r.url.path() == "/tenants").expect("tenants request");
    let accounts_request =
        requests.iter().find(|r| r.url.path() == "/accounts").expect("accounts request");
    assert!(tenants_request.headers.get("x-correlation-id").is_none());
    assert_eq!(
        accounts_request.headers.get("x-correlation-id").map(|v| v.to_str().unwrap()),
        Some("accounts-only")
    );
}
