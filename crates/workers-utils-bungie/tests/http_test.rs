//! Integration tests for the platform transport and envelope handling.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use workers_utils_bungie::model::{DestinyManifest, PlatformErrorCode};
use workers_utils_bungie::{BungieConfig, BungieError, BungieHttpClient};
use workers_utils_common::PublicMessage;

fn config(server: &MockServer) -> BungieConfig {
    BungieConfig::new("test-key", "https://bot.example.com")
        .with_base_url(format!("{}/Platform", server.uri()))
        .with_www_url(server.uri())
}

fn envelope(response: Value) -> Value {
    json!({
        "Response": response,
        "ErrorCode": 1,
        "ThrottleSeconds": 0,
        "ErrorStatus": "Success",
        "Message": "Ok",
        "MessageData": {}
    })
}

#[tokio::test]
async fn test_get_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Platform/Destiny2/Manifest/"))
        .and(header("x-api-key", "test-key"))
        .and(header("origin", "https://bot.example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "version": "224575.24.05.16",
            "jsonWorldComponentContentPaths": {}
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let client = BungieHttpClient::new(&config(&server)).expect("Failed to build client");
    let manifest = client
        .get::<DestinyManifest>("/Destiny2/Manifest/", &[])
        .await
        .expect("Request failed");

    assert_eq!(manifest.error_code, PlatformErrorCode::SUCCESS);
    assert_eq!(manifest.response.version, "224575.24.05.16");

    let requests = server.received_requests().await.expect("Recording enabled");
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_access_token_sends_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Platform/User/GetMembershipsForCurrentUser/"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({}))))
        .expect(1)
        .mount(&server)
        .await;

    let client = BungieHttpClient::new(&config(&server).with_access_token("user-token"))
        .expect("Failed to build client");
    client
        .get::<Value>("/User/GetMembershipsForCurrentUser/", &[])
        .await
        .expect("Request failed");
}

#[tokio::test]
async fn test_params_override_path_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Platform/Destiny2/3/Profile/1/"))
        .and(query_param("components", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({}))))
        .expect(1)
        .mount(&server)
        .await;

    let client = BungieHttpClient::new(&config(&server)).expect("Failed to build client");
    client
        .get::<Value>(
            "/Destiny2/3/Profile/1/?components=100",
            &[("components", "200".to_string())],
        )
        .await
        .expect("Request failed");

    let requests = server.received_requests().await.expect("Recording enabled");
    assert_eq!(requests[0].url.query(), Some("components=200"));
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Platform/User/Search/GlobalName/0/"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"displayNamePrefix": "guardian"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "searchResults": [],
            "page": 0,
            "hasMore": false
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let client = BungieHttpClient::new(&config(&server)).expect("Failed to build client");
    let response = client
        .post::<Value, _>(
            "/User/Search/GlobalName/0/",
            &[],
            &json!({"displayNamePrefix": "guardian"}),
        )
        .await
        .expect("Request failed");
    assert_eq!(response.response["hasMore"], json!(false));
}

#[tokio::test]
async fn test_system_disabled_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Platform/Settings/"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "ErrorCode": 5,
            "ThrottleSeconds": 0,
            "ErrorStatus": "SystemDisabled",
            "Message": "This system is temporarily disabled for maintenance.",
            "MessageData": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BungieHttpClient::new(&config(&server)).expect("Failed to build client");
    let err = client
        .get::<Value>("/Settings/", &[])
        .await
        .expect_err("Disabled system should fail");

    assert_eq!(err.error_code(), Some(PlatformErrorCode::SYSTEM_DISABLED));
    assert_eq!(err.to_string(), "5: SystemDisabled");
    assert_eq!(
        err.public_message(),
        Some("The Bungie API is currently disabled.")
    );
    let BungieError::Api(api) = err else {
        panic!("Expected an API error");
    };
    assert_eq!(
        api.message,
        "This system is temporarily disabled for maintenance."
    );
}

#[tokio::test]
async fn test_envelope_error_on_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Platform/Destiny2/3/Profile/1/LinkedProfiles/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ErrorCode": 1601,
            "ErrorStatus": "DestinyAccountNotFound",
            "Message": "We were unable to find your Destiny account information."
        })))
        .mount(&server)
        .await;

    let client = BungieHttpClient::new(&config(&server)).expect("Failed to build client");
    let err = client
        .get::<Value>("/Destiny2/3/Profile/1/LinkedProfiles/", &[])
        .await
        .expect_err("Envelope error should fail");
    assert_eq!(
        err.error_code(),
        Some(PlatformErrorCode::DESTINY_ACCOUNT_NOT_FOUND)
    );
    assert_eq!(err.public_message(), None);
}

#[tokio::test]
async fn test_non_envelope_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Platform/Settings/"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({"error": "bad gateway"})))
        .mount(&server)
        .await;

    let client = BungieHttpClient::new(&config(&server)).expect("Failed to build client");
    let err = client
        .get::<Value>("/Settings/", &[])
        .await
        .expect_err("502 should fail");

    match err {
        BungieError::Status { status, body, .. } => {
            assert_eq!(status.as_u16(), 502);
            assert_eq!(body, r#"{"error":"bad gateway"}"#);
        }
        other => panic!("Expected a status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Platform/Settings/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = BungieHttpClient::new(&config(&server)).expect("Failed to build client");
    let err = client
        .get::<Value>("/Settings/", &[])
        .await
        .expect_err("HTML should fail");

    assert!(matches!(err, BungieError::Parse { .. }));
    assert_eq!(
        err.to_string(),
        "Could not parse response text to JSON: `<html>maintenance</html>`"
    );
}

#[tokio::test]
async fn test_get_content_reads_raw_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/common/destiny2_content/json/en/DestinyActivityDefinition.json"))
        .and(header("x-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "123": {"displayProperties": {"name": "Vault of Glass"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BungieHttpClient::new(&config(&server)).expect("Failed to build client");
    let table: Value = client
        .get_content("/common/destiny2_content/json/en/DestinyActivityDefinition.json")
        .await
        .expect("Request failed");
    assert_eq!(
        table.pointer("/123/displayProperties/name"),
        Some(&json!("Vault of Glass"))
    );
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Bound address");
    drop(listener);

    let config = BungieConfig::new("test-key", "https://bot.example.com")
        .with_base_url(format!("http://{addr}/Platform"));
    let client = BungieHttpClient::new(&config).expect("Failed to build client");
    let err = client
        .get::<Value>("/Destiny2/Manifest/", &[])
        .await
        .expect_err("Refused connection should fail");

    assert!(matches!(err, BungieError::Transport(_)));
    assert_eq!(err.error_code(), None);
    assert_eq!(err.public_message(), None);
}
