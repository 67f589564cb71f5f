//! Integration tests for the request dispatcher.
//!
//! Each test runs the dispatcher against a wiremock server standing in for
//! the Discord API.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::io;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use workers_utils_discord::dispatch::{
    Dispatcher, Method, NoBody, NoQuery, OptionalBody, RequiredBody,
};
use workers_utils_discord::{DiscordConfig, DiscordError, routes};

#[derive(Debug, Deserialize, PartialEq)]
struct IdOnly {
    id: String,
}

#[derive(Debug, Serialize)]
struct Content {
    content: String,
}

#[derive(Debug, Default, Serialize)]
struct Page {
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    with_counts: Option<bool>,
}

fn dispatcher(server: &MockServer) -> Arc<Dispatcher> {
    let config = DiscordConfig::new("test-token", "app-1").with_api_base(server.uri());
    Arc::new(Dispatcher::new(&config).expect("Failed to build dispatcher"))
}

/// Writer collecting formatted log output for assertions
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_get_without_body_or_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/guilds/g1"))
        .and(header("authorization", "Bot test-token"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":"g1"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let get_guild = dispatcher(&server)
        .build_handler::<NoBody, IdOnly, NoQuery>(Method::Get)
        .route(routes::guild);

    let result = get_guild.call(["g1"], None).await.expect("Request failed");
    assert_eq!(result, Some(IdOnly { id: "g1".to_string() }));

    let requests = server.received_requests().await.expect("Recording enabled");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), None);
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/channels/c1/messages"))
        .and(body_json(json!({"content": "hi"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "m1",
            "channel_id": "c1",
            "content": "hi"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let post_message = dispatcher(&server)
        .build_handler::<OptionalBody<Content>, Value, NoQuery>(Method::Post)
        .route(routes::channel_messages);

    let body = Content {
        content: "hi".to_string(),
    };
    let result = post_message
        .call(["c1"], Some(&body), None)
        .await
        .expect("Request failed");

    assert_eq!(
        result,
        Some(json!({"id": "m1", "channel_id": "c1", "content": "hi"}))
    );
}

#[tokio::test]
async fn test_no_content_resolves_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/channels/c1/messages/m1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let delete_message = dispatcher(&server)
        .build_handler::<NoBody, IdOnly, NoQuery>(Method::Delete)
        .route(routes::channel_message);

    let result = delete_message
        .call(["c1", "m1"], None)
        .await
        .expect("Request failed");
    assert_eq!(result, None);
}

#[tokio::test]
async fn test_error_status_keeps_status_and_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/guilds/g1"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .expect(1)
        .mount(&server)
        .await;

    let get_guild = dispatcher(&server)
        .build_handler::<NoBody, IdOnly, NoQuery>(Method::Get)
        .route(routes::guild);

    let err = get_guild.call(["g1"], None).await.expect_err("Should fail");
    let DiscordError::Response(response) = &err else {
        panic!("Expected a response error, got {err:?}");
    };
    assert_eq!(response.status.as_u16(), 403);
    assert_eq!(response.status_text, "Forbidden");
    assert_eq!(response.response_text, "Forbidden");
    assert_eq!(response.url.path(), "/guilds/g1");
    assert_eq!(err.to_string(), "403 Forbidden: Forbidden");
}

#[tokio::test]
async fn test_error_status_with_json_body_is_still_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/guilds/g1"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string(r#"{"message": "Unknown Guild", "code": 10004}"#),
        )
        .mount(&server)
        .await;

    let get_guild = dispatcher(&server)
        .build_handler::<NoBody, IdOnly, NoQuery>(Method::Get)
        .route(routes::guild);

    let err = get_guild.call(["g1"], None).await.expect_err("Should fail");
    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
    assert_eq!(
        err.response_text(),
        Some(r#"{"message": "Unknown Guild", "code": 10004}"#)
    );
}

#[tokio::test]
async fn test_invalid_json_logs_and_fails_to_parse() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/guilds/g1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let get_guild = dispatcher(&server)
        .build_handler::<NoBody, IdOnly, NoQuery>(Method::Get)
        .route(routes::guild);

    let err = get_guild.call(["g1"], None).await.expect_err("Should fail");
    assert!(matches!(err, DiscordError::Parse { .. }));
    assert_eq!(err.response_text(), Some("not json"));
    assert_eq!(err.status(), None);

    let output = logs.contents();
    assert!(output.contains("ERROR"), "no error log in: {output}");
    assert!(output.contains("`not json`"), "raw text not logged in: {output}");
}

#[tokio::test]
async fn test_get_body_becomes_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/guilds/g1/members"))
        .and(query_param("limit", "100"))
        .and(query_param("after", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let get_members = dispatcher(&server)
        .build_handler::<OptionalBody<Page>, Vec<Value>, NoQuery>(Method::Get)
        .route(routes::guild_members);

    let page = Page {
        limit: Some(100),
        after: Some("42".to_string()),
        with_counts: None,
    };
    let result = get_members
        .call(["g1"], Some(&page), None)
        .await
        .expect("Request failed");
    assert_eq!(result, Some(Vec::new()));

    let requests = server.received_requests().await.expect("Recording enabled");
    assert!(requests[0].body.is_empty());
    assert!(!requests[0].url.as_str().contains("with_counts"));
}

#[tokio::test]
async fn test_post_merges_query_params() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhooks/w1/tok"))
        .and(query_param("wait", "true"))
        .and(body_json(json!({"content": "hello"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "m9"})))
        .expect(1)
        .mount(&server)
        .await;

    #[derive(Serialize)]
    struct Wait {
        wait: bool,
    }

    let post_webhook = dispatcher(&server)
        .build_handler::<OptionalBody<Content>, IdOnly, Wait>(Method::Post)
        .route(routes::webhook);

    let body = Content {
        content: "hello".to_string(),
    };
    let result = post_webhook
        .call(["w1", "tok"], Some(&body), Some(&Wait { wait: true }))
        .await
        .expect("Request failed");
    assert_eq!(result, Some(IdOnly { id: "m9".to_string() }));
}

#[tokio::test]
async fn test_query_overrides_get_body_on_collision() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/@me/guilds"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let get_guilds = dispatcher(&server)
        .build_handler::<OptionalBody<Page>, Vec<Value>, Page>(Method::Get)
        .route(routes::user_guilds);

    let body = Page {
        limit: Some(10),
        with_counts: Some(false),
        ..Page::default()
    };
    let query = Page {
        limit: Some(50),
        ..Page::default()
    };
    get_guilds
        .call([], Some(&body), Some(&query))
        .await
        .expect("Request failed");

    let requests = server.received_requests().await.expect("Recording enabled");
    let pairs: Vec<(String, String)> = requests[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("limit".to_string(), "50".to_string()),
            ("with_counts".to_string(), "false".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_required_body_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/applications/app-1/role-connections/metadata"))
        .and(body_json(json!([{"content": "a"}, {"content": "b"}])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let put_metadata = dispatcher(&server)
        .build_handler::<RequiredBody<Vec<Content>>, Vec<Value>, NoQuery>(Method::Put)
        .route(|[app]: [&str; 1]| routes::application_role_connection_metadata([app]));

    let body = vec![
        Content {
            content: "a".to_string(),
        },
        Content {
            content: "b".to_string(),
        },
    ];
    put_metadata
        .call(["app-1"], &body, None)
        .await
        .expect("Request failed");
}

#[tokio::test]
async fn test_repeated_get_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":"c1"}"#))
        .expect(2)
        .mount(&server)
        .await;

    let get_channel = dispatcher(&server)
        .build_handler::<NoBody, IdOnly, NoQuery>(Method::Get)
        .route(routes::channel);

    let first = get_channel.call(["c1"], None).await.expect("Request failed");
    let second = get_channel.call(["c1"], None).await.expect("Request failed");
    assert_eq!(first, second);
    assert_eq!(
        server.received_requests().await.expect("Recording enabled").len(),
        2
    );
}

/// Address that refuses connections: bound once, then released
fn closed_local_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Bound address");
    drop(listener);
    format!("http://{addr}")
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    let config = DiscordConfig::new("test-token", "app-1").with_api_base(closed_local_address());
    let get_guild = Arc::new(Dispatcher::new(&config).expect("Failed to build dispatcher"))
        .build_handler::<NoBody, IdOnly, NoQuery>(Method::Get)
        .route(routes::guild);

    let err = get_guild
        .call(["g1"], None)
        .await
        .expect_err("Refused connection should fail");

    assert!(matches!(err, DiscordError::Transport(_)));
    assert_eq!(err.status(), None);
    assert_eq!(err.response_text(), None);
}
