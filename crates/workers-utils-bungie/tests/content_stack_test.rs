//! Integration tests for the ContentStack news feed.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use workers_utils_bungie::{ArticleKind, BungieError, ContentStackClient, ContentStackSettings};
use workers_utils_common::HttpClient;

fn settings() -> ContentStackSettings {
    ContentStackSettings {
        api_key: "blt-key".to_string(),
        env: "live".to_string(),
        delivery_token: "cs-token".to_string(),
    }
}

fn client(server: &MockServer) -> ContentStackClient {
    ContentStackClient::new(HttpClient::new().expect("Failed to build transport"))
        .with_base_url(server.uri())
}

fn item(title: &str, hosted_url: &str) -> Value {
    json!({
        "title": title,
        "subtitle": "  Patch notes inside  ",
        "date": "2024-05-16T17:00:00.000Z",
        "author": "Destiny 2 Team",
        "system": {"uid": "blt1", "publish_details": {"time": "2024-05-16T17:05:00.000Z"}},
        "url": {"hosted_url": hosted_url}
    })
}

#[tokio::test]
async fn test_latest_articles() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stacks/blt-key"))
        .and(query_param("environment", "live"))
        .and(header("access_token", "cs-token"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "articles": {
                    "items": [
                        item("Destiny 2 Hotfix 7.3.6.2", "/hotfix_7_3_6_2"),
                        item("This Week in Destiny", "/twid_05_16_2024"),
                    ],
                    "total": 2
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let since = Utc.with_ymd_and_hms(2024, 5, 9, 0, 0, 0).unwrap();
    let articles = client(&server)
        .latest_articles(&settings(), Some(since))
        .await
        .expect("Articles expected");

    assert_eq!(articles.len(), 2);
    assert_eq!(
        articles[0].kind,
        ArticleKind::Hotfix {
            number: "7.3.6.2".to_string()
        }
    );
    assert_eq!(
        articles[0].url,
        "https://www.bungie.net/7/en/news/article/hotfix_7_3_6_2"
    );
    assert_eq!(articles[1].kind, ArticleKind::News);
    assert_eq!(articles[1].subtitle, "Patch notes inside");

    let requests = server.received_requests().await.expect("Recording enabled");
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["variables"]["date"], "2024-05-09T00:00:00.000Z");
    assert!(
        body["query"]
            .as_str()
            .is_some_and(|query| query.contains("all_news_article"))
    );
}

#[tokio::test]
async fn test_unexpected_payload_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stacks/blt-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"message": "Field 'all_news_article' doesn't exist"}]
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .latest_articles(&settings(), None)
        .await
        .expect_err("GraphQL errors should fail");
    assert!(matches!(err, BungieError::Parse { .. }));
}
