//! Bungie news articles from ContentStack
//!
//! Bungie.net publishes its news through ContentStack's GraphQL delivery
//! API. The credentials are not secret: they are handed out in the
//! platform's common settings under `systems.ContentStack.parameters`.

use chrono::{DateTime, Duration, FixedOffset, SecondsFormat, Utc};
use regex::Regex;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::LazyLock;
use url::Url;
use workers_utils_common::HttpClient;

use crate::error::{BungieError, Result};
use crate::model::CoreSettingsConfiguration;

pub const GRAPHQL_BASE_URL: &str = "https://graphql.contentstack.com";
pub const ARTICLE_URL_PREFIX: &str = "https://www.bungie.net/7/en/news/article";

/// Bungie dates its posts in Pacific time; standard time is used all year
const PACIFIC_OFFSET_SECS: i32 = 8 * 3600;

const LATEST_ARTICLES_QUERY: &str = r"
query ($date: String) {
  articles: all_news_article(where: {date_gt: $date}) {
    items {
      title
      subtitle
      date
      author
      system {
        uid
        publish_details {
          time
        }
      }
      url {
        hosted_url
      }
    }
    total
  }
}
";

#[allow(clippy::expect_used)]
static TWAB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^This Week At Bungie\b").expect("TWAB pattern is valid"));
#[allow(clippy::expect_used)]
static HOTFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^Destiny 2 Hotfix ([\d+.]+)$").expect("hotfix pattern is valid")
});
#[allow(clippy::expect_used)]
static UPDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^Destiny 2 Update ([\d+.]+)$").expect("update pattern is valid")
});
#[allow(clippy::expect_used)]
static ENV_PLUS_DELIVERY_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{(.+?)\}\{(.+?)\}$").expect("delivery token pattern is valid")
});

/// Credentials for the ContentStack delivery API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentStackSettings {
    pub api_key: String,
    pub env: String,
    pub delivery_token: String,
}

impl ContentStackSettings {
    /// Extract the credentials from the platform's common settings
    ///
    /// `EnvPlusDeliveryToken` has the form `{env}{token}`.
    pub fn from_common_settings(settings: &CoreSettingsConfiguration) -> Result<Self> {
        let params = settings
            .systems
            .get("ContentStack")
            .map(|system| &system.parameters)
            .ok_or_else(|| BungieError::content_stack("ContentStack params missing"))?;

        let (Some(api_key), Some(env_plus_token)) =
            (params.get("ApiKey"), params.get("EnvPlusDeliveryToken"))
        else {
            return Err(BungieError::content_stack(
                "Missing ApiKey or EnvPlusDeliveryToken",
            ));
        };

        let captures = ENV_PLUS_DELIVERY_TOKEN.captures(env_plus_token).ok_or_else(|| {
            BungieError::content_stack(format!(
                "EnvPlusDeliveryToken format has changed: {env_plus_token}"
            ))
        })?;

        Ok(Self {
            api_key: api_key.clone(),
            env: captures[1].to_string(),
            delivery_token: captures[2].to_string(),
        })
    }
}

/// What an article announces
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ArticleKind {
    News,
    /// This Week At Bungie
    Twab,
    Hotfix {
        #[serde(rename = "hotfixNumber")]
        number: String,
    },
    Update {
        #[serde(rename = "updateNumber")]
        number: String,
    },
}

/// A cleaned-up news article
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub subtitle: String,
    pub url: String,
    pub author: String,
    /// `None` when the article's date does not parse
    pub date: Option<DateTime<Utc>>,
    pub publish_date: String,
    pub uid: String,
    #[serde(flatten)]
    pub kind: ArticleKind,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    title: String,
    subtitle: String,
    date: String,
    author: String,
    url: RawArticleUrl,
    system: RawArticleSystem,
}

#[derive(Debug, Deserialize)]
struct RawArticleUrl {
    hosted_url: String,
}

#[derive(Debug, Deserialize)]
struct RawArticleSystem {
    uid: String,
    publish_details: RawPublishDetails,
}

#[derive(Debug, Deserialize)]
struct RawPublishDetails {
    time: String,
}

#[derive(Debug, Deserialize)]
struct ArticlesResponse {
    data: ArticlesData,
}

#[derive(Debug, Deserialize)]
struct ArticlesData {
    articles: ArticleItems,
}

#[derive(Debug, Deserialize)]
struct ArticleItems {
    items: Vec<RawArticle>,
}

/// `Month D, YYYY` in Pacific standard time
fn pacific_date(date: Option<DateTime<Utc>>) -> String {
    let Some(date) = date else {
        return "Invalid Date".to_string();
    };
    match FixedOffset::west_opt(PACIFIC_OFFSET_SECS) {
        Some(pacific) => date.with_timezone(&pacific).format("%B %-d, %Y").to_string(),
        None => date.format("%B %-d, %Y").to_string(),
    }
}

impl From<RawArticle> for Article {
    fn from(raw: RawArticle) -> Self {
        let title = raw.title.trim().to_string();
        let date = DateTime::parse_from_rfc3339(raw.date.trim())
            .ok()
            .map(|date| date.with_timezone(&Utc));

        let (title, kind) = if TWAB.is_match(&title) {
            (format!("TWAB \u{2014} {}", pacific_date(date)), ArticleKind::Twab)
        } else if let Some(captures) = HOTFIX.captures(&title) {
            let number = captures[1].to_string();
            (
                format!("Destiny 2 Hotfix {number}"),
                ArticleKind::Hotfix { number },
            )
        } else if let Some(captures) = UPDATE.captures(&title) {
            let number = captures[1].to_string();
            (
                format!("Destiny 2 Update {number}"),
                ArticleKind::Update { number },
            )
        } else {
            (title, ArticleKind::News)
        };

        Self {
            title,
            subtitle: raw.subtitle.trim().to_string(),
            url: format!("{ARTICLE_URL_PREFIX}{}", raw.url.hosted_url.trim()),
            author: raw.author.trim().to_string(),
            date,
            publish_date: raw.system.publish_details.time.trim().to_string(),
            uid: raw.system.uid.trim().to_string(),
            kind,
        }
    }
}

/// Client for the news feed
#[derive(Debug, Clone)]
pub struct ContentStackClient {
    http: HttpClient,
    base_url: String,
}

impl ContentStackClient {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            base_url: GRAPHQL_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// News articles dated after `since`, one week ago by default
    pub async fn latest_articles(
        &self,
        settings: &ContentStackSettings,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Article>> {
        let since = since.unwrap_or_else(|| Utc::now() - Duration::days(7));

        let mut url = Url::parse(&format!("{}/stacks/{}", self.base_url, settings.api_key))?;
        url.query_pairs_mut().append_pair("environment", &settings.env);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("access_token"),
            HeaderValue::from_str(&settings.delivery_token)
                .map_err(|_| BungieError::InvalidHeader("access_token"))?,
        );

        let body = json!({
            "query": LATEST_ARTICLES_QUERY,
            "variables": {
                "date": since.to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        });

        tracing::info!(%url, "Fetching ContentStack articles");
        let response = self
            .http
            .inner()
            .post(url)
            .headers(headers)
            .body(serde_json::to_vec(&body)?)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(BungieError::Status {
                status,
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body: text,
            });
        }

        let parsed: ArticlesResponse = serde_json::from_str(&text).map_err(|source| {
            tracing::error!("Unexpected ContentStack response: `{text}`");
            BungieError::Parse {
                source,
                response_text: text.clone(),
            }
        })?;

        Ok(parsed
            .data
            .articles
            .items
            .into_iter()
            .map(Article::from)
            .collect())
    }
}
