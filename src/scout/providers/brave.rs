// src/scout/providers/brave.rs
//! Brave Web Search API provider.
//!
//! `GET {base}/res/v1/web/search?q=..&count=..&freshness=..` with the
//! subscription token in `X-Subscription-Token`.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::ScoutSettings;
use crate::scout::error::SearchError;
use crate::scout::types::{SearchHit, SearchOptions, SearchProvider};

const SEARCH_PATH: &str = "/res/v1/web/search";
const TOKEN_HEADER: &str = "X-Subscription-Token";
const ERROR_BODY_MAX: usize = 200;

#[derive(Debug, Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: Option<WebSection>,
}

#[derive(Debug, Deserialize)]
struct WebSection {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Debug, Deserialize)]
struct BraveResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    page_age: Option<String>,
    #[serde(default)]
    age: Option<String>,
}

/// Parse a Brave web-search JSON body into hits.
/// A body without a `web` section (no results) yields an empty list.
pub fn parse_response(body: &str) -> Result<Vec<SearchHit>, SearchError> {
    let resp: BraveResponse =
        serde_json::from_str(body).map_err(|e| SearchError::Decode(e.to_string()))?;
    let results = resp.web.map(|w| w.results).unwrap_or_default();

    Ok(results
        .into_iter()
        .map(|r| SearchHit {
            title: r.title,
            url: r.url,
            description: r.description,
            published_age: r.page_age.or(r.age),
        })
        .collect())
}

pub struct BraveSearchProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl BraveSearchProvider {
    pub fn new(api_key: impl Into<String>, settings: &ScoutSettings) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("mission-scout/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4).min(settings.http_timeout))
            .timeout(settings.http_timeout)
            .build()
            .map_err(|e| SearchError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: settings.api_base.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Point at another host (tests, proxies).
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base_url = base.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl SearchProvider for BraveSearchProvider {
    async fn search(&self, text: &str, opts: &SearchOptions) -> Result<Vec<SearchHit>, SearchError> {
        if self.api_key.is_empty() {
            return Err(SearchError::Config("missing subscription token".into()));
        }

        let count = opts.count.to_string();
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, SEARCH_PATH))
            .header(TOKEN_HEADER, &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("q", text),
                ("count", count.as_str()),
                ("freshness", opts.freshness.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(SearchError::Http {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_MAX).collect(),
            });
        }

        parse_response(&body)
    }

    fn name(&self) -> &'static str {
        "brave"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_results_and_prefers_page_age() {
        let body = r#"{
            "type": "search",
            "web": { "results": [
                { "title": "A", "url": "https://a.test", "description": "d", "page_age": "2025-03-01T10:00:00", "age": "2 days ago" },
                { "title": "B", "url": "https://b.test", "age": "5 hours ago" },
                { "title": "C", "url": "https://c.test" }
            ]}
        }"#;
        let hits = parse_response(body).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].published_age.as_deref(), Some("2025-03-01T10:00:00"));
        assert_eq!(hits[1].published_age.as_deref(), Some("5 hours ago"));
        assert_eq!(hits[1].description, "");
        assert_eq!(hits[2].published_age, None);
    }

    #[test]
    fn missing_web_section_is_empty() {
        assert!(parse_response(r#"{"type":"search","query":{"original":"x"}}"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn garbage_is_decode_error() {
        let err = parse_response("<html>nope</html>").unwrap_err();
        assert!(matches!(err, SearchError::Decode(_)));
    }

    #[tokio::test]
    async fn empty_key_is_config_error_without_network() {
        let p = BraveSearchProvider::new("", &ScoutSettings::default())
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let opts = SearchOptions {
            count: 5,
            freshness: "pw".into(),
        };
        let err = p.search("x", &opts).await.unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }
}
