// src/scout/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scout::error::SearchError;

/// A weighted search directive. On disk the text lives under `q`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Query {
    #[serde(rename = "q")]
    pub text: String,
    pub category: String, // e.g. "freelance", "bounty", "eco-solana"
    pub source: String,   // label only, e.g. "web"
    pub weight: f64,      // multiplier in (0, ~1.2]
}

impl Query {
    pub fn new(text: &str, category: &str, source: &str, weight: f64) -> Self {
        Self {
            text: text.to_string(),
            category: category.to_string(),
            source: source.to_string(),
            weight,
        }
    }
}

/// Raw provider result, never persisted on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub description: String,
    pub published_age: Option<String>, // ISO timestamp or "3 days ago"
}

/// A scored hit as written into the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub title: String,
    pub url: String,
    pub description: String,
    pub query: String,
    pub category: String,
    pub source: String,
    pub score: i32,
    pub scanned_at: DateTime<Utc>,
}

impl Opportunity {
    pub fn from_hit(hit: SearchHit, query: &Query, score: i32, scanned_at: DateTime<Utc>) -> Self {
        Self {
            title: hit.title,
            url: hit.url,
            description: hit.description,
            query: query.text.clone(),
            category: query.category.clone(),
            source: query.source.clone(),
            score,
            scanned_at,
        }
    }
}

/// The persisted artifact of one run; replaces the previous one wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultSnapshot {
    pub generated_at: DateTime<Utc>,
    pub total_queries: usize,
    pub total_results: usize,
    pub opportunities: Vec<Opportunity>,
}

/// Per-call knobs handed to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub count: usize,
    pub freshness: String, // provider recency filter, "pw" = past week
}

#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, text: &str, opts: &SearchOptions) -> Result<Vec<SearchHit>, SearchError>;
    fn name(&self) -> &'static str;
}
