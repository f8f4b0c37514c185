// src/config/queries.rs
//! Query list loading.
//!
//! Shape (JSON, or the equivalent TOML `[[scout.queries]]` tables):
//! ```json
//! { "scout": { "queries": [ { "q": "...", "category": "freelance", "source": "web", "weight": 1.0 } ] } }
//! ```
//! A missing, unreadable or unparseable file, or one without any usable
//! entry, yields [`default_queries`]. Bad entries are skipped one by one.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

use crate::scout::types::Query;

pub const DEFAULT_CONFIG_PATH: &str = "config/mission-control.json";

fn default_category() -> String {
    "general".to_string()
}
fn default_source() -> String {
    "web".to_string()
}
fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
struct RawQuery {
    q: String,
    #[serde(default = "default_category")]
    category: String,
    #[serde(default = "default_source")]
    source: String,
    #[serde(default = "default_weight")]
    weight: f64,
}

/// Built-in query set used whenever the config yields nothing usable.
pub fn default_queries() -> Vec<Query> {
    vec![
        Query::new("AI automation consultant Växjö", "local", "web", 1.2),
        Query::new("frilans utvecklare uppdrag Småland", "local", "web", 1.2),
        Query::new("freelance React developer remote Sweden", "freelance", "web", 1.0),
        Query::new("AI agent developer contract remote", "freelance", "web", 1.0),
        Query::new("LLM chatbot integration small business", "ai-services", "web", 0.9),
        Query::new("AI innovation grant startups Sweden", "funding", "web", 0.8),
        Query::new("AI hackathon prize pool", "competition", "web", 0.8),
        Query::new("Solana ecosystem developer grants", "eco-solana", "web", 0.9),
        Query::new("Ethereum ecosystem builder program", "eco-ethereum", "web", 0.9),
        Query::new("new bug bounty program launch", "bounty", "web", 1.0),
        Query::new("smart contract audit contest reward", "bounty", "web", 0.9),
    ]
}

/// Load the query list from `path`, never failing: falls back to defaults.
pub fn load_queries(path: &Path) -> Vec<Query> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(target: "scout::config", path = %path.display(), "no query config, using built-in defaults");
            return default_queries();
        }
        Err(e) => {
            warn!(target: "scout::config", path = %path.display(), error = %e, "query config unreadable, using built-in defaults");
            return default_queries();
        }
    };

    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match parse_queries(&content, &ext) {
        Ok(v) if !v.is_empty() => {
            info!(target: "scout::config", path = %path.display(), count = v.len(), "queries loaded");
            v
        }
        Ok(_) => {
            info!(target: "scout::config", path = %path.display(), "query config has no usable queries, using built-in defaults");
            default_queries()
        }
        Err(e) => {
            warn!(target: "scout::config", path = %path.display(), error = %e, "query config unparseable, using built-in defaults");
            default_queries()
        }
    }
}

/// Parse a config document. `Ok(vec![])` means "valid document, nothing usable".
pub fn parse_queries(s: &str, hint_ext: &str) -> Result<Vec<Query>> {
    let doc: Value = if hint_ext == "toml" {
        let t: toml::Table = toml::from_str(s)?;
        serde_json::to_value(t)?
    } else {
        serde_json::from_str(s)?
    };
    queries_from_value(&doc)
}

fn queries_from_value(doc: &Value) -> Result<Vec<Query>> {
    if !doc.is_object() {
        return Err(anyhow!("config root must be an object"));
    }
    let Some(list) = doc.get("scout").and_then(|s| s.get("queries")) else {
        return Ok(Vec::new());
    };
    let items = list
        .as_array()
        .ok_or_else(|| anyhow!("scout.queries must be an array"))?;

    let mut out = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match query_from_value(item) {
            Ok(q) => out.push(q),
            Err(e) => {
                warn!(target: "scout::config", index = idx, error = %e, "skipping malformed query entry");
            }
        }
    }
    Ok(out)
}

fn query_from_value(item: &Value) -> Result<Query> {
    let raw: RawQuery = serde_json::from_value(item.clone())?;
    let text = raw.q.trim();
    if text.is_empty() {
        return Err(anyhow!("empty query text"));
    }
    if !raw.weight.is_finite() || raw.weight <= 0.0 {
        return Err(anyhow!("weight must be a positive number, got {}", raw.weight));
    }
    Ok(Query {
        text: text.to_string(),
        category: raw.category.trim().to_string(),
        source: raw.source.trim().to_string(),
        weight: raw.weight,
    })
}
