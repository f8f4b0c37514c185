// src/config/settings.rs
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::config::queries::DEFAULT_CONFIG_PATH;

pub const DEFAULT_OUTPUT_PATH: &str = "data/scout-results.json";
pub const DEFAULT_MIN_SCORE: i32 = 35;
pub const DEFAULT_MAX_TOTAL: usize = 50;
pub const DEFAULT_RESULTS_PER_QUERY: usize = 5;
pub const DEFAULT_FRESHNESS: &str = "pw";
pub const DEFAULT_DELAY_MS: u64 = 1_000;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_API_BASE: &str = "https://api.search.brave.com";

pub const ENV_CONFIG_PATH: &str = "SCOUT_CONFIG_PATH";
pub const ENV_OUTPUT_PATH: &str = "SCOUT_OUTPUT_PATH";
pub const ENV_MIN_SCORE: &str = "SCOUT_MIN_SCORE";
pub const ENV_MAX_TOTAL: &str = "SCOUT_MAX_TOTAL";
pub const ENV_RESULTS_PER_QUERY: &str = "SCOUT_RESULTS_PER_QUERY";
pub const ENV_FRESHNESS: &str = "SCOUT_FRESHNESS";
pub const ENV_DELAY_MS: &str = "SCOUT_DELAY_MS";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "SCOUT_HTTP_TIMEOUT_SECS";
pub const ENV_API_KEY: &str = "BRAVE_API_KEY";
pub const ENV_API_BASE: &str = "BRAVE_API_BASE";
pub const ENV_METRICS_PATH: &str = "SCOUT_METRICS_PATH";

/// Provider `count` upper bound.
const MAX_RESULTS_PER_QUERY: usize = 20;

/// Runtime settings for one scout run. Everything but the query list.
#[derive(Clone)]
pub struct ScoutSettings {
    pub config_path: PathBuf,
    pub output_path: PathBuf,
    /// Admission threshold; hits below are discarded before ranking.
    pub min_score: i32,
    /// Snapshot cap.
    pub max_total: usize,
    pub results_per_query: usize,
    pub freshness: String,
    /// Pause between successive provider calls.
    pub delay: Duration,
    pub http_timeout: Duration,
    pub api_base: String,
    pub api_key: Option<String>,
    pub metrics_path: Option<PathBuf>,
}

impl Default for ScoutSettings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            min_score: DEFAULT_MIN_SCORE,
            max_total: DEFAULT_MAX_TOTAL,
            results_per_query: DEFAULT_RESULTS_PER_QUERY,
            freshness: DEFAULT_FRESHNESS.to_string(),
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            metrics_path: None,
        }
    }
}

// Never print the key itself.
impl fmt::Debug for ScoutSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoutSettings")
            .field("config_path", &self.config_path)
            .field("output_path", &self.output_path)
            .field("min_score", &self.min_score)
            .field("max_total", &self.max_total)
            .field("results_per_query", &self.results_per_query)
            .field("freshness", &self.freshness)
            .field("delay", &self.delay)
            .field("http_timeout", &self.http_timeout)
            .field("api_base", &self.api_base)
            .field("api_key_len", &self.api_key.as_ref().map(String::len))
            .field("metrics_path", &self.metrics_path)
            .finish()
    }
}

impl ScoutSettings {
    /// Read settings from the process environment (after `.env` was loaded).
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build settings from any key lookup; unset or invalid values keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| {
            lookup(k)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let d = Self::default();

        Self {
            config_path: get(ENV_CONFIG_PATH).map(PathBuf::from).unwrap_or(d.config_path),
            output_path: get(ENV_OUTPUT_PATH).map(PathBuf::from).unwrap_or(d.output_path),
            min_score: parse_or(ENV_MIN_SCORE, get(ENV_MIN_SCORE), d.min_score).clamp(5, 100),
            max_total: parse_or(ENV_MAX_TOTAL, get(ENV_MAX_TOTAL), d.max_total).max(1),
            results_per_query: parse_or(
                ENV_RESULTS_PER_QUERY,
                get(ENV_RESULTS_PER_QUERY),
                d.results_per_query,
            )
            .clamp(1, MAX_RESULTS_PER_QUERY),
            freshness: get(ENV_FRESHNESS).unwrap_or(d.freshness),
            delay: Duration::from_millis(parse_or(ENV_DELAY_MS, get(ENV_DELAY_MS), DEFAULT_DELAY_MS)),
            http_timeout: Duration::from_secs(
                parse_or(
                    ENV_HTTP_TIMEOUT_SECS,
                    get(ENV_HTTP_TIMEOUT_SECS),
                    DEFAULT_HTTP_TIMEOUT_SECS,
                )
                .max(1),
            ),
            api_base: get(ENV_API_BASE)
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or(d.api_base),
            api_key: get(ENV_API_KEY),
            metrics_path: get(ENV_METRICS_PATH).map(PathBuf::from),
        }
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(s) => match s.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(target: "scout::config", key, value = %s, "invalid value, using default");
                default
            }
        },
    }
}
