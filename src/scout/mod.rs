// src/scout/mod.rs
pub mod dedup;
pub mod error;
pub mod freshness;
pub mod providers;
pub mod scoring;
pub mod snapshot;
pub mod types;

use anyhow::{Context, Result};
use chrono::Utc;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::ScoutSettings;
use crate::scout::dedup::{dedup_first_wins, rank_and_truncate};
use crate::scout::snapshot::SnapshotSink;
use crate::scout::types::{
    Opportunity, Query, ResultSnapshot, SearchHit, SearchOptions, SearchProvider,
};

/// Number of entries in the end-of-run summary.
pub const SUMMARY_TOP_N: usize = 5;

/// One-time metrics registration (so series show up in exports).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("scout_queries_total", "Search queries issued to the provider.");
        describe_counter!(
            "scout_query_errors_total",
            "Provider calls that failed and contributed no results."
        );
        describe_counter!("scout_hits_total", "Raw hits returned by the provider.");
        describe_counter!(
            "scout_admitted_total",
            "Hits scoring at or above the admission threshold."
        );
        describe_counter!(
            "scout_dedup_total",
            "Opportunities dropped as duplicates of an earlier URL."
        );
        describe_histogram!("scout_query_ms", "Provider call latency in milliseconds.");
        describe_gauge!("scout_snapshot_size", "Opportunities in the last written snapshot.");
        describe_gauge!("scout_last_run_ts", "Unix ts when the last snapshot was written.");
    });
}

/// Normalize provider text: decode entities, strip tags, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags (Brave wraps matches in <strong>)
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").expect("ws regex"));
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 4) Length cap: 1000 chars
    if out.chars().count() > 1000 {
        out = out.chars().take(1000).collect();
    }

    out
}

fn normalize_hit(hit: SearchHit) -> SearchHit {
    SearchHit {
        title: normalize_text(&hit.title),
        url: hit.url.trim().to_string(),
        description: normalize_text(&hit.description),
        published_age: hit.published_age,
    }
}

/// First `max` chars of `s`, with an ellipsis when cut.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push('…');
    out
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Configuration validated; no provider calls, nothing written.
    DryRun { queries: usize },
    /// Snapshot built and stored.
    Completed(ResultSnapshot),
}

/// Counters for one collection pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub opportunities: Vec<Opportunity>,
    pub hits: usize,
    pub failed_queries: usize,
}

/// Issue every query in order, score each hit, keep those at/above the threshold.
/// A failing query is logged and contributes nothing.
pub async fn collect(
    provider: &dyn SearchProvider,
    queries: &[Query],
    settings: &ScoutSettings,
) -> Batch {
    ensure_metrics_described();

    let opts = SearchOptions {
        count: settings.results_per_query,
        freshness: settings.freshness.clone(),
    };
    let mut batch = Batch::default();

    for (i, query) in queries.iter().enumerate() {
        if i > 0 && !settings.delay.is_zero() {
            tokio::time::sleep(settings.delay).await;
        }

        counter!("scout_queries_total").increment(1);
        let t0 = std::time::Instant::now();
        let result = provider.search(&query.text, &opts).await;
        histogram!("scout_query_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        let hits = match result {
            Ok(h) => h,
            Err(e) => {
                warn!(
                    target: "scout",
                    provider = provider.name(),
                    category = %query.category,
                    query = %truncate_chars(&query.text, 40),
                    error = %e,
                    "search failed, skipping query"
                );
                counter!("scout_query_errors_total").increment(1);
                batch.failed_queries += 1;
                continue;
            }
        };

        counter!("scout_hits_total").increment(hits.len() as u64);
        batch.hits += hits.len();

        let scanned_at = Utc::now();
        let mut admitted = 0usize;
        for hit in hits.into_iter().map(normalize_hit) {
            if hit.url.is_empty() {
                debug!(target: "scout", title = %truncate_chars(&hit.title, 60), "hit without url dropped");
                continue;
            }
            let b = scoring::score_at(&hit, query, scanned_at);
            debug!(
                target: "scout",
                score = b.total,
                raw = b.raw,
                freshness = b.freshness,
                matched = ?b.matched,
                denied = ?b.denied,
                url = %hit.url,
                "scored hit"
            );
            if b.total >= settings.min_score {
                admitted += 1;
                batch
                    .opportunities
                    .push(Opportunity::from_hit(hit, query, b.total, scanned_at));
            }
        }
        counter!("scout_admitted_total").increment(admitted as u64);

        info!(
            target: "scout",
            category = %query.category,
            query = %truncate_chars(&query.text, 40),
            admitted,
            "query done"
        );
    }

    batch
}

/// Dedup (first wins), rank and cap.
pub fn rank(opportunities: Vec<Opportunity>, max_total: usize) -> Vec<Opportunity> {
    let (unique, dropped) = dedup_first_wins(opportunities);
    counter!("scout_dedup_total").increment(dropped as u64);
    rank_and_truncate(unique, max_total)
}

/// Collect and rank into a snapshot without persisting it.
pub async fn run_once(
    provider: &dyn SearchProvider,
    queries: &[Query],
    settings: &ScoutSettings,
) -> ResultSnapshot {
    let batch = collect(provider, queries, settings).await;
    let opportunities = rank(batch.opportunities, settings.max_total);

    info!(
        target: "scout",
        queries = queries.len(),
        failed = batch.failed_queries,
        hits = batch.hits,
        kept = opportunities.len(),
        "scan finished"
    );

    ResultSnapshot {
        generated_at: Utc::now(),
        total_queries: queries.len(),
        total_results: opportunities.len(),
        opportunities,
    }
}

/// Full run: scan, persist, summarize. In dry-run mode only the config is reported.
/// The only error surfaced is a failed snapshot write.
pub async fn execute(
    provider: &dyn SearchProvider,
    queries: &[Query],
    settings: &ScoutSettings,
    sink: &dyn SnapshotSink,
    dry_run: bool,
) -> Result<RunOutcome> {
    if dry_run {
        info!(target: "scout", queries = queries.len(), "dry run: configuration loaded, no searches issued");
        for q in queries {
            info!(
                target: "scout",
                category = %q.category,
                source = %q.source,
                weight = q.weight,
                query = %q.text,
                "configured query"
            );
        }
        return Ok(RunOutcome::DryRun {
            queries: queries.len(),
        });
    }

    info!(target: "scout", queries = queries.len(), provider = provider.name(), "scout run starting");
    let snapshot = run_once(provider, queries, settings).await;

    sink.store(&snapshot)
        .await
        .with_context(|| format!("writing snapshot to {}", sink.describe()))?;

    gauge!("scout_snapshot_size").set(snapshot.opportunities.len() as f64);
    gauge!("scout_last_run_ts").set(snapshot.generated_at.timestamp() as f64);
    info!(
        target: "scout",
        results = snapshot.total_results,
        destination = %sink.describe(),
        "snapshot written"
    );

    for line in summary_lines(&snapshot, SUMMARY_TOP_N) {
        info!(target: "scout", "{line}");
    }

    Ok(RunOutcome::Completed(snapshot))
}

/// Human-readable top-N lines, highest score first.
pub fn summary_lines(snapshot: &ResultSnapshot, n: usize) -> Vec<String> {
    if snapshot.opportunities.is_empty() {
        return vec!["no opportunities above threshold".to_string()];
    }
    snapshot
        .opportunities
        .iter()
        .take(n)
        .enumerate()
        .map(|(i, o)| {
            format!(
                "#{} [{}] {} ({}) {}",
                i + 1,
                o.score,
                truncate_chars(&o.title, 80),
                o.category,
                o.url
            )
        })
        .collect()
}
