// src/scout/dedup.rs
use std::collections::HashSet;

use crate::scout::types::Opportunity;

/// URL with its query string (and anything after it) removed.
pub fn dedup_key(url: &str) -> &str {
    match url.find('?') {
        Some(i) => &url[..i],
        None => url,
    }
}

/// Drop later opportunities whose dedup key was already seen.
/// Returns (kept, dropped_count). Order of survivors is preserved.
pub fn dedup_first_wins(items: Vec<Opportunity>) -> (Vec<Opportunity>, usize) {
    let mut seen: HashSet<String> = HashSet::with_capacity(items.len());
    let mut keep = Vec::with_capacity(items.len());
    let mut dropped = 0usize;

    for op in items {
        if !seen.insert(dedup_key(&op.url).to_string()) {
            dropped += 1;
            continue;
        }
        keep.push(op);
    }

    (keep, dropped)
}

/// Stable sort by score descending, then keep at most `max_total`.
pub fn rank_and_truncate(mut items: Vec<Opportunity>, max_total: usize) -> Vec<Opportunity> {
    items.sort_by(|a, b| b.score.cmp(&a.score));
    items.truncate(max_total);
    items
}
