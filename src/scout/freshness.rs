//! Result-age parsing and the freshness bonus.
//!
//! Providers report age either as a timestamp (`2025-03-01T08:30:00`,
//! RFC 3339, or a bare date) or as a relative phrase (`"3 hours ago"`).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;

pub const BONUS_UNDER_DAY: i32 = 10;
pub const BONUS_UNDER_3_DAYS: i32 = 5;
pub const BONUS_UNDER_WEEK: i32 = 2;

/// Age in hours of a reported timestamp/phrase relative to `now`.
/// Future timestamps count as brand new. Unknown formats give `None`.
pub fn age_hours(raw: &str, now: DateTime<Utc>) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(ts) = parse_timestamp(s) {
        let secs = now.signed_duration_since(ts).num_seconds().max(0);
        return Some(secs as f64 / 3600.0);
    }

    parse_relative_hours(s)
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_relative_hours(s: &str) -> Option<f64> {
    let lower = s.to_ascii_lowercase();
    match lower.as_str() {
        "just now" | "today" => return Some(0.0),
        "yesterday" => return Some(24.0),
        _ => {}
    }

    static RE_REL: OnceCell<Regex> = OnceCell::new();
    let re = RE_REL.get_or_init(|| {
        Regex::new(r"^(\d+)\s*(second|minute|hour|day|week|month|year)s?\s+ago$")
            .expect("relative age regex")
    });
    let caps = re.captures(&lower)?;
    let n: f64 = caps.get(1)?.as_str().parse().ok()?;
    let unit_hours = match caps.get(2)?.as_str() {
        "second" => 1.0 / 3600.0,
        "minute" => 1.0 / 60.0,
        "hour" => 1.0,
        "day" => 24.0,
        "week" => 24.0 * 7.0,
        "month" => 24.0 * 30.0,
        _ => 24.0 * 365.0,
    };
    Some(n * unit_hours)
}

/// Bonus by age: under a day, up to three days, up to a week, else nothing.
pub fn freshness_bonus(age_hours: Option<f64>) -> i32 {
    match age_hours {
        Some(h) if h < 24.0 => BONUS_UNDER_DAY,
        Some(h) if h <= 72.0 => BONUS_UNDER_3_DAYS,
        Some(h) if h <= 168.0 => BONUS_UNDER_WEEK,
        _ => 0,
    }
}
