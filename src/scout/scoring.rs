//! # Opportunity Scoring
//!
//! Additive-then-multiplicative heuristic:
//!
//! ```text
//! raw   = BASE + keyword sets + actionable + funding + ecosystem + bounty
//! score = clamp(round(raw * query.weight) + freshness, FLOOR, MAX)
//! ```
//!
//! A denylisted domain or topic short-circuits to `FLOOR`.
//! All matching is substring-based on the lowercased `title + " " + description`.

use chrono::{DateTime, Utc};

use crate::scout::freshness::{age_hours, freshness_bonus};
use crate::scout::types::{Query, SearchHit};

pub const BASE_SCORE: i32 = 30;
pub const FLOOR_SCORE: i32 = 5;
pub const MAX_SCORE: i32 = 100;

pub const ACTIONABLE_BONUS: i32 = 15;
pub const FUNDING_BONUS: i32 = 10;
pub const ECOSYSTEM_KEYWORD_BONUS: i32 = 5;
pub const ECOSYSTEM_CATEGORY_BONUS: i32 = 10;
pub const BOUNTY_BONUS: i32 = 15;
pub const BOUNTY_CATEGORY_BONUS: i32 = 10;

/// Queries whose category starts with this prefix target a specific ecosystem.
pub const ECOSYSTEM_CATEGORY_PREFIX: &str = "eco-";
pub const BOUNTY_CATEGORY: &str = "bounty";

/// A named keyword set; the bonus applies once if any keyword matches.
#[derive(Debug, Clone, Copy)]
pub struct KeywordSet {
    pub name: &'static str,
    pub bonus: i32,
    pub keywords: &'static [&'static str],
}

pub const PRIMARY: KeywordSet = KeywordSet {
    name: "primary",
    bonus: 10,
    keywords: &[
        "ai agent",
        "ai automation",
        "automation",
        "llm",
        "chatbot",
        "machine learning",
        "generative ai",
        "ai developer",
        "ai consultant",
    ],
};

pub const SECONDARY: KeywordSet = KeywordSet {
    name: "secondary",
    bonus: 5,
    keywords: &[
        "react",
        "typescript",
        "node.js",
        "nodejs",
        "next.js",
        "python",
        "full stack",
        "fullstack",
        "web app",
        "saas",
        "api integration",
    ],
};

pub const FREELANCE: KeywordSet = KeywordSet {
    name: "freelance",
    bonus: 15,
    keywords: &[
        "freelance",
        "freelancer",
        "contractor",
        "contract role",
        "consultant",
        "remote",
        "frilans",
        "uppdrag",
        "konsult",
    ],
};

pub const LOCALITY: KeywordSet = KeywordSet {
    name: "locality",
    bonus: 25,
    keywords: &[
        "växjö",
        "vaxjo",
        "småland",
        "smaland",
        "kronoberg",
        "alvesta",
        "kalmar",
        "jönköping",
    ],
};

/// Keyword sets in evaluation order.
pub const KEYWORD_SETS: [KeywordSet; 4] = [PRIMARY, SECONDARY, FREELANCE, LOCALITY];

/// Someone is hiring, seeking or in need.
pub const ACTIONABLE_SIGNALS: &[&str] = &[
    "hiring",
    "we are looking for",
    "looking for",
    "seeking",
    "needed",
    "need a",
    "wanted",
    "request for proposal",
    "söker",
    "rekryterar",
];

pub const FUNDING_SIGNALS: &[&str] = &[
    "grant",
    "funding",
    "hackathon",
    "competition",
    "accelerator",
    "prize",
    "pitch",
    "innovation fund",
];

/// Bonus applies per matching keyword.
pub const ECOSYSTEM_KEYWORDS: &[&str] = &[
    "solana",
    "ethereum",
    "polygon",
    "arbitrum",
    "optimism",
    "near protocol",
    "cosmos",
    "web3",
];

pub const BOUNTY_SIGNALS: &[&str] = &[
    "bounty",
    "bounties",
    "reward",
    "payout",
    "program launch",
    "launches program",
    "audit contest",
];

/// Reference/encyclopedic sites; checked against URL and text.
pub const DENY_DOMAINS: &[&str] = &[
    "wikipedia.org",
    "britannica.com",
    "dictionary.com",
    "merriam-webster.com",
    "imdb.com",
    "smhi.se",
    "polisen.se",
];

/// Topics that are never actionable; checked against text.
pub const DENY_TOPICS: &[&str] = &[
    "weather",
    "forecast",
    "väder",
    "police",
    "polisen",
    "arrested",
    "trafikolycka",
    "traffic accident",
];

/// Itemized result of scoring one hit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub raw: i32,
    pub weighted: i32,
    pub freshness: i32,
    pub total: i32,
    /// Names of the signals that fired, e.g. "locality", "eco:solana".
    pub matched: Vec<String>,
    /// Denylist entry that forced the floor, if any.
    pub denied: Option<&'static str>,
}

/// Lowercased `title + " " + description`.
pub fn haystack(hit: &SearchHit) -> String {
    format!("{} {}", hit.title, hit.description).to_lowercase()
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// First denylist entry found in the URL or text.
pub fn denylist_match(url: &str, text: &str) -> Option<&'static str> {
    let url = url.to_lowercase();
    DENY_DOMAINS
        .iter()
        .find(|d| url.contains(*d) || text.contains(*d))
        .or_else(|| DENY_TOPICS.iter().find(|t| text.contains(*t)))
        .copied()
}

pub fn keyword_set_bonus(text: &str, set: &KeywordSet) -> i32 {
    if contains_any(text, set.keywords) {
        set.bonus
    } else {
        0
    }
}

pub fn actionable_bonus(text: &str) -> i32 {
    if contains_any(text, ACTIONABLE_SIGNALS) {
        ACTIONABLE_BONUS
    } else {
        0
    }
}

pub fn funding_bonus(text: &str) -> i32 {
    if contains_any(text, FUNDING_SIGNALS) {
        FUNDING_BONUS
    } else {
        0
    }
}

/// Per-keyword bonus plus a flat bonus for `eco-*` categories.
pub fn ecosystem_bonus(text: &str, category: &str) -> i32 {
    let hits = ECOSYSTEM_KEYWORDS
        .iter()
        .filter(|k| text.contains(*k))
        .count() as i32;
    let flat = if category.starts_with(ECOSYSTEM_CATEGORY_PREFIX) {
        ECOSYSTEM_CATEGORY_BONUS
    } else {
        0
    };
    hits * ECOSYSTEM_KEYWORD_BONUS + flat
}

/// Bounty language bonus plus a flat bonus for the bounty category.
pub fn bounty_bonus(text: &str, category: &str) -> i32 {
    let lang = if contains_any(text, BOUNTY_SIGNALS) {
        BOUNTY_BONUS
    } else {
        0
    };
    let flat = if category == BOUNTY_CATEGORY {
        BOUNTY_CATEGORY_BONUS
    } else {
        0
    };
    lang + flat
}

/// Multiply by the query weight and round half away from zero.
/// Non-finite products collapse to 0 and get clamped up to the floor later.
pub fn apply_weight(raw: i32, weight: f64) -> i32 {
    let v = (f64::from(raw) * weight).round();
    if v.is_finite() {
        v as i32
    } else {
        0
    }
}

pub fn clamp_score(v: i32) -> i32 {
    v.clamp(FLOOR_SCORE, MAX_SCORE)
}

/// Score one hit against its originating query, with freshness relative to `now`.
pub fn score_at(hit: &SearchHit, query: &Query, now: DateTime<Utc>) -> ScoreBreakdown {
    let text = haystack(hit);

    if let Some(term) = denylist_match(&hit.url, &text) {
        return ScoreBreakdown {
            raw: FLOOR_SCORE,
            weighted: FLOOR_SCORE,
            freshness: 0,
            total: FLOOR_SCORE,
            matched: Vec::new(),
            denied: Some(term),
        };
    }

    let mut matched = Vec::new();
    let mut raw = BASE_SCORE;

    for set in KEYWORD_SETS.iter() {
        let b = keyword_set_bonus(&text, set);
        if b > 0 {
            matched.push(set.name.to_string());
            raw += b;
        }
    }

    for (name, b) in [
        ("actionable", actionable_bonus(&text)),
        ("funding", funding_bonus(&text)),
    ] {
        if b > 0 {
            matched.push(name.to_string());
            raw += b;
        }
    }

    let eco = ecosystem_bonus(&text, &query.category);
    if eco > 0 {
        matched.extend(
            ECOSYSTEM_KEYWORDS
                .iter()
                .filter(|k| text.contains(*k))
                .map(|k| format!("eco:{k}")),
        );
        if query.category.starts_with(ECOSYSTEM_CATEGORY_PREFIX) {
            matched.push("eco-category".to_string());
        }
        raw += eco;
    }

    let bounty = bounty_bonus(&text, &query.category);
    if bounty > 0 {
        matched.push("bounty".to_string());
        raw += bounty;
    }

    let weighted = apply_weight(raw, query.weight);
    let freshness = freshness_bonus(
        hit.published_age
            .as_deref()
            .and_then(|a| age_hours(a, now)),
    );
    if freshness > 0 {
        matched.push("fresh".to_string());
    }

    ScoreBreakdown {
        raw,
        weighted,
        freshness,
        total: clamp_score(weighted.saturating_add(freshness)),
        matched,
        denied: None,
    }
}

/// Final score in `[FLOOR_SCORE, MAX_SCORE]`, freshness measured from now.
pub fn score(hit: &SearchHit, query: &Query) -> i32 {
    score_at(hit, query, Utc::now()).total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(title: &str, description: &str) -> SearchHit {
        SearchHit {
            title: title.into(),
            url: "https://example.test/post".into(),
            description: description.into(),
            published_age: None,
        }
    }

    fn q(category: &str, weight: f64) -> Query {
        Query::new("test query", category, "web", weight)
    }

    #[test]
    fn plain_hit_gets_base() {
        let s = score(&hit("Quarterly newsletter", "Nothing to see"), &q("general", 1.0));
        assert_eq!(s, BASE_SCORE);
    }

    #[test]
    fn keyword_set_applies_once() {
        let text = "freelance freelancer remote consultant";
        assert_eq!(keyword_set_bonus(text, &FREELANCE), FREELANCE.bonus);
        assert_eq!(keyword_set_bonus("nothing", &FREELANCE), 0);
    }

    #[test]
    fn locality_is_largest_set_bonus() {
        for set in KEYWORD_SETS.iter() {
            assert!(LOCALITY.bonus >= set.bonus, "{} outranks locality", set.name);
        }
        assert!(LOCALITY.bonus >= ACTIONABLE_BONUS);
        assert!(LOCALITY.bonus >= FUNDING_BONUS);
        assert!(LOCALITY.bonus >= BOUNTY_BONUS);
    }

    #[test]
    fn locality_matches_unicode_case() {
        let text = haystack(&hit("Jobb i VÄXJÖ", ""));
        assert_eq!(keyword_set_bonus(&text, &LOCALITY), LOCALITY.bonus);
    }

    #[test]
    fn actionable_and_funding_signals() {
        assert_eq!(actionable_bonus("startup is hiring engineers"), ACTIONABLE_BONUS);
        assert_eq!(actionable_bonus("company news"), 0);
        assert_eq!(funding_bonus("open innovation grant"), FUNDING_BONUS);
        assert_eq!(funding_bonus("product review"), 0);
    }

    #[test]
    fn ecosystem_bonus_counts_each_keyword_and_category() {
        assert_eq!(ecosystem_bonus("solana and ethereum builders", "general"), 10);
        assert_eq!(ecosystem_bonus("solana builders", "eco-solana"), 15);
        assert_eq!(ecosystem_bonus("unrelated", "eco-solana"), ECOSYSTEM_CATEGORY_BONUS);
        assert_eq!(ecosystem_bonus("unrelated", "economy"), 0);
    }

    #[test]
    fn bounty_bonus_language_and_category() {
        assert_eq!(bounty_bonus("new bug bounty", "general"), BOUNTY_BONUS);
        assert_eq!(
            bounty_bonus("new bug bounty", BOUNTY_CATEGORY),
            BOUNTY_BONUS + BOUNTY_CATEGORY_BONUS
        );
        assert_eq!(bounty_bonus("nothing here", BOUNTY_CATEGORY), BOUNTY_CATEGORY_BONUS);
    }

    #[test]
    fn denylist_short_circuits_everything() {
        let mut h = hit(
            "Freelance React developer needed in Växjö",
            "remote bounty grant solana",
        );
        h.url = "https://en.wikipedia.org/wiki/V%C3%A4xj%C3%B6".into();
        h.published_age = Some("1 hour ago".into());
        let b = score_at(&h, &q("bounty", 1.2), Utc::now());
        assert_eq!(b.total, FLOOR_SCORE);
        assert_eq!(b.denied, Some("wikipedia.org"));
        assert!(b.matched.is_empty());
    }

    #[test]
    fn deny_topic_in_text() {
        let b = score_at(
            &hit("Växjö weather this week", "freelance forecast"),
            &q("local", 1.0),
            Utc::now(),
        );
        assert_eq!(b.total, FLOOR_SCORE);
        assert_eq!(b.denied, Some("weather"));
    }

    #[test]
    fn apply_weight_rounds_and_handles_nan() {
        assert_eq!(apply_weight(45, 0.5), 23); // 22.5 rounds away from zero
        assert_eq!(apply_weight(40, 1.2), 48);
        assert_eq!(apply_weight(40, f64::NAN), 0);
        assert_eq!(clamp_score(apply_weight(40, f64::NAN)), FLOOR_SCORE);
    }

    #[test]
    fn clamps_to_bounds() {
        let h = hit(
            "AI agent React freelance Växjö hiring grant",
            "solana ethereum polygon arbitrum bounty",
        );
        let b = score_at(&h, &q("eco-solana", 1.2), Utc::now());
        assert!(b.weighted > MAX_SCORE);
        assert_eq!(b.total, MAX_SCORE);

        let low = score(&hit("Quarterly newsletter", ""), &q("general", 0.01));
        assert_eq!(low, FLOOR_SCORE);
    }

    #[test]
    fn freshness_added_after_weight() {
        let mut h = hit("Quarterly newsletter", "");
        h.published_age = Some("2 hours ago".into());
        let b = score_at(&h, &q("general", 0.5), Utc::now());
        assert_eq!(b.weighted, 15);
        assert_eq!(b.freshness, 10);
        assert_eq!(b.total, 25);
        assert!(b.matched.contains(&"fresh".to_string()));
    }

    #[test]
    fn breakdown_names_matched_signals() {
        let b = score_at(
            &hit("Solana hackathon", "bounty pool"),
            &q("eco-solana", 1.0),
            Utc::now(),
        );
        assert!(b.matched.contains(&"funding".to_string()));
        assert!(b.matched.contains(&"eco:solana".to_string()));
        assert!(b.matched.contains(&"eco-category".to_string()));
        assert!(b.matched.contains(&"bounty".to_string()));
        // 30 + 10 funding + 5 eco + 10 eco-category + 15 bounty
        assert_eq!(b.raw, 70);
    }
}
