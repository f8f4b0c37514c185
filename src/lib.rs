// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod metrics;
pub mod scout;

// ---- Re-exports for stable public API ----
pub use crate::config::{default_queries, load_queries, ScoutSettings};
pub use crate::scout::providers::BraveSearchProvider;
pub use crate::scout::scoring::score;
pub use crate::scout::snapshot::{FileSnapshotSink, MemorySink, SnapshotSink};
pub use crate::scout::types::{
    Opportunity, Query, ResultSnapshot, SearchHit, SearchOptions, SearchProvider,
};
pub use crate::scout::{execute, run_once, RunOutcome};
