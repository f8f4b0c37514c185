// src/config/mod.rs
pub mod queries;
pub mod settings;

pub use queries::{default_queries, load_queries, DEFAULT_CONFIG_PATH};
pub use settings::ScoutSettings;
