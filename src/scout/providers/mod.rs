// src/scout/providers/mod.rs
pub mod brave;

pub use brave::BraveSearchProvider;
