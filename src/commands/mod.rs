// src/commands/mod.rs
mod api;

pub use api::{EnrichedMessage, Enricher, NO_SOURCES_TOKEN};
