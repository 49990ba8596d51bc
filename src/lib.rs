//! Source-Enricher: a message-enrichment layer for retrieval-augmented chat.
//!
//! Before generation, [`services::TurnGate`] decides whether a turn should be
//! answered with a canned reply. After generation, [`commands::Enricher`]
//! attaches the reconciled retrieval sources to the outgoing message and tags
//! every link with a `utm_source` parameter.

pub mod commands;
pub mod config;
pub mod error;
pub mod services;

pub use commands::{EnrichedMessage, Enricher, NO_SOURCES_TOKEN};
pub use config::EnricherConfig;
pub use error::{EnricherError, Result};
