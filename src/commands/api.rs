// src/commands/api.rs
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::fmt::Display;

use crate::config::EnricherConfig;
use crate::error::{EnricherError, Result};
use crate::services::gate::{GatingDecision, TurnGate};
use crate::services::host::ConversationHost;
use crate::services::reconciler::{Source, project, reconcile};
use crate::services::tracking::rewrite;

/// Control token a generated reply carries when it must go out without sources.
pub const NO_SOURCES_TOKEN: &str = "<no_sources>";

/// The reply handed back to the host for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedMessage {
    pub text: String,
    pub sources: Vec<Source>,
}

impl EnrichedMessage {
    fn bare(text: String) -> Self {
        Self { text, sources: Vec::new() }
    }
}

/// Per-turn hooks of the enrichment layer. Holds no state between turns.
pub struct Enricher {
    config: EnricherConfig,
}

impl Enricher {
    pub fn new(config: EnricherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EnricherConfig {
        &self.config
    }

    /// Pre-generation hook; see [`TurnGate::evaluate`].
    pub fn fast_reply<H: ConversationHost>(&self, host: &mut H) -> Result<GatingDecision> {
        TurnGate::new(&self.config).evaluate(host)
    }

    /// Pre-read hook: stamp the incoming user text with the wall-clock time.
    pub fn annotate_user_message<Tz>(&self, text: &str, now: DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        format!("{text}\n\nCurrent time: {}", now.format("%Y-%m-%d %H:%M:%S"))
    }

    /// Pre-send hook: attach reconciled sources and tag every link.
    ///
    /// # Behavior
    /// - A reply containing [`NO_SOURCES_TOKEN`] has the token stripped and goes
    ///   out with no sources and no link rewriting.
    /// - During an active form session the reply is returned untouched.
    /// - Otherwise sources come from the turn's recalled documents; in
    ///   double-pass mode they are reconciled against a second recall seeded
    ///   with `"<user query> <reply>"`.
    ///
    /// # Errors
    /// * [`EnricherError::SecondPass`] when the double-pass recall fails.
    pub fn enrich<H: ConversationHost>(&self, text: String, host: &mut H) -> Result<EnrichedMessage> {
        if text.contains(NO_SOURCES_TOKEN) {
            tracing::debug!("No sources required.");
            return Ok(EnrichedMessage::bare(text.replace(NO_SOURCES_TOKEN, "")));
        }
        if host.is_form_session_active() {
            tracing::debug!("User is in a form session, skipping source enrichment");
            return Ok(EnrichedMessage::bare(text));
        }

        let tag = self.config.utm_source.as_str();
        let sources = if self.config.double_pass {
            let combined = format!("{} {}", host.user_query(), text);
            let second = host.embed_and_recall(&combined).map_err(EnricherError::SecondPass)?;
            reconcile(host.recalled_documents(), Some(second.as_slice()))
        } else {
            reconcile(host.recalled_documents(), None)
        };
        tracing::debug!(
            count = sources.len(),
            double_pass = self.config.double_pass,
            "attaching sources"
        );

        Ok(EnrichedMessage {
            sources: project(sources, tag),
            text: rewrite(&text, tag),
        })
    }
}
