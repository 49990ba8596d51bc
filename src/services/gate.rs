//! services/gate.rs
//! Pre-generation turn gate: decide whether a query reaches the model at all.

use serde::Serialize;

use crate::config::EnricherConfig;
use crate::error::{EnricherError, Result};
use crate::services::host::ConversationHost;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GatingDecision {
    Proceed,
    ShortCircuit(String),
}

impl GatingDecision {
    pub fn is_short_circuit(&self) -> bool {
        matches!(self, GatingDecision::ShortCircuit(_))
    }
}

/// Why a turn was short-circuited; used for logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reason {
    Panic,
    TooShort,
    NoContext,
}

impl Reason {
    fn as_str(&self) -> &'static str {
        match self {
            Reason::Panic => "panic_button",
            Reason::TooShort => "query_too_short",
            Reason::NoContext => "no_declarative_context",
        }
    }
}

pub struct TurnGate<'a> {
    config: &'a EnricherConfig,
}

impl<'a> TurnGate<'a> {
    pub fn new(config: &'a EnricherConfig) -> Self {
        Self { config }
    }

    /// Run the checks in order, stopping at the first that fires:
    ///
    /// 1. panic mode: recall anyway, then answer with the panic text;
    /// 2. trimmed query shorter than `min_query_length`: default text, no recall;
    /// 3. recall; nothing declarative and no form in progress: default text;
    /// 4. otherwise [`GatingDecision::Proceed`].
    ///
    /// # Errors
    /// * [`EnricherError::Recall`] when the host's recall fails.
    pub fn evaluate<H: ConversationHost>(&self, host: &mut H) -> Result<GatingDecision> {
        if self.config.panic_button_enabled {
            host.trigger_context_recall().map_err(EnricherError::Recall)?;
            return Ok(self.short_circuit(Reason::Panic, &self.config.panic_button_text));
        }

        let query_len = host.user_query().trim().chars().count();
        if query_len < self.config.min_query_length {
            tracing::debug!(query_len, min = self.config.min_query_length, "query below minimum length");
            return Ok(self.short_circuit(Reason::TooShort, &self.config.default_message));
        }

        host.trigger_context_recall().map_err(EnricherError::Recall)?;
        let has_context = !host.recalled_documents().is_empty();
        if !has_context && !host.is_form_session_active() {
            return Ok(self.short_circuit(Reason::NoContext, &self.config.default_message));
        }

        Ok(GatingDecision::Proceed)
    }

    fn short_circuit(&self, reason: Reason, text: &str) -> GatingDecision {
        tracing::info!(reason = reason.as_str(), "short-circuiting turn");
        GatingDecision::ShortCircuit(text.to_string())
    }
}
