//! services/host.rs
//! Collaborator seam between the enrichment layer and the chat runtime.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A retrieved document: its text plus free-form metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub page_content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Document {
    /// Metadata string field; non-string values count as missing.
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }
}

/// One recall hit, in the order the recall step produced it (most relevant first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMemoryRecord {
    pub document: Document,
    #[serde(default)]
    pub score: f32,
}

impl RawMemoryRecord {
    /// Record whose metadata carries `source` and, when given, `title`.
    pub fn with_source(source: &str, title: Option<&str>) -> Self {
        let mut metadata = Map::new();
        metadata.insert("source".into(), Value::String(source.to_string()));
        if let Some(t) = title {
            metadata.insert("title".into(), Value::String(t.to_string()));
        }
        Self {
            document: Document {
                page_content: String::new(),
                metadata,
            },
            score: 0.0,
        }
    }
}

/// Request-scoped view of the conversation, implemented by the host per chat turn.
///
/// Recall is a two-step contract: [`trigger_context_recall`] populates the
/// turn's working memory and [`recalled_documents`] reads it back.
///
/// [`trigger_context_recall`]: ConversationHost::trigger_context_recall
/// [`recalled_documents`]: ConversationHost::recalled_documents
pub trait ConversationHost {
    /// The user's text for this turn, as received.
    fn user_query(&self) -> &str;

    fn trigger_context_recall(&mut self) -> anyhow::Result<()>;

    /// Declarative memories recalled so far this turn.
    fn recalled_documents(&self) -> &[RawMemoryRecord];

    /// Whether a multi-turn form (slot filling) is in progress.
    fn is_form_session_active(&self) -> bool;

    /// Embed `text` and recall declarative memories for it. Double-pass only.
    fn embed_and_recall(&mut self, text: &str) -> anyhow::Result<Vec<RawMemoryRecord>>;
}
