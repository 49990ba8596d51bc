// src/services/mod.rs

pub mod gate;         // pre-generation short-circuit
pub mod host;         // collaborator trait implemented by the chat runtime
pub mod reconciler;   // recall records -> deduplicated sources
pub mod tracking;     // utm_source link tagging

// Public API
pub use gate::{GatingDecision, TurnGate};
pub use host::{ConversationHost, Document, RawMemoryRecord};
pub use reconciler::{Source, collect_sources, display_label, project, reconcile};
pub use tracking::{UTM_SOURCE, rewrite, tag_url};
