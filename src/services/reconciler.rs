//! services/reconciler.rs
//! Merge one or two recall passes into a deduplicated, order-preserving source list.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::services::host::RawMemoryRecord;
use crate::services::tracking::tag_url;

/// A piece of retrieved context attached to a reply. `url` is unique within a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    pub label: String,
}

impl Source {
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self { url: url.into(), label: label.into() }
    }
}

/// First occurrence of each `source` URL, in recall order.
///
/// Records without a non-empty string `source` are skipped; a missing `title`
/// becomes an empty label.
pub fn collect_sources(records: &[RawMemoryRecord]) -> Vec<Source> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for rec in records {
        let url = match rec.document.meta_str("source") {
            Some(u) if !u.is_empty() => u,
            _ => continue,
        };
        if !seen.insert(url) {
            continue;
        }
        let label = rec.document.meta_str("title").unwrap_or("");
        out.push(Source::new(url, label));
    }
    out
}

/// Reconcile the primary recall with an optional second pass.
///
/// Without `secondary` the primary sources are returned as-is. With it, only
/// primary sources whose URL the second pass also found are kept, in primary
/// order. An empty intersection falls back to the primary list, then to the
/// secondary list.
pub fn reconcile(primary: &[RawMemoryRecord], secondary: Option<&[RawMemoryRecord]>) -> Vec<Source> {
    let primary_sources = collect_sources(primary);
    let Some(secondary) = secondary else {
        return primary_sources;
    };

    let secondary_sources = collect_sources(secondary);
    let confirmed: HashSet<&str> = secondary_sources.iter().map(|s| s.url.as_str()).collect();
    let relevant: Vec<Source> = primary_sources
        .iter()
        .filter(|s| confirmed.contains(s.url.as_str()))
        .cloned()
        .collect();

    if !relevant.is_empty() {
        relevant
    } else if !primary_sources.is_empty() {
        primary_sources
    } else {
        secondary_sources
    }
}

/// Tag each URL and cut each label at its first `/`.
pub fn project(sources: Vec<Source>, tag: &str) -> Vec<Source> {
    sources
        .into_iter()
        .map(|s| Source {
            url: tag_url(&s.url, tag),
            label: display_label(&s.label).to_string(),
        })
        .collect()
}

/// `"Docs/Section1"` displays as `"Docs"`.
pub fn display_label(label: &str) -> &str {
    label.split('/').next().unwrap_or(label)
}
