use serde_json::{Map, Value, json};
use source_enricher::services::{
    Document, RawMemoryRecord, Source, collect_sources, display_label, project, reconcile,
};

fn rec(url: &str) -> RawMemoryRecord {
    RawMemoryRecord::with_source(url, None)
}

fn titled(url: &str, title: &str) -> RawMemoryRecord {
    RawMemoryRecord::with_source(url, Some(title))
}

fn with_metadata(meta: Value) -> RawMemoryRecord {
    let metadata: Map<String, Value> = meta.as_object().cloned().unwrap_or_default();
    RawMemoryRecord {
        document: Document { page_content: "chunk".into(), metadata },
        score: 0.5,
    }
}

fn urls(sources: &[Source]) -> Vec<&str> {
    sources.iter().map(|s| s.url.as_str()).collect()
}

#[test]
fn dedup_keeps_first_occurrence_in_order() {
    let records = vec![titled("a", "A1"), rec("b"), titled("a", "A2"), rec("c")];
    let sources = collect_sources(&records);
    assert_eq!(urls(&sources), vec!["a", "b", "c"]);
    assert_eq!(sources[0].label, "A1");
}

#[test]
fn records_without_usable_source_are_skipped() {
    let records = vec![
        with_metadata(json!({ "title": "no source" })),
        with_metadata(json!({ "source": "", "title": "empty" })),
        with_metadata(json!({ "source": 42 })),
        with_metadata(json!({ "source": "https://ok.example", "title": null })),
    ];
    let sources = collect_sources(&records);
    assert_eq!(sources, vec![Source::new("https://ok.example", "")]);
}

#[test]
fn single_pass_returns_primary_sources() {
    let primary = vec![rec("a"), rec("b"), rec("a")];
    assert_eq!(urls(&reconcile(&primary, None)), vec!["a", "b"]);
}

#[test]
fn double_pass_keeps_primary_order_of_confirmed_sources() {
    let primary = vec![rec("a"), rec("b"), rec("c")];
    let secondary = vec![rec("c"), rec("x"), rec("a")];
    assert_eq!(urls(&reconcile(&primary, Some(secondary.as_slice()))), vec!["a", "c"]);
}

#[test]
fn double_pass_empty_intersection_falls_back_to_primary() {
    let primary = vec![rec("a"), rec("b")];
    let secondary = vec![rec("x")];
    assert_eq!(urls(&reconcile(&primary, Some(secondary.as_slice()))), vec!["a", "b"]);
}

#[test]
fn double_pass_falls_back_to_secondary_when_primary_is_empty() {
    let secondary = vec![rec("x"), rec("y"), rec("x")];
    assert_eq!(urls(&reconcile(&[], Some(secondary.as_slice()))), vec!["x", "y"]);
}

#[test]
fn double_pass_with_both_empty_is_empty() {
    assert!(reconcile(&[], Some(&[][..])).is_empty());
}

#[test]
fn labels_are_cut_at_first_slash() {
    assert_eq!(display_label("Docs/Section1"), "Docs");
    assert_eq!(display_label("Title"), "Title");
    assert_eq!(display_label("a/b/c"), "a");
    assert_eq!(display_label("/leading"), "");
    assert_eq!(display_label(""), "");
}

#[test]
fn project_tags_urls_and_truncates_labels() {
    let sources = vec![
        Source::new("https://docs.example/p", "Docs/Section1"),
        Source::new("https://blog.example/?utm_source=x", "Title"),
    ];
    let out = project(sources, "bot");
    assert_eq!(
        out,
        vec![
            Source::new("https://docs.example/p?utm_source=bot", "Docs"),
            Source::new("https://blog.example/?utm_source=x", "Title"),
        ]
    );
}

#[test]
fn project_without_tag_only_truncates() {
    let out = project(vec![Source::new("https://a.example/", "A/B")], "");
    assert_eq!(out, vec![Source::new("https://a.example/", "A")]);
}
