//! services/tracking.rs
//! UTM link tracking: tag standalone URLs and every URL found in a message body.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use url::{Url, form_urlencoded};

pub const UTM_SOURCE: &str = "utm_source";

// Authority is a bracketed IPv6 literal or a plain host, with an optional port.
// After it, square brackets are only taken as balanced pairs (`a[]=1`), so an
// unmatched `]` closing a markdown label ends the URL. A `)` always ends it.
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"https?://(?:\[[0-9A-Fa-f:.]+\]|[^\s()\[\]<>"/?#]+)(?::\d+)?(?:[^\s)\[\]<>"]|\[[^\s)\[\]<>"]*\])*"#,
    )
    .expect("static url pattern compiles")
});

/// Append `utm_source=<tag>` to `url` unless it already carries a `utm_source`.
///
/// Scheme, authority, path and fragment are kept byte-for-byte; only the query
/// is re-serialized, with repeated parameters grouped under their first
/// occurrence. URLs the `url` crate cannot parse keep their raw query and get
/// the pair appended to it.
pub fn tag_url(url: &str, tag: &str) -> String {
    if tag.is_empty() {
        return url.to_string();
    }

    let (head, fragment) = match url.split_once('#') {
        Some((h, f)) => (h, Some(f)),
        None => (url, None),
    };
    let (base, query) = match head.split_once('?') {
        Some((b, q)) => (b, q),
        None => (head, ""),
    };

    let params = group_query(query);
    if params.iter().any(|(name, _)| name == UTM_SOURCE) {
        return url.to_string();
    }

    let new_query = if Url::parse(url).is_ok() {
        let mut ser = form_urlencoded::Serializer::new(String::new());
        for (name, values) in &params {
            for value in values {
                ser.append_pair(name, value);
            }
        }
        ser.append_pair(UTM_SOURCE, tag);
        ser.finish()
    } else {
        tracing::debug!(url, "unparseable url; appending tracking parameter to the raw query");
        let pair = format!(
            "{UTM_SOURCE}={}",
            form_urlencoded::byte_serialize(tag.as_bytes()).collect::<String>()
        );
        if query.is_empty() {
            pair
        } else if query.ends_with('&') {
            format!("{query}{pair}")
        } else {
            format!("{query}&{pair}")
        }
    };

    let mut out = String::with_capacity(url.len() + new_query.len() + 2);
    out.push_str(base);
    out.push('?');
    out.push_str(&new_query);
    if let Some(f) = fragment {
        out.push('#');
        out.push_str(f);
    }
    out
}

/// Tag every absolute http(s) URL in `text`; everything else passes through untouched.
pub fn rewrite(text: &str, tag: &str) -> String {
    if tag.is_empty() {
        return text.to_string();
    }
    URL_RE
        .replace_all(text, |caps: &Captures| tag_url(&caps[0], tag))
        .into_owned()
}

/// Ordered name -> values mapping of a query string.
fn group_query(query: &str) -> Vec<(String, Vec<String>)> {
    let mut params: Vec<(String, Vec<String>)> = Vec::new();
    for (name, value) in form_urlencoded::parse(query.as_bytes()) {
        match params.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value.into_owned()),
            None => params.push((name.into_owned(), vec![value.into_owned()])),
        }
    }
    params
}
