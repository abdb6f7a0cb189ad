//! Free-text helpers shared by the normalizer, estimator, and scorer.

use std::sync::OnceLock;

use regex::Regex;

pub(crate) const TITLE_MAX_CHARS: usize = 200;
pub(crate) const SNIPPET_MAX_CHARS: usize = 500;
pub(crate) const ENTITY_NAME_MAX_CHARS: usize = 120;
pub(crate) const GENERATED_TEXT_MAX_CHARS: usize = 8000;
pub(crate) const HEADING_MAX_CHARS: usize = 150;
pub(crate) const RECOMMENDATION_MAX_CHARS: usize = 300;
pub(crate) const MAX_ENTITIES: usize = 25;

pub(crate) const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "how", "in", "into", "is",
    "it", "of", "on", "or", "the", "this", "to", "vs", "what", "when", "where", "which", "who",
    "why", "with", "your", "you", "my", "our", "we", "i", "their", "can", "do", "does",
    "should",
];

/// Single-word terms signalling purchase intent. "near me" is matched as a
/// phrase separately.
pub(crate) const COMMERCIAL_TERMS: &[&str] = &[
    "buy",
    "best",
    "cheap",
    "price",
    "prices",
    "pricing",
    "review",
    "reviews",
    "deal",
    "deals",
    "discount",
    "coupon",
    "sale",
    "vs",
    "top",
    "affordable",
    "compare",
    "comparison",
    "shop",
    "order",
];

fn html_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid html tag regex"))
}

/// Truncates to at most `max` characters without splitting a code point.
pub(crate) fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}

/// Strips HTML tags and collapses whitespace runs to single spaces.
pub(crate) fn clean_text(value: &str) -> String {
    let stripped = html_tag_regex().replace_all(value, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// [`clean_text`] followed by [`truncate_chars`].
pub(crate) fn clean_truncated(value: &str, max: usize) -> String {
    truncate_chars(&clean_text(value), max)
}

pub(crate) fn is_stopword(term: &str) -> bool {
    STOPWORDS.contains(&term)
}

pub(crate) fn is_commercial_term(term: &str) -> bool {
    COMMERCIAL_TERMS.contains(&term)
}

/// True when any of the lowercased `terms` carries purchase intent.
pub(crate) fn is_commercial(terms: &[String]) -> bool {
    terms.iter().any(|t| is_commercial_term(t))
        || terms.windows(2).any(|w| w[0] == "near" && w[1] == "me")
}

/// Clamps into `[0, 1]`; `None` and NaN become `default`.
pub(crate) fn unit_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if !v.is_nan() => v.clamp(0.0, 1.0),
        _ => default,
    }
}

/// Lowercased host of a domain or URL, without scheme, port, path, or a
/// leading `www.`.
pub(crate) fn normalize_domain(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let rest = raw.split_once("://").map_or(raw, |(_, r)| r);
    let host = rest.split(['/', '?', '#']).next()?.split(':').next()?;
    let host = host.trim_end_matches('.').to_lowercase();
    let host = host.strip_prefix("www.").map(str::to_string).unwrap_or(host);
    (!host.is_empty()).then_some(host)
}

/// True when `host` is `domain` or one of its subdomains.
pub(crate) fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}
