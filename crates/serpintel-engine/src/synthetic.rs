//! Deterministic heuristic estimator used when every live provider in a
//! chain is unavailable.
//!
//! Output is a pure function of the request: the only variation comes from
//! SHA-256 of the keyword, never from a random source or a std hasher whose
//! seed changes between runs. Every record carries `is_synthetic = true`.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serpintel_core::{
    Capability, EntityRef, Keyword, KeywordMetric, NormalizedCompetitor, OutlineSection,
    ProviderName,
};
use sha2::{Digest, Sha256};

use crate::error::EngineError;
use crate::normalize::{dedup_entities, MIDPOINT};
use crate::payload::{ContentProfile, GeneratedInsight, Payload};
use crate::request::{ContentQuery, InsightBrief, KeywordQuery, ProviderRequest};
use crate::text::{
    host_matches, is_commercial, is_commercial_term, is_stopword, normalize_domain,
    truncate_chars, HEADING_MAX_CHARS, RECOMMENDATION_MAX_CHARS,
};

// ---------------------------------------------------------------------------
// Keyword metric thresholds, indexed by term count (1..=5+)
// ---------------------------------------------------------------------------

const VOLUME_BY_TERMS: [u64; 5] = [33_100, 9_900, 2_900, 880, 320];
const COMPETITION_BY_TERMS: [f64; 5] = [0.30, 0.28, 0.25, 0.22, 0.20];
const COMMERCIAL_COMPETITION_BONUS: f64 = 0.35;
const LONG_KEYWORD_CHARS: usize = 24;
const LONG_KEYWORD_VOLUME_FACTOR: f64 = 0.7;
const COMMERCIAL_CPC: f64 = 1.80;
const INFORMATIONAL_CPC: f64 = 0.45;
const CPC_STEP_PER_TERM: f64 = 0.1;
const MAX_CPC_STEPS: usize = 4;

const CONCEPT_TYPE: &str = "Concept";
const TOPIC_TYPE: &str = "Topic";
const NAME_TYPE: &str = "Name";

const PRIOR_JITTER: f64 = 0.05;
const COMMERCIAL_QUALITY_BONUS: f64 = 0.05;
/// Hosts are built from the slug; DNS labels stop at 63 characters.
const MAX_HOST_SLUG_CHARS: usize = 40;

/// Keyword modifiers used to derive related keywords: the rendered variant
/// and the terms whose presence makes it redundant.
const MODIFIERS: [(&str, &[&str]); 4] = [
    ("{kw} reviews", &["review", "reviews"]),
    ("best {kw}", &["best"]),
    ("{kw} for beginners", &["beginner", "beginners"]),
    ("how to choose {kw}", &["how", "choose"]),
];

#[derive(Clone, Copy)]
enum Archetype {
    Guide,
    Reviews,
    Comparison,
    Forum,
    News,
}

impl Archetype {
    const ALL: [Archetype; 5] = [
        Archetype::Guide,
        Archetype::Reviews,
        Archetype::Comparison,
        Archetype::Forum,
        Archetype::News,
    ];

    fn label(self) -> &'static str {
        match self {
            Archetype::Guide => "guide",
            Archetype::Reviews => "reviews",
            Archetype::Comparison => "comparison",
            Archetype::Forum => "forum",
            Archetype::News => "news",
        }
    }

    /// `(domain authority, content quality)` before jitter.
    fn priors(self) -> (f64, f64) {
        match self {
            Archetype::Guide => (0.70, 0.72),
            Archetype::Reviews => (0.62, 0.66),
            Archetype::Comparison => (0.55, 0.60),
            Archetype::Forum => (0.48, 0.45),
            Archetype::News => (0.66, 0.52),
        }
    }

    fn url(self, slug: &str) -> String {
        let host_slug = truncate_chars(slug, MAX_HOST_SLUG_CHARS);
        let host_slug = host_slug.trim_end_matches('-');
        match self {
            Archetype::Guide => format!("https://www.{host_slug}-guide.example/complete-guide"),
            Archetype::Reviews => format!("https://reviews.{host_slug}.example/top-picks"),
            Archetype::Comparison => format!("https://compare-{host_slug}.example/{slug}-compared"),
            Archetype::Forum => format!("http://forum.{host_slug}-community.example/t/{slug}"),
            Archetype::News => format!("https://news.{host_slug}-today.example/{slug}-trends"),
        }
    }

    fn title(self, keyword: &Keyword) -> String {
        let title = keyword.title_case();
        match self {
            Archetype::Guide => format!("The Complete Guide to {title} for Everyone"),
            Archetype::Reviews => format!("{title} Reviews: Our Top Picks"),
            Archetype::Comparison => format!("{title} Compared: Side-by-Side Breakdown"),
            Archetype::Forum => format!("Which {keyword} do you recommend? | Community Forum"),
            Archetype::News => format!("{title}: Latest News and Trends"),
        }
    }

    fn snippet(self, keyword: &Keyword) -> String {
        match self {
            Archetype::Guide => format!(
                "Everything you need to know about {keyword}: how it works, what to look for, \
                 and the mistakes most people make when they start."
            ),
            Archetype::Reviews => format!(
                "We tested the most popular {keyword} options and ranked them on value, \
                 durability, and ease of use."
            ),
            Archetype::Comparison => {
                format!("A side-by-side comparison of {keyword} options, features, and prices.")
            }
            Archetype::Forum => format!("Community members share their experience with {keyword}."),
            Archetype::News => format!(
                "The latest developments, releases, and market trends around {keyword}, \
                 updated regularly by our editors."
            ),
        }
    }

    fn benefits_from_commercial_intent(self) -> bool {
        matches!(self, Archetype::Reviews | Archetype::Comparison)
    }
}

/// Answers `request` for `capability` without any provider.
///
/// # Errors
///
/// Returns [`EngineError::EstimatorPrecondition`] when the request variant
/// cannot answer `capability`.
pub fn estimate(capability: Capability, request: &ProviderRequest) -> Result<Payload, EngineError> {
    let payload = match (capability, request) {
        (Capability::Discovery, ProviderRequest::Keyword(query)) => {
            Payload::Competitors(discovery(query))
        }
        (Capability::EntityLookup, ProviderRequest::Keyword(query)) => {
            Payload::Entities(keyword_entities(&query.keyword))
        }
        (Capability::KeywordMetrics, ProviderRequest::Keyword(query)) => {
            Payload::Keywords(keyword_metrics(&query.keyword))
        }
        (Capability::ContentAnalysis, ProviderRequest::Content(query)) => {
            Payload::Content(content_profile(query))
        }
        (Capability::GenerativeInsight, ProviderRequest::Insight(brief)) => {
            Payload::Insight(template_insight(brief))
        }
        _ => {
            return Err(EngineError::EstimatorPrecondition {
                capability,
                reason: format!("a {} request cannot answer it", request.variant()),
            })
        }
    };
    Ok(payload)
}

// ---------------------------------------------------------------------------
// Keyword metrics
// ---------------------------------------------------------------------------

/// Heuristic metrics for one keyword.
#[must_use]
pub fn estimate_keyword_metric(keyword: &Keyword) -> KeywordMetric {
    let terms = keyword.terms();
    let bucket = terms.len().clamp(1, VOLUME_BY_TERMS.len()) - 1;
    let commercial = is_commercial(&terms);

    let mut search_volume = VOLUME_BY_TERMS[bucket];
    if keyword.as_str().chars().count() > LONG_KEYWORD_CHARS {
        search_volume = scale_volume(search_volume, LONG_KEYWORD_VOLUME_FACTOR);
    }

    let mut competition = COMPETITION_BY_TERMS[bucket];
    if commercial {
        competition += COMMERCIAL_COMPETITION_BONUS;
    }

    let base_cpc = if commercial {
        COMMERCIAL_CPC
    } else {
        INFORMATIONAL_CPC
    };
    let steps = terms.len().saturating_sub(1).min(MAX_CPC_STEPS);
    #[allow(clippy::cast_precision_loss)]
    let cpc_estimate = round_cents(base_cpc * (1.0 + CPC_STEP_PER_TERM * steps as f64));

    KeywordMetric {
        keyword: keyword.as_str().to_string(),
        search_volume,
        cpc_estimate,
        competition: competition.clamp(0.0, 1.0),
        is_synthetic: true,
    }
}

/// The seed keyword followed by its modifier variants.
fn keyword_metrics(keyword: &Keyword) -> Vec<KeywordMetric> {
    let terms = keyword.terms();
    let mut metrics = vec![estimate_keyword_metric(keyword)];

    for (pattern, redundant) in MODIFIERS {
        if terms.iter().any(|t| redundant.contains(&t.as_str())) {
            continue;
        }
        let variant = pattern.replace("{kw}", keyword.as_str());
        if let Ok(variant) = Keyword::parse(&variant) {
            metrics.push(estimate_keyword_metric(&variant));
        }
    }

    metrics
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn scale_volume(volume: u64, factor: f64) -> u64 {
    (volume as f64 * factor).round() as u64
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// Meaningful keyword terms as concepts plus, for multi-term keywords, the
/// whole phrase as a topic. Never empty.
pub(crate) fn keyword_entities(keyword: &Keyword) -> Vec<EntityRef> {
    let mut entities: Vec<EntityRef> = keyword
        .terms()
        .into_iter()
        .filter(|t| !is_stopword(t) && !is_commercial_term(t))
        .map(|t| synthetic_entity(&t, CONCEPT_TYPE))
        .collect();

    if keyword.term_count() > 1 || entities.is_empty() {
        entities.push(synthetic_entity(&keyword.as_str().to_lowercase(), TOPIC_TYPE));
    }

    dedup_entities(entities)
}

fn synthetic_entity(name: &str, entity_type: &str) -> EntityRef {
    EntityRef {
        name: name.to_string(),
        entity_type: entity_type.to_string(),
        confidence: MIDPOINT,
        knowledge_graph_id: None,
    }
}

fn capitalized_phrase_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b[A-Z][A-Za-z0-9'&]*(?:\s+[A-Z][A-Za-z0-9'&]*)*")
            .expect("valid capitalized phrase regex")
    })
}

/// Capitalized phrases in the text plus keyword terms the text mentions.
/// Quality is left for the caller to keep as-is.
fn content_profile(query: &ContentQuery) -> ContentProfile {
    let mut entities: Vec<EntityRef> = capitalized_phrase_regex()
        .find_iter(&query.text)
        .map(|m| m.as_str().trim())
        .filter(|phrase| {
            let lower = phrase.to_lowercase();
            !(is_stopword(&lower) || is_commercial_term(&lower))
        })
        .map(|phrase| synthetic_entity(phrase, NAME_TYPE))
        .collect();

    let text_words: HashSet<String> = query
        .text
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .collect();
    entities.extend(
        query
            .keyword
            .terms()
            .into_iter()
            .filter(|t| !is_stopword(t) && text_words.contains(t))
            .map(|t| synthetic_entity(&t, CONCEPT_TYPE)),
    );

    ContentProfile {
        entities: dedup_entities(entities),
        quality: None,
        is_synthetic: true,
    }
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

fn discovery(query: &KeywordQuery) -> Vec<NormalizedCompetitor> {
    let keyword = &query.keyword;
    let seed = keyword.as_str().to_lowercase();
    let slug = keyword.slug();
    let slug = if slug.is_empty() { jitter_slug(&seed) } else { slug };
    let commercial = is_commercial(&keyword.terms());
    let context = keyword_entities(keyword);
    let excluded = query.domain.as_deref().and_then(normalize_domain);

    Archetype::ALL
        .iter()
        .enumerate()
        .map(|(idx, archetype)| {
            let (authority, quality) = archetype.priors();
            let mut quality = quality + jitter(&seed, archetype.label(), "quality");
            if commercial && archetype.benefits_from_commercial_intent() {
                quality += COMMERCIAL_QUALITY_BONUS;
            }
            let authority = authority + jitter(&seed, archetype.label(), "authority");

            let entity_matches = context
                .iter()
                .enumerate()
                .filter(|(j, _)| j % (idx + 1) == 0)
                .map(|(_, e)| e.clone())
                .collect();

            NormalizedCompetitor {
                url: archetype.url(&slug),
                title: archetype.title(keyword),
                snippet: archetype.snippet(keyword),
                domain_authority_estimate: authority.clamp(0.0, 1.0),
                content_quality_estimate: quality.clamp(0.0, 1.0),
                entity_matches,
                source: ProviderName::Synthetic,
                is_synthetic: true,
                analysis_is_synthetic: true,
            }
        })
        .filter(|c| match (&excluded, c.host()) {
            (Some(domain), Some(host)) => !host_matches(&host, domain),
            _ => true,
        })
        .take(query.limit.max(1))
        .collect()
}

/// Deterministic offset in `[-0.05, 0.05]` from SHA-256 of the inputs.
#[allow(clippy::cast_precision_loss)]
fn jitter(seed: &str, archetype: &str, field: &str) -> f64 {
    let digest = Sha256::digest(format!("{seed}|{archetype}|{field}").as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    let unit = u64::from_be_bytes(bytes) as f64 / u64::MAX as f64;
    (unit * 2.0 - 1.0) * PRIOR_JITTER
}

/// Hex fallback for keywords with no ASCII alphanumerics to slug.
fn jitter_slug(seed: &str) -> String {
    let digest = Sha256::digest(seed.as_bytes());
    digest[..6].iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// Generative insight template
// ---------------------------------------------------------------------------

fn template_insight(brief: &InsightBrief) -> GeneratedInsight {
    let keyword = &brief.keyword;
    let mut outline = vec![OutlineSection {
        heading: truncate_chars(
            &format!("{}: The Complete Guide", keyword.title_case()),
            HEADING_MAX_CHARS,
        ),
        level: 1,
        notes: vec![format!(
            "Introduce {keyword} and who this guide is for"
        )],
    }];

    let mut seen = HashSet::new();
    for competitor in &brief.competitors {
        let heading = clean_competitor_title(&competitor.title);
        if heading.is_empty() || !seen.insert(heading.to_lowercase()) {
            continue;
        }
        outline.push(OutlineSection {
            heading: truncate_chars(&heading, HEADING_MAX_CHARS),
            level: 2,
            notes: vec![format!(
                "Match and extend what {} covers (rank {})",
                competitor.url, competitor.rank
            )],
        });
    }

    let concept_notes = if brief.entities.is_empty() {
        vec![format!("Define the core terms behind {keyword}")]
    } else {
        brief.entities.clone()
    };
    outline.push(OutlineSection {
        heading: "Key Concepts".to_string(),
        level: 2,
        notes: concept_notes,
    });

    outline.push(OutlineSection {
        heading: truncate_chars(
            &format!("Frequently Asked Questions About {keyword}"),
            HEADING_MAX_CHARS,
        ),
        level: 2,
        notes: vec![
            format!("What should I know about {keyword}?"),
            format!("How do I get started with {keyword}?"),
            format!("What mistakes should I avoid with {keyword}?"),
        ],
    });

    outline.push(OutlineSection {
        heading: "Conclusion".to_string(),
        level: 2,
        notes: vec![format!("Summarize the key takeaways about {keyword}")],
    });

    GeneratedInsight {
        outline,
        recommendations: template_recommendations(brief),
        is_synthetic: true,
    }
}

fn template_recommendations(brief: &InsightBrief) -> Vec<String> {
    let keyword = &brief.keyword;
    let total = brief.competitors.len();
    let mut recommendations = Vec::new();

    if total > 0 && brief.keyword_in_title == total {
        recommendations.push(format!(
            "Every top competitor uses \"{keyword}\" in its title; match that and add a distinct angle."
        ));
    } else {
        recommendations.push(format!(
            "Use the exact keyword \"{keyword}\" in your title; {} of the top {total} competitors do.",
            brief.keyword_in_title
        ));
    }

    if !brief.entities.is_empty() {
        let names: Vec<&str> = brief.entities.iter().take(5).map(String::as_str).collect();
        recommendations.push(format!("Cover these entities in depth: {}.", names.join(", ")));
    }

    if let Some(leader) = brief.competitors.first() {
        recommendations.push(format!(
            "Outperform the current leader, {} (score {:.1}), with more comprehensive coverage.",
            leader.url, leader.total_score
        ));
    }

    recommendations.push(
        "Keep the title between 30 and 65 characters and write a description of at least 80 characters."
            .to_string(),
    );

    recommendations
        .into_iter()
        .map(|r| truncate_chars(&r, RECOMMENDATION_MAX_CHARS))
        .collect()
}

/// Strips a trailing site name such as `" | Site"` or `" - Site"`.
pub(crate) fn clean_competitor_title(title: &str) -> String {
    let cut = [" | ", " - "]
        .iter()
        .filter_map(|sep| title.find(sep))
        .min()
        .unwrap_or(title.len());
    title[..cut].trim().to_string()
}

#[cfg(test)]
#[path = "synthetic_test.rs"]
mod tests;
