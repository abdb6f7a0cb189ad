//! Provider-independent data model shared by the engine and its callers.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A category of analysis request. Each capability maps to one fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Discovery,
    EntityLookup,
    ContentAnalysis,
    GenerativeInsight,
    KeywordMetrics,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::Discovery,
        Capability::EntityLookup,
        Capability::ContentAnalysis,
        Capability::GenerativeInsight,
        Capability::KeywordMetrics,
    ];
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::Discovery => write!(f, "discovery"),
            Capability::EntityLookup => write!(f, "entity_lookup"),
            Capability::ContentAnalysis => write!(f, "content_analysis"),
            Capability::GenerativeInsight => write!(f, "generative_insight"),
            Capability::KeywordMetrics => write!(f, "keyword_metrics"),
        }
    }
}

/// Where a record came from. `Synthetic` is the heuristic estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderName {
    WebSearch,
    KnowledgeGraph,
    LanguageAnalysis,
    GenerativeInsight,
    LegacyMetrics,
    Synthetic,
}

impl ProviderName {
    /// The live providers, in diagnostic order.
    pub const LIVE: [ProviderName; 5] = [
        ProviderName::WebSearch,
        ProviderName::KnowledgeGraph,
        ProviderName::LanguageAnalysis,
        ProviderName::GenerativeInsight,
        ProviderName::LegacyMetrics,
    ];

    #[must_use]
    pub fn is_synthetic(self) -> bool {
        self == ProviderName::Synthetic
    }
}

impl std::fmt::Display for ProviderName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderName::WebSearch => write!(f, "web_search"),
            ProviderName::KnowledgeGraph => write!(f, "knowledge_graph"),
            ProviderName::LanguageAnalysis => write!(f, "language_analysis"),
            ProviderName::GenerativeInsight => write!(f, "generative_insight"),
            ProviderName::LegacyMetrics => write!(f, "legacy_metrics"),
            ProviderName::Synthetic => write!(f, "synthetic"),
        }
    }
}

/// A named entity with a confidence in `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    pub name: String,
    pub entity_type: String,
    pub confidence: f64,
    /// Knowledge-graph machine id without the `kg:` prefix, e.g. `/m/0gq9h`.
    pub knowledge_graph_id: Option<String>,
}

impl EntityRef {
    /// Two entities refer to the same thing when both carry a knowledge-graph
    /// id and the ids match, or otherwise when their names match ignoring case.
    #[must_use]
    pub fn same_entity(&self, other: &EntityRef) -> bool {
        match (&self.knowledge_graph_id, &other.knowledge_graph_id) {
            (Some(a), Some(b)) => a == b,
            _ => self.name.trim().to_lowercase() == other.name.trim().to_lowercase(),
        }
    }
}

/// One competing page, in the provider-independent schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCompetitor {
    pub url: String,
    pub title: String,
    pub snippet: String,
    pub domain_authority_estimate: f64,
    pub content_quality_estimate: f64,
    pub entity_matches: Vec<EntityRef>,
    pub source: ProviderName,
    pub is_synthetic: bool,
    /// True when `entity_matches` / `content_quality_estimate` were filled in
    /// by the estimator rather than a live content analysis provider.
    pub analysis_is_synthetic: bool,
}

impl NormalizedCompetitor {
    /// Host part of the URL, lowercased, without a leading `www.`.
    #[must_use]
    pub fn host(&self) -> Option<String> {
        let rest = self.url.split_once("://").map_or(self.url.as_str(), |(_, r)| r);
        let host = rest.split(['/', '?', '#']).next()?.split(':').next()?;
        if host.is_empty() {
            return None;
        }
        let host = host.to_lowercase();
        Some(host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMetric {
    pub keyword: String,
    pub search_volume: u64,
    pub cpc_estimate: f64,
    pub competition: f64,
    pub is_synthetic: bool,
}

/// Weighted score for one competitor. `breakdown` contributions are in score
/// points and sum to `total_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub competitor_url: String,
    pub total_score: f64,
    pub breakdown: BTreeMap<String, f64>,
    pub rank: usize,
}

/// Diagnostic state of one live provider, overwritten after every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientStatus {
    pub provider_name: ProviderName,
    pub configured: bool,
    pub last_call_succeeded: Option<bool>,
    pub last_error: Option<String>,
    pub last_latency_ms: Option<u64>,
    pub last_called_at: Option<DateTime<Utc>>,
}

impl ClientStatus {
    #[must_use]
    pub fn new(provider_name: ProviderName, configured: bool) -> Self {
        Self {
            provider_name,
            configured,
            last_call_succeeded: None,
            last_error: None,
            last_latency_ms: None,
            last_called_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineSection {
    pub heading: String,
    /// Heading depth: 1 for the title, 2 for sections, 3 for subsections.
    pub level: u8,
    pub notes: Vec<String>,
}

/// Content blueprint produced by the insight aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blueprint {
    pub outline: Vec<OutlineSection>,
    pub recommendations: Vec<String>,
    pub cited_competitors: Vec<String>,
    pub source: ProviderName,
    pub is_synthetic: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(name: &str, id: Option<&str>) -> EntityRef {
        EntityRef {
            name: name.to_string(),
            entity_type: "Thing".to_string(),
            confidence: 0.5,
            knowledge_graph_id: id.map(str::to_string),
        }
    }

    fn competitor(url: &str) -> NormalizedCompetitor {
        NormalizedCompetitor {
            url: url.to_string(),
            title: String::new(),
            snippet: String::new(),
            domain_authority_estimate: 0.5,
            content_quality_estimate: 0.5,
            entity_matches: vec![],
            source: ProviderName::WebSearch,
            is_synthetic: false,
            analysis_is_synthetic: false,
        }
    }

    #[test]
    fn capability_serializes_snake_case() {
        let json = serde_json::to_string(&Capability::KeywordMetrics).unwrap();
        assert_eq!(json, "\"keyword_metrics\"");
        assert_eq!(Capability::EntityLookup.to_string(), "entity_lookup");
    }

    #[test]
    fn provider_display_matches_serde() {
        for provider in ProviderName::LIVE {
            let json = serde_json::to_string(&provider).unwrap();
            assert_eq!(json, format!("\"{provider}\""));
        }
    }

    #[test]
    fn live_providers_exclude_synthetic() {
        assert!(!ProviderName::LIVE.contains(&ProviderName::Synthetic));
        assert!(ProviderName::Synthetic.is_synthetic());
    }

    #[test]
    fn same_entity_prefers_knowledge_graph_id() {
        let a = entity("Nike", Some("/m/0gq9h"));
        let b = entity("Nike, Inc.", Some("/m/0gq9h"));
        let c = entity("Nike", Some("/m/other"));
        assert!(a.same_entity(&b));
        assert!(!a.same_entity(&c));
    }

    #[test]
    fn same_entity_falls_back_to_name() {
        let a = entity("Running Shoe", None);
        let b = entity("running shoe", Some("/m/01"));
        assert!(a.same_entity(&b));
    }

    #[test]
    fn same_entity_folds_non_ascii_case() {
        assert!(entity("Überlauf", None).same_entity(&entity("überlauf", None)));
        assert!(entity("ÉCOLE", None).same_entity(&entity("école", None)));
        assert!(!entity("école", None).same_entity(&entity("ecole", None)));
    }

    #[test]
    fn host_strips_scheme_www_and_path() {
        assert_eq!(
            competitor("https://www.Nike.com/running?x=1").host().as_deref(),
            Some("nike.com")
        );
        assert_eq!(
            competitor("http://shop.example:8080/a").host().as_deref(),
            Some("shop.example")
        );
        assert_eq!(competitor("https:///nothing").host(), None);
    }
}
