//! Raw and normalized payloads flowing through a fallback chain.

use serde::Serialize;
use serpintel_core::{EntityRef, KeywordMetric, NormalizedCompetitor, OutlineSection};
use serpintel_providers::{
    AnalyzeEntitiesResponse, EntitySearchResponse, GenerateContentResponse, KeywordRow,
    SearchResponse,
};

/// Provider response exactly as the client decoded it.
#[derive(Debug, Clone)]
pub enum RawPayload {
    WebSearch(SearchResponse),
    KnowledgeGraph(EntitySearchResponse),
    Language(AnalyzeEntitiesResponse),
    Generative(GenerateContentResponse),
    LegacyMetrics(Vec<KeywordRow>),
}

/// Entities found in a competitor page plus an optional quality estimate.
/// `quality: None` leaves the competitor's existing estimate unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentProfile {
    pub entities: Vec<EntityRef>,
    pub quality: Option<f64>,
    pub is_synthetic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedInsight {
    pub outline: Vec<OutlineSection>,
    pub recommendations: Vec<String>,
    pub is_synthetic: bool,
}

/// Provider-independent result of one capability.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Payload {
    Competitors(Vec<NormalizedCompetitor>),
    Entities(Vec<EntityRef>),
    Content(ContentProfile),
    Keywords(Vec<KeywordMetric>),
    Insight(GeneratedInsight),
}

impl Payload {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Competitors(_) => "competitors",
            Payload::Entities(_) => "entities",
            Payload::Content(_) => "content",
            Payload::Keywords(_) => "keywords",
            Payload::Insight(_) => "insight",
        }
    }

    /// Number of records carried, used for logging.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Payload::Competitors(v) => v.len(),
            Payload::Entities(v) => v.len(),
            Payload::Content(p) => p.entities.len(),
            Payload::Keywords(v) => v.len(),
            Payload::Insight(i) => i.outline.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn into_competitors(self) -> Option<Vec<NormalizedCompetitor>> {
        match self {
            Payload::Competitors(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_entities(self) -> Option<Vec<EntityRef>> {
        match self {
            Payload::Entities(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_content(self) -> Option<ContentProfile> {
        match self {
            Payload::Content(p) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_keywords(self) -> Option<Vec<KeywordMetric>> {
        match self {
            Payload::Keywords(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_insight(self) -> Option<GeneratedInsight> {
        match self {
            Payload::Insight(i) => Some(i),
            _ => None,
        }
    }
}
