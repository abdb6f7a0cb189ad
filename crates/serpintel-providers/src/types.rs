//! Raw provider response types.
//!
//! Every field a provider may omit is optional or defaulted; turning these
//! shapes into the engine's schema (clamping, defaults, dedup) is the
//! normalizer's job, not the client's.

use std::collections::HashMap;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Web search (`customsearch/v1`)
// ---------------------------------------------------------------------------

/// Result page from the web search index.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Absent entirely when the query has no results.
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

/// One organic search result, in rank order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(rename = "displayLink", default)]
    pub display_link: Option<String>,
}

// ---------------------------------------------------------------------------
// Knowledge graph (`v1/entities:search`)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntitySearchResponse {
    #[serde(rename = "itemListElement", default)]
    pub item_list_element: Vec<EntitySearchElement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntitySearchElement {
    pub result: EntitySearchResult,
    /// Unbounded relevance score; only meaningful relative to the batch.
    #[serde(rename = "resultScore", default)]
    pub result_score: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntitySearchResult {
    /// Machine id such as `kg:/m/0gq9h`.
    #[serde(rename = "@id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "@type", default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Language analysis (`v1/documents:analyzeEntities`)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeEntitiesResponse {
    #[serde(default)]
    pub entities: Vec<LanguageEntity>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageEntity {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub entity_type: Option<String>,
    /// Nominally in `[0, 1]`, but not guaranteed.
    #[serde(default)]
    pub salience: Option<f64>,
    /// May contain `mid` (knowledge-graph id) and `wikipedia_url`.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

// ---------------------------------------------------------------------------
// Generative text (`v1beta/models/{model}:generateContent`)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(rename = "finishReason", default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentPart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if it has any text.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// ---------------------------------------------------------------------------
// Legacy search metrics (semicolon-separated export)
// ---------------------------------------------------------------------------

/// One keyword row from the legacy metrics export. Cells that fail to parse
/// are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRow {
    pub phrase: String,
    pub search_volume: Option<u64>,
    pub cpc: Option<f64>,
    pub competition: Option<f64>,
}
