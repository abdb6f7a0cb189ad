//! Typed HTTP clients for the external data providers SERPINTEL consults.
//!
//! Each client owns a `reqwest::Client`, its credentials, and a base URL that
//! tests point at a wiremock server. Clients make exactly one request per
//! call; fallback between providers is the engine's job.

pub mod error;
pub mod generative;
pub mod http;
pub mod knowledge_graph;
pub mod language;
pub mod legacy_metrics;
pub mod types;
pub mod web_search;

pub use error::ProviderError;
pub use generative::GenerativeClient;
pub use http::HttpOptions;
pub use knowledge_graph::KnowledgeGraphClient;
pub use language::LanguageClient;
pub use legacy_metrics::LegacyMetricsClient;
pub use types::{
    AnalyzeEntitiesResponse, EntitySearchResponse, GenerateContentResponse, KeywordRow,
    SearchResponse,
};
pub use web_search::WebSearchClient;
