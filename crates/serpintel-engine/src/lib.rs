//! Provider orchestration and degradation engine.
//!
//! Resolves each capability (discovery, entity lookup, content analysis,
//! generative insight, keyword metrics) through a fixed-priority fallback
//! chain of provider adapters, bottoming out at a deterministic synthetic
//! estimator. Normalized results are scored, ranked, and folded into a
//! content blueprint. Provider failures never fail an analysis; they only
//! show up in the per-provider status table.

pub mod adapter;
pub mod adapters;
pub mod analysis;
pub mod chain;
pub mod error;
pub mod insight;
pub mod normalize;
pub mod payload;
pub mod request;
pub mod scoring;
pub mod status;
pub mod synthetic;

mod text;

pub use adapter::Adapter;
pub use analysis::{AnalysisRequest, AnalysisReport, AnalysisSettings, Analyzer, ScoredCompetitor};
pub use chain::{FallbackChain, ProviderResult, Resolved};
pub use error::{AdapterError, EngineError, FailureKind, NormalizeError};
pub use payload::{ContentProfile, GeneratedInsight, Payload, RawPayload};
pub use request::{BriefCompetitor, ContentQuery, InsightBrief, KeywordQuery, ProviderRequest};
pub use scoring::{score, ScoringContext, WEIGHTS};
pub use status::StatusStore;
