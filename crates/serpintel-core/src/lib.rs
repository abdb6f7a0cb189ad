//! Shared configuration, input validation, and data model for SERPINTEL.

pub mod app_config;
pub mod config;
pub mod keyword;
pub mod model;

pub use app_config::{
    AppConfig, Environment, GenerativeSettings, KnowledgeGraphSettings, LanguageSettings,
    LegacyMetricsSettings, ProvidersConfig, WebSearchSettings,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use keyword::{Keyword, MAX_KEYWORD_CHARS};
pub use model::{
    Blueprint, Capability, ClientStatus, CompositeScore, EntityRef, KeywordMetric,
    NormalizedCompetitor, OutlineSection, ProviderName,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Caller input errors. These are the only request-level failures the
/// engine surfaces.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("keyword must not be empty")]
    EmptyKeyword,

    #[error("keyword is {len} characters; the maximum is {max}")]
    KeywordTooLong { len: usize, max: usize },
}
