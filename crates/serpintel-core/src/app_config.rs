#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Returns the value only when it is present and not blank.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn redact(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "[redacted]")
}

/// Web search index credentials (`WEB_SEARCH_*`).
#[derive(Clone, Default)]
pub struct WebSearchSettings {
    pub api_key: Option<String>,
    pub engine_id: Option<String>,
    pub base_url: Option<String>,
}

impl WebSearchSettings {
    /// `(api_key, engine_id)` when both are present and non-blank.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((present(&self.api_key)?, present(&self.engine_id)?))
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }
}

impl std::fmt::Debug for WebSearchSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSearchSettings")
            .field("api_key", &redact(&self.api_key))
            .field("engine_id", &self.engine_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Knowledge graph lookup credentials (`KNOWLEDGE_GRAPH_*`).
#[derive(Clone, Default)]
pub struct KnowledgeGraphSettings {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl KnowledgeGraphSettings {
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        present(&self.api_key)
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }
}

impl std::fmt::Debug for KnowledgeGraphSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeGraphSettings")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Natural-language analysis credentials (`LANGUAGE_*`).
#[derive(Clone, Default)]
pub struct LanguageSettings {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl LanguageSettings {
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        present(&self.api_key)
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }
}

impl std::fmt::Debug for LanguageSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageSettings")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Generative text service credentials (`GENERATIVE_*`).
#[derive(Clone, Default)]
pub struct GenerativeSettings {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl GenerativeSettings {
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        present(&self.api_key)
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }
}

impl std::fmt::Debug for GenerativeSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerativeSettings")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Legacy search-metrics provider credentials (`LEGACY_METRICS_*`).
#[derive(Clone, Default)]
pub struct LegacyMetricsSettings {
    pub api_key: Option<String>,
    pub database: Option<String>,
    pub base_url: Option<String>,
}

impl LegacyMetricsSettings {
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        present(&self.api_key)
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }
}

impl std::fmt::Debug for LegacyMetricsSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyMetricsSettings")
            .field("api_key", &redact(&self.api_key))
            .field("database", &self.database)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Credentials and endpoint overrides for every external provider.
///
/// A provider with missing credentials is not an error: its adapter simply
/// reports itself as unconfigured.
#[derive(Debug, Clone, Default)]
pub struct ProvidersConfig {
    pub web_search: WebSearchSettings,
    pub knowledge_graph: KnowledgeGraphSettings,
    pub language: LanguageSettings,
    pub generative: GenerativeSettings,
    pub legacy_metrics: LegacyMetricsSettings,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub provider_timeout_ms: u64,
    pub user_agent: String,
    pub max_competitors: usize,
    pub enrich_concurrency: usize,
    pub providers: ProvidersConfig,
}
