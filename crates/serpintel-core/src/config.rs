use crate::app_config::{
    AppConfig, Environment, GenerativeSettings, KnowledgeGraphSettings, LanguageSettings,
    LegacyMetricsSettings, ProvidersConfig, WebSearchSettings,
};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a pure
/// `HashMap` lookup. Provider credentials are all optional; blank values are
/// treated the same as absent ones.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("SERPINTEL_ENV", "development"));
    let log_level = or_default("SERPINTEL_LOG_LEVEL", "info");
    let provider_timeout_ms = parse_u64("SERPINTEL_PROVIDER_TIMEOUT_MS", "8000")?;
    let user_agent = or_default(
        "SERPINTEL_USER_AGENT",
        "serpintel/0.1 (competitor-intelligence)",
    );
    let max_competitors = parse_usize("SERPINTEL_MAX_COMPETITORS", "10")?;
    let enrich_concurrency = parse_usize("SERPINTEL_ENRICH_CONCURRENCY", "4")?;

    if provider_timeout_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SERPINTEL_PROVIDER_TIMEOUT_MS".to_string(),
            reason: "timeout must be greater than zero".to_string(),
        });
    }

    let providers = ProvidersConfig {
        web_search: WebSearchSettings {
            api_key: optional("WEB_SEARCH_API_KEY"),
            engine_id: optional("WEB_SEARCH_ENGINE_ID"),
            base_url: optional("WEB_SEARCH_BASE_URL"),
        },
        knowledge_graph: KnowledgeGraphSettings {
            api_key: optional("KNOWLEDGE_GRAPH_API_KEY"),
            base_url: optional("KNOWLEDGE_GRAPH_BASE_URL"),
        },
        language: LanguageSettings {
            api_key: optional("LANGUAGE_API_KEY"),
            base_url: optional("LANGUAGE_BASE_URL"),
        },
        generative: GenerativeSettings {
            api_key: optional("GENERATIVE_API_KEY"),
            model: optional("GENERATIVE_MODEL"),
            base_url: optional("GENERATIVE_BASE_URL"),
        },
        legacy_metrics: LegacyMetricsSettings {
            api_key: optional("LEGACY_METRICS_API_KEY"),
            database: optional("LEGACY_METRICS_DATABASE"),
            base_url: optional("LEGACY_METRICS_BASE_URL"),
        },
    };

    Ok(AppConfig {
        env,
        log_level,
        provider_timeout_ms,
        user_agent,
        max_competitors,
        enrich_concurrency,
        providers,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
