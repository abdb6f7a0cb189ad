//! Adapters wrapping each provider client behind [`Adapter`].

mod generative;
mod knowledge_graph;
mod language;
mod legacy_metrics;
mod web_search;

use std::sync::Arc;

use serpintel_core::ProvidersConfig;
use serpintel_providers::{HttpOptions, ProviderError};

use crate::adapter::Adapter;

pub use generative::GenerativeAdapter;
pub use knowledge_graph::KnowledgeGraphAdapter;
pub use language::LanguageAdapter;
pub use legacy_metrics::LegacyMetricsAdapter;
pub use web_search::WebSearchAdapter;

/// Builds one adapter per live provider. Providers without credentials are
/// still returned, reporting `is_configured() == false`.
///
/// # Errors
///
/// Returns [`ProviderError`] if an HTTP client cannot be built or a base URL
/// override is malformed.
pub fn build_adapters(
    providers: &ProvidersConfig,
    options: &HttpOptions,
) -> Result<Vec<Arc<dyn Adapter>>, ProviderError> {
    let adapters: Vec<Arc<dyn Adapter>> = vec![
        Arc::new(WebSearchAdapter::from_settings(&providers.web_search, options)?),
        Arc::new(KnowledgeGraphAdapter::from_settings(
            &providers.knowledge_graph,
            options,
        )?),
        Arc::new(LanguageAdapter::from_settings(&providers.language, options)?),
        Arc::new(GenerativeAdapter::from_settings(&providers.generative, options)?),
        Arc::new(LegacyMetricsAdapter::from_settings(
            &providers.legacy_metrics,
            options,
        )?),
    ];

    for adapter in &adapters {
        tracing::debug!(
            provider = %adapter.name(),
            configured = adapter.is_configured(),
            "provider adapter ready"
        );
    }

    Ok(adapters)
}

/// The configured base URL override, if any.
fn base_url(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use serpintel_core::{LegacyMetricsSettings, ProviderName, WebSearchSettings};

    use super::*;

    #[test]
    fn unconfigured_providers_are_still_built() {
        let adapters = build_adapters(&ProvidersConfig::default(), &HttpOptions::default()).unwrap();
        let names: Vec<ProviderName> = adapters.iter().map(|a| a.name()).collect();
        assert_eq!(names, ProviderName::LIVE.to_vec());
        assert!(adapters.iter().all(|a| !a.is_configured()));
    }

    #[test]
    fn configured_flag_follows_credentials() {
        let providers = ProvidersConfig {
            web_search: WebSearchSettings {
                api_key: Some("key".to_string()),
                engine_id: Some("cx".to_string()),
                base_url: None,
            },
            legacy_metrics: LegacyMetricsSettings {
                api_key: Some("  ".to_string()),
                database: None,
                base_url: None,
            },
            ..ProvidersConfig::default()
        };
        let adapters = build_adapters(&providers, &HttpOptions::default()).unwrap();
        assert!(adapters[0].is_configured());
        assert!(!adapters[4].is_configured());
    }

    #[test]
    fn malformed_base_url_is_a_setup_error() {
        let providers = ProvidersConfig {
            web_search: WebSearchSettings {
                api_key: Some("key".to_string()),
                engine_id: Some("cx".to_string()),
                base_url: Some("not a url".to_string()),
            },
            ..ProvidersConfig::default()
        };
        let err = build_adapters(&providers, &HttpOptions::default()).err();
        assert!(
            matches!(err, Some(ProviderError::InvalidBaseUrl { .. })),
            "{err:?}"
        );
    }
}
