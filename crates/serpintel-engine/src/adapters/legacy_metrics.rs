use async_trait::async_trait;
use serpintel_core::{Capability, LegacyMetricsSettings, ProviderName};
use serpintel_providers::{HttpOptions, LegacyMetricsClient, ProviderError};

use crate::adapter::Adapter;
use crate::error::AdapterError;
use crate::payload::RawPayload;
use crate::request::ProviderRequest;

/// Keyword volume, CPC, and competition from the legacy metrics export.
pub struct LegacyMetricsAdapter {
    client: Option<LegacyMetricsClient>,
}

impl LegacyMetricsAdapter {
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the client cannot be built.
    pub fn from_settings(
        settings: &LegacyMetricsSettings,
        options: &HttpOptions,
    ) -> Result<Self, ProviderError> {
        let database = settings
            .database
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());
        let client = match settings.api_key() {
            Some(api_key) => Some(match super::base_url(&settings.base_url) {
                Some(base) => LegacyMetricsClient::with_base_url(api_key, database, options, base)?,
                None => LegacyMetricsClient::new(api_key, database, options)?,
            }),
            None => None,
        };
        Ok(Self { client })
    }

    #[must_use]
    pub fn with_client(client: LegacyMetricsClient) -> Self {
        Self {
            client: Some(client),
        }
    }
}

#[async_trait]
impl Adapter for LegacyMetricsAdapter {
    fn name(&self) -> ProviderName {
        ProviderName::LegacyMetrics
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::KeywordMetrics]
    }

    fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    async fn call(
        &self,
        capability: Capability,
        request: &ProviderRequest,
    ) -> Result<RawPayload, AdapterError> {
        let client = self
            .client
            .as_ref()
            .ok_or(AdapterError::NotConfigured(self.name()))?;
        match (capability, request) {
            (Capability::KeywordMetrics, ProviderRequest::Keyword(query)) => {
                let rows = client
                    .related_keywords(query.keyword.as_str(), query.limit)
                    .await?;
                Ok(RawPayload::LegacyMetrics(rows))
            }
            _ => Err(AdapterError::Unsupported {
                provider: self.name(),
                capability,
            }),
        }
    }
}
