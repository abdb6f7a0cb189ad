use async_trait::async_trait;
use serpintel_core::{Capability, LanguageSettings, ProviderName};
use serpintel_providers::{HttpOptions, LanguageClient, ProviderError};

use crate::adapter::Adapter;
use crate::error::AdapterError;
use crate::payload::RawPayload;
use crate::request::ProviderRequest;

/// Entity extraction from text. Serves entity lookup (on the keyword itself)
/// and per-competitor content analysis.
pub struct LanguageAdapter {
    client: Option<LanguageClient>,
}

impl LanguageAdapter {
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the client cannot be built.
    pub fn from_settings(
        settings: &LanguageSettings,
        options: &HttpOptions,
    ) -> Result<Self, ProviderError> {
        let client = match settings.api_key() {
            Some(api_key) => Some(match super::base_url(&settings.base_url) {
                Some(base) => LanguageClient::with_base_url(api_key, options, base)?,
                None => LanguageClient::new(api_key, options)?,
            }),
            None => None,
        };
        Ok(Self { client })
    }

    #[must_use]
    pub fn with_client(client: LanguageClient) -> Self {
        Self {
            client: Some(client),
        }
    }
}

#[async_trait]
impl Adapter for LanguageAdapter {
    fn name(&self) -> ProviderName {
        ProviderName::LanguageAnalysis
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::EntityLookup, Capability::ContentAnalysis]
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
        let text = match (capability, request) {
            (Capability::EntityLookup, ProviderRequest::Keyword(query)) => query.keyword.as_str(),
            (Capability::ContentAnalysis, ProviderRequest::Content(query)) => query.text.as_str(),
            _ => {
                return Err(AdapterError::Unsupported {
                    provider: self.name(),
                    capability,
                })
            }
        };
        let response = client.analyze_entities(text).await?;
        Ok(RawPayload::Language(response))
    }
}
