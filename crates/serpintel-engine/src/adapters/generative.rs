use async_trait::async_trait;
use serpintel_core::{Capability, GenerativeSettings, ProviderName};
use serpintel_providers::{GenerativeClient, HttpOptions, ProviderError};

use crate::adapter::Adapter;
use crate::error::AdapterError;
use crate::payload::RawPayload;
use crate::request::ProviderRequest;

/// Content blueprint generation from an [`crate::InsightBrief`].
pub struct GenerativeAdapter {
    client: Option<GenerativeClient>,
}

impl GenerativeAdapter {
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the client cannot be built.
    pub fn from_settings(
        settings: &GenerativeSettings,
        options: &HttpOptions,
    ) -> Result<Self, ProviderError> {
        let model = settings
            .model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty());
        let client = match settings.api_key() {
            Some(api_key) => Some(match super::base_url(&settings.base_url) {
                Some(base) => GenerativeClient::with_base_url(api_key, model, options, base)?,
                None => GenerativeClient::new(api_key, model, options)?,
            }),
            None => None,
        };
        Ok(Self { client })
    }

    #[must_use]
    pub fn with_client(client: GenerativeClient) -> Self {
        Self {
            client: Some(client),
        }
    }
}

#[async_trait]
impl Adapter for GenerativeAdapter {
    fn name(&self) -> ProviderName {
        ProviderName::GenerativeInsight
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::GenerativeInsight]
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
            (Capability::GenerativeInsight, ProviderRequest::Insight(brief)) => {
                let response = client.generate(&brief.prompt()).await?;
                Ok(RawPayload::Generative(response))
            }
            _ => Err(AdapterError::Unsupported {
                provider: self.name(),
                capability,
            }),
        }
    }
}
