use async_trait::async_trait;
use serpintel_core::{Capability, ProviderName, WebSearchSettings};
use serpintel_providers::{HttpOptions, ProviderError, WebSearchClient};

use crate::adapter::Adapter;
use crate::error::AdapterError;
use crate::payload::RawPayload;
use crate::request::ProviderRequest;

/// Discovery through the web search index.
pub struct WebSearchAdapter {
    client: Option<WebSearchClient>,
}

impl WebSearchAdapter {
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the client cannot be built.
    pub fn from_settings(
        settings: &WebSearchSettings,
        options: &HttpOptions,
    ) -> Result<Self, ProviderError> {
        let client = match settings.credentials() {
            Some((api_key, engine_id)) => Some(match super::base_url(&settings.base_url) {
                Some(base) => WebSearchClient::with_base_url(api_key, engine_id, options, base)?,
                None => WebSearchClient::new(api_key, engine_id, options)?,
            }),
            None => None,
        };
        Ok(Self { client })
    }

    #[must_use]
    pub fn with_client(client: WebSearchClient) -> Self {
        Self {
            client: Some(client),
        }
    }
}

#[async_trait]
impl Adapter for WebSearchAdapter {
    fn name(&self) -> ProviderName {
        ProviderName::WebSearch
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Discovery]
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
            (Capability::Discovery, ProviderRequest::Keyword(query)) => {
                let response = client.search(query.keyword.as_str(), query.limit).await?;
                Ok(RawPayload::WebSearch(response))
            }
            _ => Err(AdapterError::Unsupported {
                provider: self.name(),
                capability,
            }),
        }
    }
}
