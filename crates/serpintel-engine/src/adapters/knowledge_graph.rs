use async_trait::async_trait;
use serpintel_core::{Capability, KnowledgeGraphSettings, ProviderName};
use serpintel_providers::{HttpOptions, KnowledgeGraphClient, ProviderError};

use crate::adapter::Adapter;
use crate::error::AdapterError;
use crate::payload::RawPayload;
use crate::request::ProviderRequest;

/// Entity lookup against the knowledge graph.
pub struct KnowledgeGraphAdapter {
    client: Option<KnowledgeGraphClient>,
}

impl KnowledgeGraphAdapter {
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the client cannot be built.
    pub fn from_settings(
        settings: &KnowledgeGraphSettings,
        options: &HttpOptions,
    ) -> Result<Self, ProviderError> {
        let client = match settings.api_key() {
            Some(api_key) => Some(match super::base_url(&settings.base_url) {
                Some(base) => KnowledgeGraphClient::with_base_url(api_key, options, base)?,
                None => KnowledgeGraphClient::new(api_key, options)?,
            }),
            None => None,
        };
        Ok(Self { client })
    }

    #[must_use]
    pub fn with_client(client: KnowledgeGraphClient) -> Self {
        Self {
            client: Some(client),
        }
    }
}

#[async_trait]
impl Adapter for KnowledgeGraphAdapter {
    fn name(&self) -> ProviderName {
        ProviderName::KnowledgeGraph
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::EntityLookup]
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
            (Capability::EntityLookup, ProviderRequest::Keyword(query)) => {
                let response = client
                    .search_entities(query.keyword.as_str(), query.limit)
                    .await?;
                Ok(RawPayload::KnowledgeGraph(response))
            }
            _ => Err(AdapterError::Unsupported {
                provider: self.name(),
                capability,
            }),
        }
    }
}
