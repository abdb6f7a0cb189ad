//! Client for a knowledge-graph entity search API.

use reqwest::{Client, Url};

use crate::error::ProviderError;
use crate::http::{self, HttpOptions};
use crate::types::EntitySearchResponse;

const DEFAULT_BASE_URL: &str = "https://kgsearch.googleapis.com/";
const PROVIDER: &str = "knowledge_graph";

pub struct KnowledgeGraphClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl KnowledgeGraphClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built.
    pub fn new(api_key: &str, options: &HttpOptions) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, options, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built or
    /// [`ProviderError::InvalidBaseUrl`] for a malformed `base_url`.
    pub fn with_base_url(
        api_key: &str,
        options: &HttpOptions,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http::build_client(options)?,
            api_key: api_key.to_owned(),
            base_url: http::parse_base_url(base_url)?,
        })
    }

    /// Looks up entities matching `query`, best match first.
    ///
    /// # Errors
    ///
    /// Same classification as [`crate::WebSearchClient::search`].
    pub async fn search_entities(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<EntitySearchResponse, ProviderError> {
        let url = self.build_url(query, limit)?;
        tracing::debug!(provider = PROVIDER, query, limit, "entity search request");

        let response = self.client.get(url).send().await.map_err(http::without_url)?;
        let body = http::read_body(PROVIDER, response).await?;
        http::decode_json(&format!("entities:search(query={query})"), &body)
    }

    fn build_url(&self, query: &str, limit: usize) -> Result<Url, ProviderError> {
        let mut url = http::endpoint(&self.base_url, "v1/entities:search")?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("key", &self.api_key)
            .append_pair("limit", &limit.max(1).to_string())
            .append_pair("indent", "false");
        Ok(url)
    }
}
