//! Client for a Custom Search JSON API-compatible web search index.

use reqwest::{Client, Url};

use crate::error::ProviderError;
use crate::http::{self, HttpOptions};
use crate::types::SearchResponse;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/";
const PROVIDER: &str = "web_search";

/// The API returns at most ten results per page.
pub const MAX_RESULTS_PER_PAGE: usize = 10;

/// Client for the web search index.
///
/// Use [`WebSearchClient::new`] for production or
/// [`WebSearchClient::with_base_url`] to point at a mock server in tests.
pub struct WebSearchClient {
    client: Client,
    api_key: String,
    engine_id: String,
    base_url: Url,
}

impl WebSearchClient {
    /// Creates a client pointed at the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, engine_id: &str, options: &HttpOptions) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, engine_id, options, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the client cannot be constructed or
    /// [`ProviderError::InvalidBaseUrl`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        engine_id: &str,
        options: &HttpOptions,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http::build_client(options)?,
            api_key: api_key.to_owned(),
            engine_id: engine_id.to_owned(),
            base_url: http::parse_base_url(base_url)?,
        })
    }

    /// Searches the index and returns up to `limit` (≤ 10) organic results.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::RateLimited`] on HTTP 429.
    /// - [`ProviderError::Api`] / [`ProviderError::UnexpectedStatus`] on other non-2xx.
    /// - [`ProviderError::Http`] on network failure or timeout.
    /// - [`ProviderError::Deserialize`] if the body does not match [`SearchResponse`].
    pub async fn search(&self, query: &str, limit: usize) -> Result<SearchResponse, ProviderError> {
        let url = self.build_url(query, limit)?;
        tracing::debug!(provider = PROVIDER, query, limit, "web search request");

        let response = self.client.get(url).send().await.map_err(http::without_url)?;
        let body = http::read_body(PROVIDER, response).await?;
        http::decode_json(&format!("search(q={query})"), &body)
    }

    fn build_url(&self, query: &str, limit: usize) -> Result<Url, ProviderError> {
        let mut url = http::endpoint(&self.base_url, "customsearch/v1")?;
        let num = limit.clamp(1, MAX_RESULTS_PER_PAGE);
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("cx", &self.engine_id)
            .append_pair("q", query)
            .append_pair("num", &num.to_string());
        Ok(url)
    }
}
