//! Client for a natural-language entity analysis API.

use reqwest::{Client, Url};
use serde::Serialize;

use crate::error::ProviderError;
use crate::http::{self, HttpOptions};
use crate::types::AnalyzeEntitiesResponse;

const DEFAULT_BASE_URL: &str = "https://language.googleapis.com/";
const PROVIDER: &str = "language_analysis";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest<'a> {
    document: Document<'a>,
    encoding_type: &'static str,
}

#[derive(Debug, Serialize)]
struct Document<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    content: &'a str,
}

pub struct LanguageClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl LanguageClient {
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

    /// Extracts entities (with salience) from plain text.
    ///
    /// # Errors
    ///
    /// Same classification as [`crate::WebSearchClient::search`].
    pub async fn analyze_entities(
        &self,
        text: &str,
    ) -> Result<AnalyzeEntitiesResponse, ProviderError> {
        let mut url = http::endpoint(&self.base_url, "v1/documents:analyzeEntities")?;
        url.query_pairs_mut().append_pair("key", &self.api_key);

        let request = AnalyzeRequest {
            document: Document {
                kind: "PLAIN_TEXT",
                content: text,
            },
            encoding_type: "UTF8",
        };
        tracing::debug!(provider = PROVIDER, chars = text.len(), "analyze entities request");

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(http::without_url)?;
        let body = http::read_body(PROVIDER, response).await?;
        http::decode_json("documents:analyzeEntities", &body)
    }
}
