//! Client for a generative text API (`generateContent`).

use reqwest::{Client, Url};
use serde::Serialize;

use crate::error::ProviderError;
use crate::http::{self, HttpOptions};
use crate::types::GenerateContentResponse;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const PROVIDER: &str = "generative_insight";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

pub struct GenerativeClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: Url,
}

impl GenerativeClient {
    /// `model` defaults to `gemini-1.5-flash` when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built.
    pub fn new(
        api_key: &str,
        model: Option<&str>,
        options: &HttpOptions,
    ) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, model, options, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built or
    /// [`ProviderError::InvalidBaseUrl`] for a malformed `base_url`.
    pub fn with_base_url(
        api_key: &str,
        model: Option<&str>,
        options: &HttpOptions,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http::build_client(options)?,
            api_key: api_key.to_owned(),
            model: model.unwrap_or(DEFAULT_MODEL).to_owned(),
            base_url: http::parse_base_url(base_url)?,
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends a single-turn prompt and returns the raw candidates.
    ///
    /// # Errors
    ///
    /// Same classification as [`crate::WebSearchClient::search`].
    pub async fn generate(&self, prompt: &str) -> Result<GenerateContentResponse, ProviderError> {
        let url = self.build_url()?;
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.4,
                max_output_tokens: 1024,
            },
        };
        tracing::debug!(provider = PROVIDER, model = %self.model, "generate content request");

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(http::without_url)?;
        let body = http::read_body(PROVIDER, response).await?;
        http::decode_json(&format!("generateContent(model={})", self.model), &body)
    }

    fn build_url(&self) -> Result<Url, ProviderError> {
        let path = format!("v1beta/models/{}:generateContent", self.model);
        let mut url = http::endpoint(&self.base_url, &path)?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_includes_model() {
        let client = GenerativeClient::with_base_url(
            "gen-key",
            None,
            &HttpOptions::default(),
            "https://generativelanguage.googleapis.com",
        )
        .unwrap();
        assert_eq!(client.model(), "gemini-1.5-flash");
        assert_eq!(
            client.build_url().unwrap().as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent?key=gen-key"
        );
    }

    #[test]
    fn request_body_uses_camel_case() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hi" }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.5,
                max_output_tokens: 10,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 10);
    }
}
