//! Shared HTTP plumbing: client construction, base URL handling, and status
//! classification common to every provider.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::ProviderError;

const DEFAULT_USER_AGENT: &str = "serpintel/0.1 (competitor-intelligence)";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-client HTTP settings.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub timeout: Duration,
    pub user_agent: String,
}

impl HttpOptions {
    #[must_use]
    pub fn new(timeout: Duration, user_agent: &str) -> Self {
        Self {
            timeout,
            user_agent: user_agent.to_owned(),
        }
    }
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }
}

/// Builds a `reqwest::Client` with the configured timeout and `User-Agent`.
///
/// # Errors
///
/// Returns [`ProviderError::Http`] if the client cannot be constructed.
pub(crate) fn build_client(options: &HttpOptions) -> Result<Client, ProviderError> {
    let client = Client::builder()
        .timeout(options.timeout)
        .connect_timeout(options.timeout.min(MAX_CONNECT_TIMEOUT))
        .user_agent(&options.user_agent)
        .build()?;
    Ok(client)
}

/// Parses a base URL, ensuring it ends with exactly one slash so that
/// relative endpoint paths are joined onto it rather than replacing its last
/// segment.
///
/// # Errors
///
/// Returns [`ProviderError::InvalidBaseUrl`] when the value is not a URL.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, ProviderError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| ProviderError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })
}

/// Joins a relative endpoint path onto a base URL.
///
/// # Errors
///
/// Returns [`ProviderError::InvalidBaseUrl`] if the join fails.
pub(crate) fn endpoint(base: &Url, path: &str) -> Result<Url, ProviderError> {
    base.join(path).map_err(|e| ProviderError::InvalidBaseUrl {
        base_url: base.to_string(),
        reason: format!("cannot join '{path}': {e}"),
    })
}

/// Strips the request URL (which carries the API key) from a transport error.
pub(crate) fn without_url(err: reqwest::Error) -> ProviderError {
    ProviderError::Http(err.without_url())
}

/// Classifies the response status and returns the body text on success.
///
/// - 429 → [`ProviderError::RateLimited`] (honouring `Retry-After` seconds).
/// - other non-2xx with a `{"error": {"message": ...}}` body → [`ProviderError::Api`].
/// - other non-2xx → [`ProviderError::UnexpectedStatus`].
///
/// # Errors
///
/// See above; body read failures surface as [`ProviderError::Http`].
pub(crate) async fn read_body(
    provider: &'static str,
    response: Response,
) -> Result<String, ProviderError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60);
        return Err(ProviderError::RateLimited {
            provider,
            retry_after_secs,
        });
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(match api_error_message(&body) {
            Some(message) => ProviderError::Api {
                provider,
                message: format!("{}: {message}", status.as_u16()),
            },
            None => ProviderError::UnexpectedStatus {
                provider,
                status: status.as_u16(),
            },
        });
    }

    response.text().await.map_err(without_url)
}

/// Deserializes a JSON body, tagging failures with the provider and operation.
///
/// # Errors
///
/// Returns [`ProviderError::Deserialize`] when the body does not match `T`.
pub(crate) fn decode_json<T: DeserializeOwned>(
    context: &str,
    body: &str,
) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

/// Extracts `error.message` from a Google-style JSON error envelope.
fn api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}
