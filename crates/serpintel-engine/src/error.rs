use serde::{Deserialize, Serialize};
use serpintel_core::{Capability, CoreError, ProviderName};
use serpintel_providers::ProviderError;
use thiserror::Error;

/// Errors that reach the caller of the engine.
///
/// Provider failures are deliberately absent: the fallback chain absorbs them
/// and reports them through the status table instead.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid caller input, detected before any provider is contacted.
    #[error("invalid input: {0}")]
    Input(#[from] CoreError),

    /// The synthetic estimator was handed a request it cannot answer. This
    /// is a programming defect, not a runtime condition.
    #[error("estimator precondition violated for {capability}: {reason}")]
    EstimatorPrecondition {
        capability: Capability,
        reason: String,
    },

    /// A provider client could not be constructed at startup.
    #[error("provider setup failed: {0}")]
    Setup(#[from] ProviderError),
}

/// Failure returned by a single adapter call.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("{0} is not configured")]
    NotConfigured(ProviderName),

    #[error("{provider} does not support {capability}")]
    Unsupported {
        provider: ProviderName,
        capability: Capability,
    },
}

/// A raw payload that cannot be turned into a usable normalized result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("{provider} returned no usable {capability} data")]
    Empty {
        provider: ProviderName,
        capability: Capability,
    },

    #[error("{provider} payload cannot answer {capability}")]
    Mismatch {
        provider: ProviderName,
        capability: Capability,
    },
}

/// Coarse classification of why an attempt in a fallback chain failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    Network,
    RateLimited,
    Status,
    Api,
    Decode,
    Empty,
    Unsupported,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Network => "network",
            FailureKind::RateLimited => "rate_limited",
            FailureKind::Status => "status",
            FailureKind::Api => "api",
            FailureKind::Decode => "decode",
            FailureKind::Empty => "empty",
            FailureKind::Unsupported => "unsupported",
        };
        f.write_str(label)
    }
}

impl From<&ProviderError> for FailureKind {
    fn from(err: &ProviderError) -> Self {
        match err {
            ProviderError::Http(e) if e.is_timeout() => FailureKind::Timeout,
            ProviderError::Http(e) if e.is_decode() => FailureKind::Decode,
            ProviderError::Http(_) => FailureKind::Network,
            ProviderError::RateLimited { .. } => FailureKind::RateLimited,
            ProviderError::UnexpectedStatus { .. } => FailureKind::Status,
            ProviderError::Api { .. } | ProviderError::InvalidBaseUrl { .. } => FailureKind::Api,
            ProviderError::Deserialize { .. } | ProviderError::Parse { .. } => FailureKind::Decode,
        }
    }
}

impl From<&AdapterError> for FailureKind {
    fn from(err: &AdapterError) -> Self {
        match err {
            AdapterError::Provider(e) => FailureKind::from(e),
            AdapterError::NotConfigured(_) | AdapterError::Unsupported { .. } => {
                FailureKind::Unsupported
            }
        }
    }
}

impl From<&NormalizeError> for FailureKind {
    fn from(err: &NormalizeError) -> Self {
        match err {
            NormalizeError::Empty { .. } => FailureKind::Empty,
            NormalizeError::Mismatch { .. } => FailureKind::Unsupported,
        }
    }
}
