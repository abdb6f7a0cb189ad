//! Fallback chain controller.
//!
//! For each capability the controller walks a fixed priority list of
//! providers, skipping unconfigured ones, and stops at the first attempt whose
//! normalized payload is usable. When the list is exhausted the synthetic
//! estimator answers, so a resolve never fails because of a provider.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serpintel_core::{Capability, ProviderName};
use tokio::time::Instant;

use crate::adapter::Adapter;
use crate::error::{EngineError, FailureKind};
use crate::normalize::normalize;
use crate::payload::Payload;
use crate::request::ProviderRequest;
use crate::status::StatusStore;
use crate::synthetic;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

const DISCOVERY_CHAIN: &[ProviderName] = &[ProviderName::WebSearch];
const ENTITY_LOOKUP_CHAIN: &[ProviderName] =
    &[ProviderName::KnowledgeGraph, ProviderName::LanguageAnalysis];
const CONTENT_ANALYSIS_CHAIN: &[ProviderName] = &[ProviderName::LanguageAnalysis];
const GENERATIVE_INSIGHT_CHAIN: &[ProviderName] = &[ProviderName::GenerativeInsight];
const KEYWORD_METRICS_CHAIN: &[ProviderName] = &[ProviderName::LegacyMetrics];

/// Outcome of one attempt in a chain.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProviderResult {
    Success {
        provider: ProviderName,
        latency_ms: u64,
        records: usize,
    },
    Unavailable {
        provider: ProviderName,
        reason: String,
    },
    Error {
        provider: ProviderName,
        kind: FailureKind,
        message: String,
    },
}

impl ProviderResult {
    #[must_use]
    pub fn provider(&self) -> ProviderName {
        match self {
            ProviderResult::Success { provider, .. }
            | ProviderResult::Unavailable { provider, .. }
            | ProviderResult::Error { provider, .. } => *provider,
        }
    }
}

/// A successfully resolved capability.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub payload: Payload,
    /// The provider that answered; `Synthetic` when the chain was exhausted.
    pub provider: ProviderName,
    pub latency: Duration,
    /// Every attempt in order, ending with the answering one.
    pub attempts: Vec<ProviderResult>,
}

impl Resolved {
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.provider.is_synthetic()
    }
}

/// Walks per-capability provider priority lists.
pub struct FallbackChain {
    adapters: HashMap<ProviderName, Arc<dyn Adapter>>,
    status: Arc<StatusStore>,
    timeout: Duration,
}

impl FallbackChain {
    /// Creates a controller with its own status table.
    #[must_use]
    pub fn new(adapters: Vec<Arc<dyn Adapter>>, timeout: Duration) -> Self {
        Self::with_status_store(adapters, timeout, Arc::new(StatusStore::new()))
    }

    /// Creates a controller recording into a shared status table.
    #[must_use]
    pub fn with_status_store(
        adapters: Vec<Arc<dyn Adapter>>,
        timeout: Duration,
        status: Arc<StatusStore>,
    ) -> Self {
        let adapters: HashMap<ProviderName, Arc<dyn Adapter>> = adapters
            .into_iter()
            .filter(|a| !a.name().is_synthetic())
            .map(|a| (a.name(), a))
            .collect();
        for adapter in adapters.values() {
            status.register(adapter.name(), adapter.is_configured());
        }
        let timeout = if timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            timeout
        };
        Self {
            adapters,
            status,
            timeout,
        }
    }

    #[must_use]
    pub fn status(&self) -> &Arc<StatusStore> {
        &self.status
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Live providers tried for `capability`, highest priority first. The
    /// synthetic estimator always follows implicitly.
    #[must_use]
    pub fn priority(capability: Capability) -> &'static [ProviderName] {
        match capability {
            Capability::Discovery => DISCOVERY_CHAIN,
            Capability::EntityLookup => ENTITY_LOOKUP_CHAIN,
            Capability::ContentAnalysis => CONTENT_ANALYSIS_CHAIN,
            Capability::GenerativeInsight => GENERATIVE_INSIGHT_CHAIN,
            Capability::KeywordMetrics => KEYWORD_METRICS_CHAIN,
        }
    }

    /// Resolves `capability` for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EstimatorPrecondition`] when `request` cannot
    /// answer `capability`; this is checked before any adapter is invoked.
    /// Provider failures never surface here.
    pub async fn resolve(
        &self,
        capability: Capability,
        request: &ProviderRequest,
    ) -> Result<Resolved, EngineError> {
        if !request.accepts(capability) {
            return Err(EngineError::EstimatorPrecondition {
                capability,
                reason: format!("a {} request cannot answer it", request.variant()),
            });
        }

        let started = Instant::now();
        let mut attempts = Vec::new();

        for &provider in Self::priority(capability) {
            let Some(adapter) = self.adapters.get(&provider) else {
                attempts.push(ProviderResult::Unavailable {
                    provider,
                    reason: "not registered".to_string(),
                });
                continue;
            };
            if !adapter.is_configured() {
                attempts.push(ProviderResult::Unavailable {
                    provider,
                    reason: "not configured".to_string(),
                });
                continue;
            }
            if !adapter.supports(capability) {
                attempts.push(ProviderResult::Unavailable {
                    provider,
                    reason: format!("does not support {capability}"),
                });
                continue;
            }

            match self.attempt(adapter.as_ref(), capability, request).await {
                Ok((payload, latency)) => {
                    attempts.push(ProviderResult::Success {
                        provider,
                        latency_ms: millis(latency),
                        records: payload.len(),
                    });
                    return Ok(Resolved {
                        payload,
                        provider,
                        latency,
                        attempts,
                    });
                }
                Err(failure) => attempts.push(failure),
            }
        }

        let payload = synthetic::estimate(capability, request)?;
        let latency = started.elapsed();
        tracing::info!(
            capability = %capability,
            keyword = %request.keyword(),
            count = payload.len(),
            "capability degraded to synthetic estimate"
        );
        attempts.push(ProviderResult::Success {
            provider: ProviderName::Synthetic,
            latency_ms: millis(latency),
            records: payload.len(),
        });

        Ok(Resolved {
            payload,
            provider: ProviderName::Synthetic,
            latency,
            attempts,
        })
    }

    /// One timed call plus normalization. Failures are logged, recorded in
    /// the status table, and returned as the attempt's trace entry.
    async fn attempt(
        &self,
        adapter: &dyn Adapter,
        capability: Capability,
        request: &ProviderRequest,
    ) -> Result<(Payload, Duration), ProviderResult> {
        let provider = adapter.name();
        let started = Instant::now();
        let outcome = tokio::time::timeout(self.timeout, adapter.call(capability, request)).await;
        let latency = started.elapsed();

        let (kind, message) = match outcome {
            Err(_) => (
                FailureKind::Timeout,
                format!("timed out after {} ms", millis(self.timeout)),
            ),
            Ok(Err(e)) => (FailureKind::from(&e), e.to_string()),
            Ok(Ok(raw)) => match normalize(provider, capability, raw) {
                Ok(payload) => {
                    self.status.record_success(provider, latency);
                    tracing::debug!(
                        provider = %provider,
                        capability = %capability,
                        latency_ms = millis(latency),
                        count = payload.len(),
                        "provider call succeeded"
                    );
                    return Ok((payload, latency));
                }
                Err(e) => (FailureKind::from(&e), e.to_string()),
            },
        };

        self.status.record_failure(provider, latency, &message);
        tracing::warn!(
            provider = %provider,
            capability = %capability,
            kind = %kind,
            latency_ms = millis(latency),
            error = %message,
            "provider call failed, advancing fallback chain"
        );
        Err(ProviderResult::Error {
            provider,
            kind,
            message,
        })
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
