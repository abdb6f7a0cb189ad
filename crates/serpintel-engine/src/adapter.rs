//! The uniform call contract every provider adapter implements.

use async_trait::async_trait;
use serpintel_core::{Capability, ProviderName};

use crate::error::AdapterError;
use crate::payload::RawPayload;
use crate::request::ProviderRequest;

/// One external data provider behind a uniform interface.
///
/// Adapters make exactly one upstream call per invocation and return the raw
/// payload; normalization, timeouts, and fallback belong to the chain.
#[async_trait]
pub trait Adapter: Send + Sync {
    fn name(&self) -> ProviderName;

    fn capabilities(&self) -> &'static [Capability];

    /// False when required credentials are missing or blank. The chain skips
    /// unconfigured adapters without calling them.
    fn is_configured(&self) -> bool;

    fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    async fn call(
        &self,
        capability: Capability,
        request: &ProviderRequest,
    ) -> Result<RawPayload, AdapterError>;
}
