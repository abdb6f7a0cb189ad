//! Process-wide diagnostic table of provider health.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use chrono::Utc;
use serpintel_core::{ClientStatus, ProviderName};

/// Last-writer-wins record of each live provider's most recent call.
///
/// Guards are always dropped before any `.await`, and a poisoned lock is
/// recovered rather than propagated: a panic elsewhere must not take
/// diagnostics down with it.
#[derive(Debug, Default)]
pub struct StatusStore {
    entries: RwLock<HashMap<ProviderName, ClientStatus>>,
}

impl StatusStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or re-registers) a provider, resetting its call history.
    pub fn register(&self, provider: ProviderName, configured: bool) {
        if provider.is_synthetic() {
            return;
        }
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(provider, ClientStatus::new(provider, configured));
    }

    pub fn record_success(&self, provider: ProviderName, latency: Duration) {
        self.update(provider, |status| {
            status.last_call_succeeded = Some(true);
            status.last_error = None;
            status.last_latency_ms = Some(millis(latency));
        });
    }

    pub fn record_failure(&self, provider: ProviderName, latency: Duration, error: &str) {
        self.update(provider, |status| {
            status.last_call_succeeded = Some(false);
            status.last_error = Some(error.to_string());
            status.last_latency_ms = Some(millis(latency));
        });
    }

    #[must_use]
    pub fn get(&self, provider: ProviderName) -> Option<ClientStatus> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(&provider).cloned()
    }

    /// One entry per live provider in diagnostic order. Providers never
    /// registered are reported as unconfigured.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ClientStatus> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        ProviderName::LIVE
            .iter()
            .map(|p| {
                entries
                    .get(p)
                    .cloned()
                    .unwrap_or_else(|| ClientStatus::new(*p, false))
            })
            .collect()
    }

    fn update(&self, provider: ProviderName, apply: impl FnOnce(&mut ClientStatus)) {
        if provider.is_synthetic() {
            return;
        }
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let status = entries
            .entry(provider)
            .or_insert_with(|| ClientStatus::new(provider, true));
        apply(status);
        status.last_called_at = Some(Utc::now());
    }
}

fn millis(latency: Duration) -> u64 {
    u64::try_from(latency.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn snapshot_lists_every_live_provider() {
        let store = StatusStore::new();
        store.register(ProviderName::LegacyMetrics, true);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 5);
        assert_eq!(snapshot[0].provider_name, ProviderName::WebSearch);
        assert!(!snapshot[0].configured);
        assert!(snapshot[4].configured);
        assert_eq!(snapshot[4].last_call_succeeded, None);
    }

    #[test]
    fn failure_then_success_overwrites() {
        let store = StatusStore::new();
        store.register(ProviderName::WebSearch, true);
        store.record_failure(ProviderName::WebSearch, Duration::from_millis(12), "boom");

        let failed = store.get(ProviderName::WebSearch).unwrap();
        assert_eq!(failed.last_call_succeeded, Some(false));
        assert_eq!(failed.last_error.as_deref(), Some("boom"));
        assert_eq!(failed.last_latency_ms, Some(12));
        assert!(failed.last_called_at.is_some());

        store.record_success(ProviderName::WebSearch, Duration::from_millis(3));
        let ok = store.get(ProviderName::WebSearch).unwrap();
        assert_eq!(ok.last_call_succeeded, Some(true));
        assert_eq!(ok.last_error, None);
        assert_eq!(ok.last_latency_ms, Some(3));
    }

    #[test]
    fn synthetic_is_never_recorded() {
        let store = StatusStore::new();
        store.register(ProviderName::Synthetic, true);
        store.record_success(ProviderName::Synthetic, Duration::ZERO);
        assert!(store.get(ProviderName::Synthetic).is_none());
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let store = Arc::new(StatusStore::new());
        store.register(ProviderName::KnowledgeGraph, true);

        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.entries.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        store.record_failure(ProviderName::KnowledgeGraph, Duration::ZERO, "after poison");
        let status = store.get(ProviderName::KnowledgeGraph).unwrap();
        assert_eq!(status.last_error.as_deref(), Some("after poison"));
    }
}
