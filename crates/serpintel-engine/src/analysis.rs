//! End-to-end competitor analysis for one keyword.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use serpintel_core::{
    AppConfig, Blueprint, Capability, ClientStatus, CompositeScore, EntityRef, Keyword,
    KeywordMetric, NormalizedCompetitor,
};
use serpintel_providers::HttpOptions;
use uuid::Uuid;

use crate::adapters::build_adapters;
use crate::chain::FallbackChain;
use crate::error::EngineError;
use crate::insight::build_blueprint;
use crate::normalize::dedup_entities;
use crate::payload::ContentProfile;
use crate::request::{ContentQuery, KeywordQuery, ProviderRequest};
use crate::scoring::{score, ScoringContext};
use crate::text::{host_matches, normalize_domain};

const DEFAULT_MAX_COMPETITORS: usize = 10;
const DEFAULT_ENRICH_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisSettings {
    pub max_competitors: usize,
    /// Competitor pages analysed concurrently during enrichment.
    pub enrich_concurrency: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            max_competitors: DEFAULT_MAX_COMPETITORS,
            enrich_concurrency: DEFAULT_ENRICH_CONCURRENCY,
        }
    }
}

impl From<&AppConfig> for AnalysisSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_competitors: config.max_competitors,
            enrich_concurrency: config.enrich_concurrency,
        }
    }
}

/// Caller input. Validated by [`Analyzer::analyze`] before any provider call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub keyword: String,
    #[serde(default)]
    pub domain: Option<String>,
}

/// A competitor together with its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCompetitor {
    pub score: CompositeScore,
    pub competitor: NormalizedCompetitor,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub keyword: String,
    pub domain: Option<String>,
    /// In rank order.
    pub competitors: Vec<ScoredCompetitor>,
    pub keyword_metrics: Vec<KeywordMetric>,
    /// Entity context the competitors were scored against.
    pub entities: Vec<EntityRef>,
    pub blueprint: Blueprint,
    pub diagnostics: Vec<ClientStatus>,
    /// Capabilities answered at least partly by the synthetic estimator.
    pub degraded_capabilities: Vec<Capability>,
    pub generated_at: DateTime<Utc>,
}

/// Runs analyses against a shared fallback chain.
pub struct Analyzer {
    chain: FallbackChain,
    settings: AnalysisSettings,
}

impl Analyzer {
    /// Builds adapters for every provider in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Setup`] if a provider client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, EngineError> {
        let timeout = Duration::from_millis(config.provider_timeout_ms);
        let options = HttpOptions::new(timeout, &config.user_agent);
        let adapters = build_adapters(&config.providers, &options)?;
        Ok(Self::new(
            FallbackChain::new(adapters, timeout),
            AnalysisSettings::from(config),
        ))
    }

    #[must_use]
    pub fn new(chain: FallbackChain, settings: AnalysisSettings) -> Self {
        Self { chain, settings }
    }

    #[must_use]
    pub fn chain(&self) -> &FallbackChain {
        &self.chain
    }

    #[must_use]
    pub fn settings(&self) -> AnalysisSettings {
        self.settings
    }

    /// Snapshot of every live provider's last call.
    #[must_use]
    pub fn status(&self) -> Vec<ClientStatus> {
        self.chain.status().snapshot()
    }

    /// Analyses the competitive landscape for `request.keyword`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Input`] for an empty or overlong keyword, before any
    ///   provider is contacted.
    /// - [`EngineError::EstimatorPrecondition`] on an internal defect.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport, EngineError> {
        let keyword = Keyword::parse(&request.keyword)?;
        let domain = request.domain.as_deref().and_then(normalize_domain);
        let limit = self.settings.max_competitors.max(1);

        tracing::info!(keyword = %keyword, domain = ?domain, "starting analysis");

        let query = ProviderRequest::Keyword(KeywordQuery {
            keyword: keyword.clone(),
            domain: domain.clone(),
            limit,
        });
        let (discovery, metrics, entity_lookup) = tokio::join!(
            self.chain.resolve(Capability::Discovery, &query),
            self.chain.resolve(Capability::KeywordMetrics, &query),
            self.chain.resolve(Capability::EntityLookup, &query),
        );
        let (discovery, metrics, entity_lookup) = (discovery?, metrics?, entity_lookup?);

        let mut degraded: Vec<Capability> = [
            (Capability::Discovery, discovery.is_synthetic()),
            (Capability::KeywordMetrics, metrics.is_synthetic()),
            (Capability::EntityLookup, entity_lookup.is_synthetic()),
        ]
        .into_iter()
        .filter_map(|(capability, synthetic)| synthetic.then_some(capability))
        .collect();

        let competitors: Vec<NormalizedCompetitor> = discovery
            .payload
            .into_competitors()
            .unwrap_or_default()
            .into_iter()
            .filter(|c| !is_own_site(c, domain.as_deref()))
            .take(limit)
            .collect();
        let keyword_metrics = metrics.payload.into_keywords().unwrap_or_default();
        let entities = entity_lookup.payload.into_entities().unwrap_or_default();

        let (competitors, any_synthetic_analysis) = self.enrich(&keyword, competitors).await?;
        if any_synthetic_analysis {
            degraded.push(Capability::ContentAnalysis);
        }

        let context = ScoringContext {
            keyword: keyword.clone(),
            entities,
        };
        let scored = rank(competitors, &context);

        let blueprint = build_blueprint(&self.chain, &scored, &context.entities, &keyword).await?;
        if blueprint.is_synthetic {
            degraded.push(Capability::GenerativeInsight);
        }
        degraded.sort();
        degraded.dedup();

        tracing::info!(
            keyword = %keyword,
            count = scored.len(),
            degraded = ?degraded,
            "analysis complete"
        );

        Ok(AnalysisReport {
            analysis_id: Uuid::new_v4(),
            keyword: keyword.as_str().to_string(),
            domain,
            competitors: scored,
            keyword_metrics,
            entities: context.entities,
            blueprint,
            diagnostics: self.status(),
            degraded_capabilities: degraded,
            generated_at: Utc::now(),
        })
    }

    /// Runs content analysis for every competitor with bounded concurrency,
    /// preserving order. Returns whether any page fell back to the estimator.
    async fn enrich(
        &self,
        keyword: &Keyword,
        competitors: Vec<NormalizedCompetitor>,
    ) -> Result<(Vec<NormalizedCompetitor>, bool), EngineError> {
        let chain = &self.chain;
        let results: Vec<Result<(NormalizedCompetitor, bool), EngineError>> =
            stream::iter(competitors.into_iter().map(|competitor| async move {
                let request = ProviderRequest::Content(ContentQuery {
                    keyword: keyword.clone(),
                    url: competitor.url.clone(),
                    text: page_text(&competitor),
                });
                let resolved = chain.resolve(Capability::ContentAnalysis, &request).await?;
                let synthetic = resolved.is_synthetic();
                let enriched = match resolved.payload.into_content() {
                    Some(profile) => apply_profile(competitor, profile),
                    None => competitor,
                };
                Ok::<_, EngineError>((enriched, synthetic))
            }))
            .buffered(self.settings.enrich_concurrency.max(1))
            .collect()
            .await;

        let mut enriched = Vec::with_capacity(results.len());
        let mut any_synthetic = false;
        for result in results {
            let (competitor, synthetic) = result?;
            any_synthetic |= synthetic;
            enriched.push(competitor);
        }
        Ok((enriched, any_synthetic))
    }
}

/// Scores competitors and pairs each with its score, in rank order.
fn rank(competitors: Vec<NormalizedCompetitor>, context: &ScoringContext) -> Vec<ScoredCompetitor> {
    let scores = score(&competitors, context);
    let mut by_url: HashMap<String, NormalizedCompetitor> = competitors
        .into_iter()
        .map(|c| (c.url.clone(), c))
        .collect();
    scores
        .into_iter()
        .filter_map(|score| {
            let competitor = by_url.remove(&score.competitor_url)?;
            Some(ScoredCompetitor { score, competitor })
        })
        .collect()
}

fn apply_profile(
    mut competitor: NormalizedCompetitor,
    profile: ContentProfile,
) -> NormalizedCompetitor {
    let mut entities = std::mem::take(&mut competitor.entity_matches);
    entities.extend(profile.entities);
    competitor.entity_matches = dedup_entities(entities);
    if let Some(quality) = profile.quality {
        competitor.content_quality_estimate = quality.clamp(0.0, 1.0);
    }
    competitor.analysis_is_synthetic = profile.is_synthetic || competitor.is_synthetic;
    competitor
}

fn page_text(competitor: &NormalizedCompetitor) -> String {
    match (competitor.title.is_empty(), competitor.snippet.is_empty()) {
        (false, false) => format!("{}. {}", competitor.title, competitor.snippet),
        (false, true) => competitor.title.clone(),
        (true, _) => competitor.snippet.clone(),
    }
}

fn is_own_site(competitor: &NormalizedCompetitor, domain: Option<&str>) -> bool {
    match (domain, competitor.host()) {
        (Some(domain), Some(host)) => host_matches(&host, domain),
        _ => false,
    }
}
