//! Insight aggregation: turns scored competitors and entities into a content
//! blueprint via the generative insight chain.

use serpintel_core::{Blueprint, Capability, EntityRef, Keyword};

use crate::analysis::ScoredCompetitor;
use crate::chain::FallbackChain;
use crate::error::EngineError;
use crate::request::{BriefCompetitor, InsightBrief, ProviderRequest};

const BRIEF_COMPETITORS: usize = 5;
const BRIEF_ENTITIES: usize = 10;

/// Condenses an analysis into the brief handed to the generative provider.
///
/// `competitors` must already be in rank order.
#[must_use]
pub fn build_brief(
    competitors: &[ScoredCompetitor],
    entities: &[EntityRef],
    keyword: &Keyword,
) -> InsightBrief {
    let needle = keyword.as_str().to_lowercase();
    let top: Vec<BriefCompetitor> = competitors
        .iter()
        .take(BRIEF_COMPETITORS)
        .map(|c| BriefCompetitor {
            url: c.competitor.url.clone(),
            title: c.competitor.title.clone(),
            total_score: c.score.total_score,
            rank: c.score.rank,
        })
        .collect();
    let keyword_in_title = top
        .iter()
        .filter(|c| c.title.to_lowercase().contains(&needle))
        .count();

    InsightBrief {
        keyword: keyword.clone(),
        competitors: top,
        entities: entities
            .iter()
            .take(BRIEF_ENTITIES)
            .map(|e| e.name.clone())
            .collect(),
        keyword_in_title,
    }
}

/// Produces the content blueprint. Degrades to the deterministic template
/// when no generative provider answers; never fails for provider reasons.
///
/// # Errors
///
/// Only [`EngineError::EstimatorPrecondition`], which indicates a defect.
pub async fn build_blueprint(
    chain: &FallbackChain,
    competitors: &[ScoredCompetitor],
    entities: &[EntityRef],
    keyword: &Keyword,
) -> Result<Blueprint, EngineError> {
    let brief = build_brief(competitors, entities, keyword);
    let cited_competitors: Vec<String> = brief.competitors.iter().map(|c| c.url.clone()).collect();

    let resolved = chain
        .resolve(Capability::GenerativeInsight, &ProviderRequest::Insight(brief))
        .await?;
    let provider = resolved.provider;
    let is_synthetic = resolved.is_synthetic();
    let kind = resolved.payload.kind();
    let insight =
        resolved
            .payload
            .into_insight()
            .ok_or_else(|| EngineError::EstimatorPrecondition {
                capability: Capability::GenerativeInsight,
                reason: format!("chain produced a {kind} payload"),
            })?;

    tracing::debug!(
        provider = %provider,
        sections = insight.outline.len(),
        recommendations = insight.recommendations.len(),
        "blueprint built"
    );

    Ok(Blueprint {
        outline: insight.outline,
        recommendations: insight.recommendations,
        cited_competitors,
        source: provider,
        is_synthetic: is_synthetic || insight.is_synthetic,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serpintel_core::{CompositeScore, NormalizedCompetitor, ProviderName};

    use super::*;

    fn scored(url: &str, title: &str, rank: usize) -> ScoredCompetitor {
        ScoredCompetitor {
            score: CompositeScore {
                competitor_url: url.to_string(),
                total_score: 90.0 - rank as f64,
                breakdown: BTreeMap::new(),
                rank,
            },
            competitor: NormalizedCompetitor {
                url: url.to_string(),
                title: title.to_string(),
                snippet: String::new(),
                domain_authority_estimate: 0.5,
                content_quality_estimate: 0.5,
                entity_matches: Vec::new(),
                source: ProviderName::WebSearch,
                is_synthetic: false,
                analysis_is_synthetic: false,
            },
        }
    }

    fn entity(name: &str) -> EntityRef {
        EntityRef {
            name: name.to_string(),
            entity_type: "Concept".to_string(),
            confidence: 0.5,
            knowledge_graph_id: None,
        }
    }

    #[test]
    fn brief_takes_top_five_and_counts_keyword_titles() {
        let competitors: Vec<ScoredCompetitor> = (1..=7)
            .map(|rank| {
                let title = if rank % 2 == 0 {
                    format!("Trail Shoes Guide {rank}")
                } else {
                    format!("Running Gear {rank}")
                };
                scored(&format!("https://site{rank}.com/"), &title, rank)
            })
            .collect();
        let entities: Vec<EntityRef> = (0..12).map(|i| entity(&format!("E{i}"))).collect();

        let brief = build_brief(
            &competitors,
            &entities,
            &Keyword::parse("trail shoes").unwrap(),
        );

        assert_eq!(brief.competitors.len(), 5);
        assert_eq!(brief.competitors[0].rank, 1);
        assert_eq!(brief.entities.len(), 10);
        assert_eq!(brief.keyword_in_title, 2);
    }

    #[tokio::test]
    async fn blueprint_without_providers_uses_template() {
        let chain = FallbackChain::new(Vec::new(), std::time::Duration::from_secs(1));
        let competitors = vec![scored("https://a.com/", "Trail Shoes | A", 1)];

        let blueprint = build_blueprint(
            &chain,
            &competitors,
            &[entity("Salomon")],
            &Keyword::parse("trail shoes").unwrap(),
        )
        .await
        .unwrap();

        assert!(blueprint.is_synthetic);
        assert_eq!(blueprint.source, ProviderName::Synthetic);
        assert_eq!(blueprint.cited_competitors, vec!["https://a.com/"]);
        assert_eq!(blueprint.outline[0].heading, "Trail Shoes: The Complete Guide");
        assert_eq!(blueprint.outline[1].heading, "Trail Shoes");
    }
}
