//! Weighted composite scoring of competitors.

use std::collections::{BTreeMap, HashSet};

use serpintel_core::{CompositeScore, EntityRef, Keyword, NormalizedCompetitor};

use crate::normalize::MIDPOINT;

pub const CONTENT_QUALITY: &str = "content_quality";
pub const DOMAIN_AUTHORITY: &str = "domain_authority";
pub const ENTITY_OPTIMIZATION: &str = "entity_optimization";
pub const TECHNICAL_SEO: &str = "technical_seo";

/// Criterion weights. They sum to 1.0, so totals land in `[0, 100]`.
pub const WEIGHTS: [(&str, f64); 4] = [
    (CONTENT_QUALITY, 0.35),
    (DOMAIN_AUTHORITY, 0.25),
    (ENTITY_OPTIMIZATION, 0.25),
    (TECHNICAL_SEO, 0.15),
];

const TITLE_TERM_COVERAGE_WEIGHT: f64 = 0.45;
const TITLE_LENGTH_BONUS: f64 = 0.20;
const SNIPPET_LENGTH_BONUS: f64 = 0.20;
const HTTPS_BONUS: f64 = 0.15;
const IDEAL_TITLE_CHARS: std::ops::RangeInclusive<usize> = 30..=65;
const MIN_SNIPPET_CHARS: usize = 80;

/// What every competitor is measured against.
#[derive(Debug, Clone)]
pub struct ScoringContext {
    pub keyword: Keyword,
    pub entities: Vec<EntityRef>,
}

/// Scores and ranks `competitors`.
///
/// Output is ordered by total descending, ties broken by ascending URL, with
/// `rank` starting at 1. Pure: the same input always yields the same output.
#[must_use]
pub fn score(competitors: &[NormalizedCompetitor], context: &ScoringContext) -> Vec<CompositeScore> {
    let terms: Vec<String> = context.keyword.terms();

    let mut scores: Vec<CompositeScore> = competitors
        .iter()
        .map(|competitor| {
            let criteria = [
                competitor.content_quality_estimate,
                competitor.domain_authority_estimate,
                entity_optimization(competitor, &context.entities),
                technical_seo(competitor, &terms),
            ];

            let breakdown: BTreeMap<String, f64> = WEIGHTS
                .iter()
                .zip(criteria)
                .map(|((name, weight), value)| {
                    let value = if value.is_nan() { MIDPOINT } else { value.clamp(0.0, 1.0) };
                    ((*name).to_string(), 100.0 * weight * value)
                })
                .collect();
            let total_score = breakdown.values().sum::<f64>().clamp(0.0, 100.0);

            CompositeScore {
                competitor_url: competitor.url.clone(),
                total_score,
                breakdown,
                rank: 0,
            }
        })
        .collect();

    scores.sort_by(|a, b| {
        b.total_score
            .total_cmp(&a.total_score)
            .then_with(|| a.competitor_url.cmp(&b.competitor_url))
    });
    for (idx, s) in scores.iter_mut().enumerate() {
        s.rank = idx + 1;
    }

    scores
}

/// Fraction of context entities the competitor covers; the midpoint when
/// there is nothing to cover.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn entity_optimization(competitor: &NormalizedCompetitor, context: &[EntityRef]) -> f64 {
    if context.is_empty() {
        return MIDPOINT;
    }
    let matched = context
        .iter()
        .filter(|wanted| {
            competitor
                .entity_matches
                .iter()
                .any(|found| found.same_entity(wanted))
        })
        .count();
    matched as f64 / context.len() as f64
}

/// On-page proxy built from title, snippet, and URL scheme.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn technical_seo(competitor: &NormalizedCompetitor, terms: &[String]) -> f64 {
    let title_words: HashSet<String> = competitor
        .title
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .collect();

    let coverage = if terms.is_empty() {
        0.0
    } else {
        let present = terms.iter().filter(|t| title_words.contains(*t)).count();
        present as f64 / terms.len() as f64
    };

    let mut value = TITLE_TERM_COVERAGE_WEIGHT * coverage;
    if IDEAL_TITLE_CHARS.contains(&competitor.title.chars().count()) {
        value += TITLE_LENGTH_BONUS;
    }
    if competitor.snippet.chars().count() >= MIN_SNIPPET_CHARS {
        value += SNIPPET_LENGTH_BONUS;
    }
    if competitor
        .url
        .get(..8)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("https://"))
    {
        value += HTTPS_BONUS;
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use serpintel_core::ProviderName;

    use super::*;

    fn context(entities: Vec<EntityRef>) -> ScoringContext {
        ScoringContext {
            keyword: Keyword::parse("trail running shoes").unwrap(),
            entities,
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

    fn competitor(url: &str, quality: f64, authority: f64) -> NormalizedCompetitor {
        NormalizedCompetitor {
            url: url.to_string(),
            title: String::new(),
            snippet: String::new(),
            domain_authority_estimate: authority,
            content_quality_estimate: quality,
            entity_matches: Vec::new(),
            source: ProviderName::WebSearch,
            is_synthetic: false,
            analysis_is_synthetic: false,
        }
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(score(&[], &context(vec![])).is_empty());
    }

    #[test]
    fn weights_sum_to_one() {
        let sum: f64 = WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn breakdown_sums_to_total() {
        let mut c = competitor("https://a.com/trail", 0.8, 0.6);
        c.title = "Best Trail Running Shoes of the Year, Tested".to_string();
        c.entity_matches = vec![entity("Salomon")];
        let scores = score(&[c], &context(vec![entity("salomon"), entity("Hoka")]));

        let s = &scores[0];
        let sum: f64 = s.breakdown.values().sum();
        assert!((sum - s.total_score).abs() < 1e-9);
        assert_eq!(s.breakdown.len(), 4);
        assert!((s.breakdown[ENTITY_OPTIMIZATION] - 100.0 * 0.25 * 0.5).abs() < 1e-9);
        // full term coverage, title in range, no snippet, https
        let seo = 0.45 + 0.20 + 0.15;
        assert!((s.breakdown[TECHNICAL_SEO] - 100.0 * 0.15 * seo).abs() < 1e-9);
    }

    #[test]
    fn entity_matching_ignores_non_ascii_case() {
        let mut c = competitor("https://a.com/", 0.5, 0.5);
        c.entity_matches = vec![entity("ÉCOLE"), entity("Überlauf")];
        let wanted = [entity("école"), entity("überlauf")];
        assert!((entity_optimization(&c, &wanted) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_entity_context_uses_midpoint() {
        let c = competitor("http://a.com/", 0.5, 0.5);
        assert!((entity_optimization(&c, &[]) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn technical_seo_rewards_long_snippet() {
        let mut c = competitor("http://a.com/", 0.5, 0.5);
        let terms = vec!["trail".to_string(), "shoes".to_string()];
        let base = technical_seo(&c, &terms);
        c.snippet = "s".repeat(80);
        assert!((technical_seo(&c, &terms) - base - 0.20).abs() < 1e-9);
    }

    #[test]
    fn ties_are_broken_by_url() {
        let scores = score(
            &[
                competitor("https://b.com/", 0.5, 0.5),
                competitor("https://a.com/", 0.5, 0.5),
                competitor("https://c.com/", 0.5, 0.5),
            ],
            &context(vec![]),
        );
        let urls: Vec<&str> = scores.iter().map(|s| s.competitor_url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.com/", "https://b.com/", "https://c.com/"]);
        let ranks: Vec<usize> = scores.iter().map(|s| s.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn higher_quality_ranks_first() {
        let scores = score(
            &[
                competitor("https://a.com/", 0.2, 0.5),
                competitor("https://b.com/", 0.9, 0.5),
            ],
            &context(vec![]),
        );
        assert_eq!(scores[0].competitor_url, "https://b.com/");
        assert_eq!(scores[0].rank, 1);
    }

    #[test]
    fn raising_quality_never_worsens_rank() {
        let base = vec![
            competitor("https://a.com/", 0.4, 0.9),
            competitor("https://b.com/", 0.6, 0.5),
            competitor("https://c.com/", 0.3, 0.7),
            competitor("https://d.com/", 0.8, 0.2),
        ];
        let rank_of = |set: &[NormalizedCompetitor], url: &str| {
            score(set, &context(vec![]))
                .into_iter()
                .find(|s| s.competitor_url == url)
                .map(|s| s.rank)
                .unwrap()
        };

        for idx in 0..base.len() {
            let url = base[idx].url.clone();
            let before = rank_of(&base, &url);
            for step in 1..=5 {
                let mut raised = base.clone();
                raised[idx].content_quality_estimate =
                    (raised[idx].content_quality_estimate + 0.1 * f64::from(step)).min(1.0);
                assert!(rank_of(&raised, &url) <= before, "{url} step {step}");
            }
        }
    }

    #[test]
    fn totals_stay_in_range() {
        let mut best = competitor("https://a.com/trail-running-shoes", 1.0, 1.0);
        best.title = "Trail Running Shoes: Every Pair We Tested".to_string();
        best.snippet = "x".repeat(120);
        let worst = competitor("ftp://z.com/", 0.0, 0.0);
        let scores = score(&[best, worst], &context(vec![]));
        assert!(scores.iter().all(|s| (0.0..=100.0).contains(&s.total_score)));
    }
}
