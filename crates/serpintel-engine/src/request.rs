//! Requests handed to the fallback chain.

use serde::Serialize;
use serpintel_core::{Capability, Keyword};

/// Keyword-level request used by discovery, entity lookup, and metrics.
#[derive(Debug, Clone)]
pub struct KeywordQuery {
    pub keyword: Keyword,
    /// Requester's own domain, excluded from discovered competitors.
    pub domain: Option<String>,
    /// Upper bound on records a provider is asked for.
    pub limit: usize,
}

/// Text of one competitor page (title and snippet) to analyse.
#[derive(Debug, Clone)]
pub struct ContentQuery {
    pub keyword: Keyword,
    pub url: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BriefCompetitor {
    pub url: String,
    pub title: String,
    pub total_score: f64,
    pub rank: usize,
}

/// Condensed analysis handed to the generative provider or the template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightBrief {
    pub keyword: Keyword,
    pub competitors: Vec<BriefCompetitor>,
    pub entities: Vec<String>,
    /// How many of the brief's competitors carry the whole keyword in their
    /// title.
    pub keyword_in_title: usize,
}

impl InsightBrief {
    /// Prompt text for the generative provider. The answer is expected as
    /// markdown with a `Recommendations` section.
    #[must_use]
    pub fn prompt(&self) -> String {
        let mut prompt = format!(
            "You are an SEO content strategist. Produce a content outline for an article \
             targeting the search keyword \"{}\".\n\n",
            self.keyword
        );

        if !self.competitors.is_empty() {
            prompt.push_str("Top ranking competitors:\n");
            for c in &self.competitors {
                prompt.push_str(&format!(
                    "{}. {} ({}) score {:.1}\n",
                    c.rank, c.title, c.url, c.total_score
                ));
            }
            prompt.push('\n');
        }

        if !self.entities.is_empty() {
            prompt.push_str(&format!(
                "Entities the article should cover: {}\n\n",
                self.entities.join(", ")
            ));
        }

        prompt.push_str(&format!(
            "{} of {} competitors use the exact keyword in their title.\n\n",
            self.keyword_in_title,
            self.competitors.len()
        ));
        prompt.push_str(
            "Answer in markdown only: one `#` title, `##` and `###` section headings with \
             `-` bullet notes, and finish with a `## Recommendations` section of `-` bullets.",
        );
        prompt
    }
}

/// A request routed through a fallback chain. Each capability accepts exactly
/// one variant.
#[derive(Debug, Clone)]
pub enum ProviderRequest {
    Keyword(KeywordQuery),
    Content(ContentQuery),
    Insight(InsightBrief),
}

impl ProviderRequest {
    #[must_use]
    pub fn accepts(&self, capability: Capability) -> bool {
        matches!(
            (self, capability),
            (
                ProviderRequest::Keyword(_),
                Capability::Discovery | Capability::EntityLookup | Capability::KeywordMetrics
            ) | (ProviderRequest::Content(_), Capability::ContentAnalysis)
                | (ProviderRequest::Insight(_), Capability::GenerativeInsight)
        )
    }

    #[must_use]
    pub fn keyword(&self) -> &Keyword {
        match self {
            ProviderRequest::Keyword(q) => &q.keyword,
            ProviderRequest::Content(q) => &q.keyword,
            ProviderRequest::Insight(b) => &b.keyword,
        }
    }

    #[must_use]
    pub fn variant(&self) -> &'static str {
        match self {
            ProviderRequest::Keyword(_) => "keyword",
            ProviderRequest::Content(_) => "content",
            ProviderRequest::Insight(_) => "insight",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword_request() -> ProviderRequest {
        ProviderRequest::Keyword(KeywordQuery {
            keyword: Keyword::parse("trail shoes").unwrap(),
            domain: None,
            limit: 10,
        })
    }

    #[test]
    fn keyword_request_fits_keyword_capabilities_only() {
        let request = keyword_request();
        assert!(request.accepts(Capability::Discovery));
        assert!(request.accepts(Capability::EntityLookup));
        assert!(request.accepts(Capability::KeywordMetrics));
        assert!(!request.accepts(Capability::ContentAnalysis));
        assert!(!request.accepts(Capability::GenerativeInsight));
    }

    #[test]
    fn prompt_lists_competitors_and_entities() {
        let brief = InsightBrief {
            keyword: Keyword::parse("trail shoes").unwrap(),
            competitors: vec![BriefCompetitor {
                url: "https://a.example/".to_string(),
                title: "Trail Shoes Guide".to_string(),
                total_score: 71.34,
                rank: 1,
            }],
            entities: vec!["Salomon".to_string(), "Hoka".to_string()],
            keyword_in_title: 1,
        };
        let prompt = brief.prompt();
        assert!(prompt.contains("\"trail shoes\""));
        assert!(prompt.contains("1. Trail Shoes Guide (https://a.example/) score 71.3"));
        assert!(prompt.contains("Salomon, Hoka"));
        assert!(prompt.contains("## Recommendations"));
    }
}
