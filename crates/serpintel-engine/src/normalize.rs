//! Maps raw provider payloads into the provider-independent schema.
//!
//! Every mapping clamps scores into `[0, 1]`, substitutes the midpoint for
//! missing or NaN numbers, collapses whitespace, truncates free text, and
//! rejects results with nothing usable in them.

use std::collections::HashSet;

use serpintel_core::{
    Capability, EntityRef, KeywordMetric, NormalizedCompetitor, OutlineSection, ProviderName,
    MAX_KEYWORD_CHARS,
};
use serpintel_providers::{
    AnalyzeEntitiesResponse, EntitySearchResponse, GenerateContentResponse, KeywordRow,
    SearchResponse,
};

use crate::error::NormalizeError;
use crate::payload::{ContentProfile, GeneratedInsight, Payload, RawPayload};
use crate::text::{
    clean_text, clean_truncated, truncate_chars, unit_or, ENTITY_NAME_MAX_CHARS,
    GENERATED_TEXT_MAX_CHARS, HEADING_MAX_CHARS, MAX_ENTITIES, RECOMMENDATION_MAX_CHARS,
    SNIPPET_MAX_CHARS, TITLE_MAX_CHARS,
};

/// Midpoint used for any missing `[0, 1]` estimate.
pub const MIDPOINT: f64 = 0.5;

const POSITION_AUTHORITY_STEP: f64 = 0.05;
const MIN_POSITION_AUTHORITY: f64 = 0.1;
const BASE_CONTENT_QUALITY: f64 = 0.3;
const QUALITY_PER_ENTITY: f64 = 0.07;
const KG_ID_PREFIX: &str = "kg:";
const GENERIC_KG_TYPE: &str = "Thing";
const RECOMMENDATIONS_HEADING: &str = "recommendations";

/// Normalizes one raw payload for `capability`.
///
/// # Errors
///
/// - [`NormalizeError::Empty`] when nothing usable survives normalization.
/// - [`NormalizeError::Mismatch`] when the payload cannot answer `capability`.
pub fn normalize(
    provider: ProviderName,
    capability: Capability,
    raw: RawPayload,
) -> Result<Payload, NormalizeError> {
    let empty = NormalizeError::Empty {
        provider,
        capability,
    };
    let payload = match (capability, raw) {
        (Capability::Discovery, RawPayload::WebSearch(response)) => {
            Payload::Competitors(web_search_competitors(provider, &response))
        }
        (Capability::EntityLookup, RawPayload::KnowledgeGraph(response)) => {
            Payload::Entities(knowledge_graph_entities(&response))
        }
        (Capability::EntityLookup, RawPayload::Language(response)) => {
            Payload::Entities(language_entities(&response))
        }
        (Capability::ContentAnalysis, RawPayload::Language(response)) => {
            let entities = language_entities(&response);
            let quality = content_quality(entities.len());
            Payload::Content(ContentProfile {
                entities,
                quality: Some(quality),
                is_synthetic: false,
            })
        }
        (Capability::GenerativeInsight, RawPayload::Generative(response)) => {
            let text = response_text(&response);
            Payload::Insight(parse_insight(&text, false))
        }
        (Capability::KeywordMetrics, RawPayload::LegacyMetrics(rows)) => {
            Payload::Keywords(keyword_metrics(&rows))
        }
        _ => {
            return Err(NormalizeError::Mismatch {
                provider,
                capability,
            })
        }
    };

    if payload.is_empty() {
        return Err(empty);
    }
    Ok(payload)
}

fn web_search_competitors(
    provider: ProviderName,
    response: &SearchResponse,
) -> Vec<NormalizedCompetitor> {
    let mut seen = HashSet::new();
    let mut competitors = Vec::new();

    for item in &response.items {
        let Some(url) = item.link.as_deref().map(str::trim).filter(|l| !l.is_empty()) else {
            continue;
        };
        if !seen.insert(url.to_string()) {
            continue;
        }
        let position = competitors.len();
        #[allow(clippy::cast_precision_loss)]
        let authority = (1.0 - POSITION_AUTHORITY_STEP * position as f64)
            .clamp(MIN_POSITION_AUTHORITY, 1.0);

        competitors.push(NormalizedCompetitor {
            url: url.to_string(),
            title: clean_truncated(item.title.as_deref().unwrap_or_default(), TITLE_MAX_CHARS),
            snippet: clean_truncated(
                item.snippet.as_deref().unwrap_or_default(),
                SNIPPET_MAX_CHARS,
            ),
            domain_authority_estimate: authority,
            content_quality_estimate: MIDPOINT,
            entity_matches: Vec::new(),
            source: provider,
            is_synthetic: false,
            analysis_is_synthetic: false,
        });
    }

    competitors
}

fn knowledge_graph_entities(response: &EntitySearchResponse) -> Vec<EntityRef> {
    let best = response
        .item_list_element
        .iter()
        .filter_map(|e| e.result_score)
        .filter(|s| s.is_finite() && *s > 0.0)
        .fold(0.0_f64, f64::max);

    let entities = response
        .item_list_element
        .iter()
        .filter_map(|element| {
            let name = entity_name(element.result.name.as_deref()?)?;
            let confidence = match element.result_score {
                Some(score) if best > 0.0 && score.is_finite() && score > 0.0 => {
                    (score / best).clamp(0.0, 1.0)
                }
                _ => MIDPOINT,
            };
            let entity_type = element
                .result
                .types
                .iter()
                .find(|t| t.as_str() != GENERIC_KG_TYPE)
                .cloned()
                .unwrap_or_else(|| GENERIC_KG_TYPE.to_string());
            Some(EntityRef {
                name,
                entity_type,
                confidence,
                knowledge_graph_id: element.result.id.as_deref().and_then(strip_kg_prefix),
            })
        })
        .collect();

    dedup_entities(entities)
}

fn language_entities(response: &AnalyzeEntitiesResponse) -> Vec<EntityRef> {
    let entities = response
        .entities
        .iter()
        .filter_map(|entity| {
            let name = entity_name(entity.name.as_deref()?)?;
            Some(EntityRef {
                name,
                entity_type: entity
                    .entity_type
                    .clone()
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| "OTHER".to_string()),
                confidence: unit_or(entity.salience, MIDPOINT),
                knowledge_graph_id: entity
                    .metadata
                    .get("mid")
                    .map(String::as_str)
                    .and_then(strip_kg_prefix),
            })
        })
        .collect();

    dedup_entities(entities)
}

/// `0.3 + 0.07 × distinct entities`, clamped to `[0, 1]`.
#[allow(clippy::cast_precision_loss)]
fn content_quality(distinct_entities: usize) -> f64 {
    (BASE_CONTENT_QUALITY + QUALITY_PER_ENTITY * distinct_entities as f64).clamp(0.0, 1.0)
}

fn response_text(response: &GenerateContentResponse) -> String {
    truncate_chars(
        &response.text().unwrap_or_default(),
        GENERATED_TEXT_MAX_CHARS,
    )
}

fn keyword_metrics(rows: &[KeywordRow]) -> Vec<KeywordMetric> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(|row| {
            let search_volume = row.search_volume?;
            let keyword = clean_truncated(&row.phrase, MAX_KEYWORD_CHARS);
            if keyword.is_empty() || !seen.insert(keyword.to_lowercase()) {
                return None;
            }
            let cpc_estimate = match row.cpc {
                Some(cpc) if cpc.is_finite() => cpc.max(0.0),
                _ => 0.0,
            };
            Some(KeywordMetric {
                keyword,
                search_volume,
                cpc_estimate,
                competition: unit_or(row.competition, MIDPOINT),
                is_synthetic: false,
            })
        })
        .collect()
}

/// Parses markdown into outline sections and recommendations.
///
/// `#`, `##` and `###` lines open sections (deeper headings count as level
/// 3); `-`, `*`, `+` and numbered lines are notes of the current section.
/// Bullets under a heading named "Recommendations" become recommendations
/// instead, and that heading is not part of the outline.
pub(crate) fn parse_insight(markdown: &str, is_synthetic: bool) -> GeneratedInsight {
    let mut outline: Vec<OutlineSection> = Vec::new();
    let mut recommendations = Vec::new();
    let mut in_recommendations = false;

    for line in markdown.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some((level, heading)) = parse_heading(line) {
            in_recommendations = heading
                .to_lowercase()
                .trim_end_matches(':')
                .ends_with(RECOMMENDATIONS_HEADING);
            if !in_recommendations {
                outline.push(OutlineSection {
                    heading: truncate_chars(&heading, HEADING_MAX_CHARS),
                    level,
                    notes: Vec::new(),
                });
            }
            continue;
        }

        let Some(item) = parse_bullet(line) else {
            continue;
        };
        if in_recommendations {
            recommendations.push(truncate_chars(&item, RECOMMENDATION_MAX_CHARS));
        } else if let Some(section) = outline.last_mut() {
            section.notes.push(truncate_chars(&item, RECOMMENDATION_MAX_CHARS));
        }
    }

    GeneratedInsight {
        outline,
        recommendations,
        is_synthetic,
    }
}

fn parse_heading(line: &str) -> Option<(u8, String)> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let heading = strip_emphasis(rest);
    if heading.is_empty() {
        return None;
    }
    let level = u8::try_from(hashes.min(3)).unwrap_or(3);
    Some((level, heading))
}

fn parse_bullet(line: &str) -> Option<String> {
    let rest = if let Some(rest) = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("+ "))
    {
        rest
    } else {
        let digits = line.chars().take_while(char::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        line[digits..]
            .strip_prefix(". ")
            .or_else(|| line[digits..].strip_prefix(") "))?
    };
    let item = strip_emphasis(rest);
    (!item.is_empty()).then_some(item)
}

fn strip_emphasis(value: &str) -> String {
    clean_text(&value.replace("**", "").replace('`', ""))
}

fn entity_name(raw: &str) -> Option<String> {
    let name = clean_truncated(raw, ENTITY_NAME_MAX_CHARS);
    (!name.is_empty()).then_some(name)
}

fn strip_kg_prefix(id: &str) -> Option<String> {
    let id = id.trim();
    let id = id.strip_prefix(KG_ID_PREFIX).unwrap_or(id);
    (!id.is_empty()).then(|| id.to_string())
}

/// Deduplicates by knowledge-graph id when present, else by case-insensitive
/// name, keeping the higher-confidence record in first-seen position. At most
/// [`MAX_ENTITIES`] survive.
pub(crate) fn dedup_entities(entities: Vec<EntityRef>) -> Vec<EntityRef> {
    let mut kept: Vec<EntityRef> = Vec::with_capacity(entities.len());
    for entity in entities {
        match kept.iter_mut().find(|k| k.same_entity(&entity)) {
            Some(existing) => {
                if entity.confidence > existing.confidence {
                    *existing = entity;
                }
            }
            None => kept.push(entity),
        }
    }
    kept.truncate(MAX_ENTITIES);
    kept
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
