//! Client for the legacy search-metrics provider.
//!
//! The provider answers with a semicolon-separated export rather than JSON:
//!
//! ```text
//! Keyword;Search Volume;CPC;Competition
//! running shoes;74000;1.23;0.87
//! ```
//!
//! and reports failures in-band as a single `ERROR <code> :: <message>` line
//! with HTTP 200.

use reqwest::{Client, Url};

use crate::error::ProviderError;
use crate::http::{self, HttpOptions};
use crate::types::KeywordRow;

const DEFAULT_BASE_URL: &str = "https://api.semrush.com/";
const DEFAULT_DATABASE: &str = "us";
const PROVIDER: &str = "legacy_metrics";

/// In-band error code meaning "no data for this phrase".
const NOTHING_FOUND_CODE: &str = "50";

pub struct LegacyMetricsClient {
    client: Client,
    api_key: String,
    database: String,
    base_url: Url,
}

impl LegacyMetricsClient {
    /// `database` is the regional index, defaulting to `us`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built.
    pub fn new(
        api_key: &str,
        database: Option<&str>,
        options: &HttpOptions,
    ) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, database, options, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built or
    /// [`ProviderError::InvalidBaseUrl`] for a malformed `base_url`.
    pub fn with_base_url(
        api_key: &str,
        database: Option<&str>,
        options: &HttpOptions,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http::build_client(options)?,
            api_key: api_key.to_owned(),
            database: database.unwrap_or(DEFAULT_DATABASE).to_owned(),
            base_url: http::parse_base_url(base_url)?,
        })
    }

    /// Fetches metrics for `phrase` and its related phrases.
    ///
    /// An in-band "nothing found" answer is an empty `Vec`, not an error.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Api`] for any other in-band `ERROR` line.
    /// - [`ProviderError::Parse`] if the export has no `Keyword` column.
    /// - Transport and status errors as for [`crate::WebSearchClient::search`].
    pub async fn related_keywords(
        &self,
        phrase: &str,
        limit: usize,
    ) -> Result<Vec<KeywordRow>, ProviderError> {
        let url = self.build_url(phrase, limit);
        tracing::debug!(provider = PROVIDER, phrase, limit, "related keywords request");

        let response = self.client.get(url).send().await.map_err(http::without_url)?;
        let body = http::read_body(PROVIDER, response).await?;
        parse_export(&body)
    }

    fn build_url(&self, phrase: &str, limit: usize) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("type", "phrase_related")
            .append_pair("key", &self.api_key)
            .append_pair("phrase", phrase)
            .append_pair("database", &self.database)
            .append_pair("export_columns", "Ph,Nq,Cp,Co")
            .append_pair("display_limit", &limit.max(1).to_string());
        url
    }
}

/// Parses the semicolon export into rows.
///
/// Columns are located by header name so reordered exports still parse.
/// Unparseable numeric cells become `None`; rows with an empty phrase are
/// skipped.
///
/// # Errors
///
/// Returns [`ProviderError::Api`] for an in-band error other than "nothing
/// found" and [`ProviderError::Parse`] when the header lacks a keyword column.
pub fn parse_export(body: &str) -> Result<Vec<KeywordRow>, ProviderError> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(Vec::new());
    }

    if let Some(rest) = body.strip_prefix("ERROR") {
        let (code, message) = rest
            .split_once("::")
            .map_or((rest.trim(), ""), |(c, m)| (c.trim(), m.trim()));
        if code == NOTHING_FOUND_CODE {
            return Ok(Vec::new());
        }
        return Err(ProviderError::Api {
            provider: PROVIDER,
            message: format!("error {code}: {message}"),
        });
    }

    let mut lines = body.lines().map(str::trim).filter(|l| !l.is_empty());
    let header: Vec<String> = lines
        .next()
        .unwrap_or_default()
        .split(';')
        .map(|h| h.trim().to_lowercase())
        .collect();

    let column = |name: &str| header.iter().position(|h| h == name);
    let phrase_col = column("keyword").ok_or_else(|| ProviderError::Parse {
        provider: PROVIDER,
        reason: format!("missing Keyword column in header {header:?}"),
    })?;
    let volume_col = column("search volume");
    let cpc_col = column("cpc");
    let competition_col = column("competition");

    let rows = lines
        .filter_map(|line| {
            let cells: Vec<&str> = line.split(';').map(str::trim).collect();
            let cell = |idx: Option<usize>| idx.and_then(|i| cells.get(i).copied());
            let phrase = cell(Some(phrase_col))?.to_string();
            if phrase.is_empty() {
                return None;
            }
            Some(KeywordRow {
                phrase,
                search_volume: cell(volume_col).and_then(|v| v.parse::<u64>().ok()),
                cpc: cell(cpc_col).and_then(|v| v.parse::<f64>().ok()),
                competition: cell(competition_col).and_then(|v| v.parse::<f64>().ok()),
            })
        })
        .collect();

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_requests_export_columns() {
        let client = LegacyMetricsClient::with_base_url(
            "legacy-key",
            None,
            &HttpOptions::default(),
            "https://api.semrush.com",
        )
        .unwrap();
        let url = client.build_url("running shoes", 5);
        assert_eq!(
            url.as_str(),
            "https://api.semrush.com/?type=phrase_related&key=legacy-key&phrase=running+shoes&database=us&export_columns=Ph%2CNq%2CCp%2CCo&display_limit=5"
        );
    }

    #[test]
    fn parse_export_reads_rows() {
        let body = "Keyword;Search Volume;CPC;Competition\r\nrunning shoes;74000;1.23;0.87\r\nbest running shoes;33100;2.10;1.00\r\n";
        let rows = parse_export(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].phrase, "running shoes");
        assert_eq!(rows[0].search_volume, Some(74_000));
        assert_eq!(rows[1].cpc, Some(2.10));
        assert_eq!(rows[1].competition, Some(1.0));
    }

    #[test]
    fn parse_export_locates_columns_by_name() {
        let body = "CPC;Keyword;Competition;Search Volume\n0.5;trail shoes;0.3;1900";
        let rows = parse_export(body).unwrap();
        assert_eq!(
            rows,
            vec![KeywordRow {
                phrase: "trail shoes".to_string(),
                search_volume: Some(1900),
                cpc: Some(0.5),
                competition: Some(0.3),
            }]
        );
    }

    #[test]
    fn parse_export_keeps_unparseable_cells_as_none() {
        let body = "Keyword;Search Volume;CPC;Competition\nshoes;n/a;;high";
        let rows = parse_export(body).unwrap();
        assert_eq!(rows[0].search_volume, None);
        assert_eq!(rows[0].cpc, None);
        assert_eq!(rows[0].competition, None);
    }

    #[test]
    fn nothing_found_is_empty() {
        assert!(parse_export("ERROR 50 :: NOTHING FOUND").unwrap().is_empty());
    }

    #[test]
    fn other_in_band_errors_are_api_errors() {
        let err = parse_export("ERROR 132 :: API UNITS BALANCE IS ZERO").unwrap_err();
        assert!(
            matches!(err, ProviderError::Api { ref message, .. } if message.contains("132")),
            "{err:?}"
        );
    }

    #[test]
    fn missing_keyword_column_is_parse_error() {
        let err = parse_export("Volume;CPC\n1;2").unwrap_err();
        assert!(matches!(err, ProviderError::Parse { .. }), "{err:?}");
    }
}
