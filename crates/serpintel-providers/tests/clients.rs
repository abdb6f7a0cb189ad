//! Integration tests for the provider clients using wiremock HTTP mocks.

use std::time::Duration;

use serpintel_providers::{
    GenerativeClient, HttpOptions, KnowledgeGraphClient, LanguageClient, LegacyMetricsClient,
    ProviderError, WebSearchClient,
};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn options() -> HttpOptions {
    HttpOptions::new(Duration::from_secs(5), "serpintel-tests/0.1")
}

#[tokio::test]
async fn web_search_returns_items() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "kind": "customsearch#search",
        "items": [
            {
                "title": "The 10 Best Running Shoes of 2025",
                "link": "https://www.runnersworld.com/gear/best-running-shoes",
                "snippet": "We tested dozens of pairs to find the best running shoes.",
                "displayLink": "www.runnersworld.com"
            },
            {
                "title": "Running Shoes | Nike",
                "link": "https://www.nike.com/w/running-shoes",
                "displayLink": "www.nike.com"
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("key", "search-key"))
        .and(query_param("cx", "engine-1"))
        .and(query_param("q", "best running shoes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client =
        WebSearchClient::with_base_url("search-key", "engine-1", &options(), &server.uri()).unwrap();
    let response = client
        .search("best running shoes", 10)
        .await
        .expect("should parse search results");

    assert_eq!(response.items.len(), 2);
    assert_eq!(
        response.items[0].link.as_deref(),
        Some("https://www.runnersworld.com/gear/best-running-shoes")
    );
    assert_eq!(response.items[1].snippet, None);
}

#[tokio::test]
async fn web_search_maps_429_to_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "17"))
        .mount(&server)
        .await;

    let client =
        WebSearchClient::with_base_url("search-key", "engine-1", &options(), &server.uri()).unwrap();
    let err = client.search("shoes", 10).await.unwrap_err();

    assert!(
        matches!(
            err,
            ProviderError::RateLimited {
                retry_after_secs: 17,
                ..
            }
        ),
        "expected RateLimited, got {err:?}"
    );
}

#[tokio::test]
async fn web_search_surfaces_api_error_message_without_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": { "code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED" }
        })))
        .mount(&server)
        .await;

    let client =
        WebSearchClient::with_base_url("secret-key", "engine-1", &options(), &server.uri()).unwrap();
    let err = client.search("shoes", 10).await.unwrap_err();

    assert!(matches!(err, ProviderError::Api { .. }), "{err:?}");
    let rendered = err.to_string();
    assert!(rendered.contains("API key not valid"), "{rendered}");
    assert!(!rendered.contains("secret-key"), "{rendered}");
}

#[tokio::test]
async fn web_search_plain_500_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client =
        WebSearchClient::with_base_url("search-key", "engine-1", &options(), &server.uri()).unwrap();
    let err = client.search("shoes", 10).await.unwrap_err();

    assert!(
        matches!(err, ProviderError::UnexpectedStatus { status: 500, .. }),
        "{err:?}"
    );
}

#[tokio::test]
async fn web_search_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "items": [] }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let fast = HttpOptions::new(Duration::from_millis(50), "serpintel-tests/0.1");
    let client =
        WebSearchClient::with_base_url("search-key", "engine-1", &fast, &server.uri()).unwrap();
    let err = client.search("shoes", 10).await.unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {err:?}");
}

#[tokio::test]
async fn knowledge_graph_returns_elements() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "@context": {},
        "@type": "ItemList",
        "itemListElement": [
            {
                "@type": "EntitySearchResult",
                "result": {
                    "@id": "kg:/m/06ntj",
                    "name": "Running",
                    "@type": ["Thing", "SportsActivity"],
                    "description": "Sport"
                },
                "resultScore": 812.4
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/v1/entities:search"))
        .and(query_param("query", "running shoes"))
        .and(query_param("key", "kg-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = KnowledgeGraphClient::with_base_url("kg-key", &options(), &server.uri()).unwrap();
    let response = client.search_entities("running shoes", 10).await.unwrap();

    assert_eq!(response.item_list_element.len(), 1);
    let element = &response.item_list_element[0];
    assert_eq!(element.result.id.as_deref(), Some("kg:/m/06ntj"));
    assert_eq!(element.result.types, vec!["Thing", "SportsActivity"]);
    assert_eq!(element.result_score, Some(812.4));
}

#[tokio::test]
async fn language_posts_plain_text_document() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/documents:analyzeEntities"))
        .and(query_param("key", "lang-key"))
        .and(body_partial_json(serde_json::json!({
            "document": { "type": "PLAIN_TEXT", "content": "Nike Pegasus review" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "entities": [
                { "name": "Nike", "type": "ORGANIZATION", "salience": 0.61, "metadata": { "mid": "/m/0gq9h" } },
                { "name": "Pegasus", "type": "CONSUMER_GOOD", "salience": 0.39 }
            ],
            "language": "en"
        })))
        .mount(&server)
        .await;

    let client = LanguageClient::with_base_url("lang-key", &options(), &server.uri()).unwrap();
    let response = client.analyze_entities("Nike Pegasus review").await.unwrap();

    assert_eq!(response.entities.len(), 2);
    assert_eq!(response.entities[0].name.as_deref(), Some("Nike"));
    assert_eq!(response.language.as_deref(), Some("en"));
}

#[tokio::test]
async fn generative_returns_candidate_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(query_param("key", "gen-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [
                { "content": { "parts": [ { "text": "# Guide\n## Fit\n- Try them on" } ] }, "finishReason": "STOP" }
            ]
        })))
        .mount(&server)
        .await;

    let client = GenerativeClient::with_base_url("gen-key", None, &options(), &server.uri()).unwrap();
    let response = client.generate("Write an outline").await.unwrap();

    assert_eq!(
        response.text().as_deref(),
        Some("# Guide\n## Fit\n- Try them on")
    );
}

#[tokio::test]
async fn legacy_metrics_parses_export() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("type", "phrase_related"))
        .and(query_param("key", "legacy-key"))
        .and(query_param("phrase", "running shoes"))
        .and(query_param("database", "uk"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "Keyword;Search Volume;CPC;Competition\r\nrunning shoes;74000;1.23;0.87\r\nrunning shoes women;27100;0.98;1.00\r\n",
        ))
        .mount(&server)
        .await;

    let client =
        LegacyMetricsClient::with_base_url("legacy-key", Some("uk"), &options(), &server.uri())
            .unwrap();
    let rows = client.related_keywords("running shoes", 10).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].search_volume, Some(74_000));
    assert_eq!(rows[1].phrase, "running shoes women");
}

#[tokio::test]
async fn legacy_metrics_in_band_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("ERROR 120 :: WRONG KEY - ID PAIR"),
        )
        .mount(&server)
        .await;

    let client =
        LegacyMetricsClient::with_base_url("legacy-key", None, &options(), &server.uri()).unwrap();
    let err = client.related_keywords("shoes", 10).await.unwrap_err();

    assert!(matches!(err, ProviderError::Api { .. }), "{err:?}");
}
