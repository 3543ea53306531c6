//! Integration tests for DasFetcher using wiremock
//!
//! These tests validate the DAS transport's behavior with mock servers.

mod common;

use common::{FEATURES_XML, SEQUENCE_XML};
use protanno::config::Config;
use protanno::crawler::{AnnotationTransport, DasFetcher};
use protanno::models::Source;
use protanno::utils::error::FetchError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher_for(server: &MockServer, max_retries: u32) -> DasFetcher {
    let mut config = Config::default();
    config.transport.rate_limit = 100;
    config.transport.max_retries = max_retries;
    config.transport.base_delay_ms = 10;

    DasFetcher::new(&config)
        .unwrap()
        .with_sequence_url(format!("{}/das/sequence", server.uri()))
}

fn source_for(server: &MockServer) -> Source {
    Source::new("UniProt", format!("{}/das/features", server.uri()))
}

fn xml(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/xml")
}

/// Test features lookup decodes the DASGFF document
#[tokio::test]
async fn test_fetch_annotations_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/das/features"))
        .and(query_param("segment", "P12345"))
        .respond_with(xml(FEATURES_XML))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_for(&mock_server, 0);
    let response = fetcher
        .fetch_annotations(&source_for(&mock_server), "P12345")
        .await
        .unwrap();

    assert_eq!(response.segment.id, "P12345");
    assert_eq!(response.segment.stop, Some(350));
    assert_eq!(response.records.len(), 2);
    assert_eq!(response.records[0].start, 10);
    assert_eq!(
        response.records[1].links[0].href,
        "http://example.org/kw/kinase"
    );
}

/// Test sequence lookup strips whitespace and keeps the label
#[tokio::test]
async fn test_fetch_sequence_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/das/sequence"))
        .and(query_param("segment", "P12345"))
        .respond_with(xml(SEQUENCE_XML))
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_for(&mock_server, 0);
    let record = fetcher.fetch_sequence("P12345").await.unwrap();

    assert_eq!(record.id, "P12345");
    assert_eq!(record.sequence, "MKTAYIAKQRQISFVKSHFS");
    assert_eq!(record.label.as_deref(), Some("KIN1_HUMAN"));
}

/// Test 404 does not retry
#[tokio::test]
async fn test_404_no_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/das/features"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1) // Should only be called once (no retry)
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_for(&mock_server, 3);
    let result = fetcher
        .fetch_annotations(&source_for(&mock_server), "P99999")
        .await;

    assert!(matches!(result, Err(FetchError::ServerError(404))));
}

/// Test that server errors trigger retries
#[tokio::test]
async fn test_server_error_retry() {
    let mock_server = MockServer::start().await;

    // Return 500 twice, then succeed
    Mock::given(method("GET"))
        .and(path("/das/features"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/das/features"))
        .respond_with(xml(FEATURES_XML))
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_for(&mock_server, 3);
    let result = fetcher
        .fetch_annotations(&source_for(&mock_server), "P12345")
        .await;

    assert!(result.is_ok(), "Should succeed after retries: {:?}", result.err());
}

/// Test the default policy issues a single request
#[tokio::test]
async fn test_no_retry_by_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/das/sequence"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_for(&mock_server, 0);
    let result = fetcher.fetch_sequence("P12345").await;

    assert!(matches!(result, Err(FetchError::ServerError(503))));
}

/// Test an unparseable body surfaces as a decoding failure
#[tokio::test]
async fn test_malformed_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/das/features"))
        .respond_with(xml("<DASGFF><GFF><SEGMENT id='P1'></GFF>"))
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_for(&mock_server, 0);
    let result = fetcher
        .fetch_annotations(&source_for(&mock_server), "P1")
        .await;

    assert!(matches!(result, Err(FetchError::Decode(_))));
}

/// Test a sequence document without a sequence element
#[tokio::test]
async fn test_sequence_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/das/sequence"))
        .respond_with(xml("<DASSEQUENCE></DASSEQUENCE>"))
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_for(&mock_server, 0);
    let result = fetcher.fetch_sequence("P00000").await;

    assert!(matches!(result, Err(FetchError::Decode(_))));
}
