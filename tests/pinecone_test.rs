//! Pinecone client behavior against a mock server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cafebot::domain::errors::RetrievalError;
use cafebot::domain::models::KnowledgeDocument;
use cafebot::domain::ports::{UpsertRecord, VectorIndex};
use cafebot::infrastructure::pinecone::PineconeIndex;

fn data_plane_client(host: &str) -> PineconeIndex {
    PineconeIndex::new("test-key", "cafe-line-bot", Duration::from_secs(5))
        .unwrap()
        .with_host(host)
}

#[tokio::test]
async fn test_query_maps_matches_to_results() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .and(header("api-key", "test-key"))
        .and(body_partial_json(json!({"topK": 4, "includeMetadata": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [
                {"id": "cafe_0", "score": 0.92,
                 "metadata": {"title": "เมนูลาเต้", "content": "45 บาท"}},
                {"id": "cafe_1", "score": 0.55,
                 "metadata": {"title": "เวลาเปิด-ปิด", "content": "07:00-18:00"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let index = data_plane_client(&server.uri());
    let results = index.query(&[0.1; 4], 4).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "เมนูลาเต้");
    assert_eq!(results[0].content, "45 บาท");
    assert!((results[0].score - 0.92).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_query_with_no_matches_is_empty_ok() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"matches": []})))
        .mount(&server)
        .await;

    let index = data_plane_client(&server.uri());
    let results = index.query(&[0.1; 4], 4).await.unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_query_missing_metadata_defaults_to_empty_strings() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [{"id": "cafe_0", "score": 0.4}]
        })))
        .mount(&server)
        .await;

    let index = data_plane_client(&server.uri());
    let results = index.query(&[0.1; 4], 4).await.unwrap();

    assert_eq!(results[0].title, "");
    assert_eq!(results[0].content, "");
}

#[tokio::test]
async fn test_slow_query_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"matches": []}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let index = PineconeIndex::new("test-key", "cafe-line-bot", Duration::from_millis(100))
        .unwrap()
        .with_host(server.uri());

    let err = index.query(&[0.1; 4], 4).await.unwrap_err();

    // The configured bound cuts the request off as a transport error.
    assert!(matches!(err, RetrievalError::Network(_)));
}

#[tokio::test]
async fn test_query_http_error_surfaces() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let index = data_plane_client(&server.uri());
    let err = index.query(&[0.1; 4], 4).await.unwrap_err();

    match err {
        RetrievalError::Http { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "unavailable");
        }
        other => panic!("expected Http, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connect_resolves_host_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/indexes/cafe-line-bot"))
        .and(header("api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "cafe-line-bot",
            "host": server.uri().trim_start_matches("http://").to_string()
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"matches": []})))
        .mount(&server)
        .await;

    let index = PineconeIndex::new("test-key", "cafe-line-bot", Duration::from_secs(5))
        .unwrap()
        .with_control_url(server.uri());

    index.connect().await.unwrap();

    // Both queries reuse the cached host; describe runs exactly once.
    index.query(&[0.1; 4], 4).await.unwrap();
    index.query(&[0.1; 4], 4).await.unwrap();
}

#[tokio::test]
async fn test_connect_fails_for_unknown_index() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/indexes/cafe-line-bot"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let index = PineconeIndex::new("test-key", "cafe-line-bot", Duration::from_secs(5))
        .unwrap()
        .with_control_url(server.uri());

    let err = index.connect().await.unwrap_err();
    assert!(matches!(err, RetrievalError::Http { status: 404, .. }));
}

#[tokio::test]
async fn test_upsert_sends_positional_ids_and_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/vectors/upsert"))
        .and(body_partial_json(json!({
            "vectors": [{
                "id": "cafe_0",
                "metadata": {"title": "เมนูลาเต้", "content": "45 บาท", "type": "menu"}
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"upsertedCount": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let index = data_plane_client(&server.uri());
    let records = vec![UpsertRecord {
        id: "cafe_0".to_string(),
        values: vec![0.1, 0.2, 0.3, 0.4],
        document: KnowledgeDocument {
            title: "เมนูลาเต้".to_string(),
            content: "45 บาท".to_string(),
            source_url: None,
            doc_type: Some("menu".to_string()),
        },
    }];

    index.upsert(&records).await.unwrap();
}

#[tokio::test]
async fn test_ensure_index_creates_with_cosine_metric() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes"))
        .and(body_partial_json(json!({
            "name": "cafe-line-bot",
            "dimension": 384,
            "metric": "cosine",
            "spec": {"serverless": {"cloud": "aws", "region": "us-east-1"}}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"name": "cafe-line-bot"})))
        .expect(1)
        .mount(&server)
        .await;

    let index = PineconeIndex::new("test-key", "cafe-line-bot", Duration::from_secs(5))
        .unwrap()
        .with_control_url(server.uri());

    index.ensure_index(384).await.unwrap();
}

#[tokio::test]
async fn test_ensure_index_treats_conflict_as_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes"))
        .respond_with(ResponseTemplate::new(409).set_body_string("already exists"))
        .mount(&server)
        .await;

    let index = PineconeIndex::new("test-key", "cafe-line-bot", Duration::from_secs(5))
        .unwrap()
        .with_control_url(server.uri());

    index.ensure_index(384).await.unwrap();
}
