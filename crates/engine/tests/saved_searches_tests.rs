//! Saved-search cache tests.

mod common;

use std::time::Duration;

use common::*;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn saved_searches_body() -> serde_json::Value {
    serde_json::json!({
        "entry": [
            {"name": "Errors last hour", "content": {"search": "index=main error earliest=-1h"}},
            {"name": "Notable events", "content": {"search": "index=notable"}}
        ]
    })
}

#[tokio::test]
async fn test_saved_searches_listed_once_per_ttl_window() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/saved/searches"))
        .and(query_param("output_mode", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(saved_searches_body()))
        .expect(1)
        .mount(&server)
        .await;

    let engine = engine_for(&server);

    let first = engine.saved_searches().await.unwrap();
    let second = engine.saved_searches().await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first[0].name, "Errors last hour");
    assert_eq!(first[0].search, "index=main error earliest=-1h");
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_saved_search_cache_expires() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/saved/searches"))
        .respond_with(ResponseTemplate::new(200).set_body_json(saved_searches_body()))
        .expect(2)
        .mount(&server)
        .await;

    let engine = engine_builder(&server)
        .saved_search_ttl(Duration::from_millis(50))
        .build()
        .unwrap();

    engine.saved_searches().await.unwrap();
    tokio::time::sleep(Duration::from_millis(80)).await;
    engine.saved_searches().await.unwrap();
}
