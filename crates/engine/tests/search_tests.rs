//! Query dispatch and result retrieval tests.
//!
//! Covers normalization of dispatched searches (prefix, head clause, time
//! bounds), the empty-query short-circuit, and result-shape handling.

mod common;

use common::*;
use splunk_engine::SearchRequest;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mount the full happy-path job lifecycle: create, status (done), results.
async fn mount_job_lifecycle(server: &MockServer, sid: &str, results: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/services/search/jobs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(job_created_body(sid)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/services/search/jobs/{sid}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_status_body(sid, true, 1.0)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/services/search/jobs/{sid}/results")))
        .respond_with(ResponseTemplate::new(200).set_body_json(results))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_dispatched_search_carries_limit_and_time_bounds() {
    let server = MockServer::start().await;
    mount_job_lifecycle(
        &server,
        "sid-1",
        serde_json::json!([{"host": "web-1", "status": "500"}]),
    )
    .await;

    let engine = engine_for(&server);
    let records = engine
        .execute_query(
            SearchRequest::new("index=foo error")
                .time_bounds("-1h", "now")
                .limit(50),
        )
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["host"], "web-1");

    let requests = server.received_requests().await.unwrap();
    let create = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .expect("job creation request");
    assert_eq!(
        form_value(create, "search").as_deref(),
        Some("search index=foo error | head 50")
    );
    assert_eq!(form_value(create, "earliest_time").as_deref(), Some("-1h"));
    assert_eq!(form_value(create, "latest_time").as_deref(), Some("now"));
    assert_eq!(form_value(create, "search_mode").as_deref(), Some("normal"));
    assert_eq!(form_value(create, "output_mode").as_deref(), Some("json"));
    assert_eq!(form_value(create, "count").as_deref(), Some("0"));
}

#[tokio::test]
async fn test_empty_query_returns_nothing_without_network() {
    let server = MockServer::start().await;
    let engine = engine_for(&server);

    let records = engine
        .execute_query(SearchRequest::new("").limit(10))
        .await
        .unwrap();
    assert!(records.is_empty());

    let records = engine
        .execute_query(SearchRequest::new("  \"\"  "))
        .await
        .unwrap();
    assert!(records.is_empty());

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_pipe_query_dispatched_verbatim_without_bounds() {
    let server = MockServer::start().await;
    mount_job_lifecycle(&server, "sid-2", serde_json::json!([])).await;

    let engine = engine_for(&server);
    engine
        .execute_query(SearchRequest::new("| tstats count where index=main").unlimited())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let create = requests.iter().find(|r| r.method.as_str() == "POST").unwrap();
    assert_eq!(
        form_value(create, "search").as_deref(),
        Some("| tstats count where index=main")
    );
    assert!(form_value(create, "earliest_time").is_none());
    assert!(form_value(create, "latest_time").is_none());
}

#[tokio::test]
async fn test_non_record_entries_dropped_from_results() {
    let server = MockServer::start().await;
    mount_job_lifecycle(
        &server,
        "sid-3",
        serde_json::json!([
            {"host": "web-1"},
            "INFO: results may be truncated",
            {"host": "web-2"}
        ]),
    )
    .await;

    let engine = engine_for(&server);
    let records = engine
        .execute_query(SearchRequest::new("index=main"))
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["host"], "web-1");
    assert_eq!(records[1]["host"], "web-2");
}

#[tokio::test]
async fn test_object_shaped_results_body() {
    let server = MockServer::start().await;
    mount_job_lifecycle(
        &server,
        "sid-4",
        serde_json::json!({
            "preview": false,
            "init_offset": 0,
            "results": [{"count": "42"}]
        }),
    )
    .await;

    let engine = engine_for(&server);
    let records = engine
        .execute_query(SearchRequest::new("index=main | stats count"))
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["count"], "42");
}

#[tokio::test]
async fn test_job_done_on_first_poll_skips_backoff() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/search/jobs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(job_created_body("sid-5")))
        .expect(1)
        .mount(&server)
        .await;
    // One poll observes done, the completion re-check confirms it: exactly
    // two status reads, never a third.
    Mock::given(method("GET"))
        .and(path("/services/search/jobs/sid-5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_status_body("sid-5", true, 1.0)))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"/services/search/jobs/[^/]+/results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    let started = std::time::Instant::now();
    engine
        .execute_query(SearchRequest::new("index=main"))
        .await
        .unwrap();
    // No poll sleep happened; the whole exchange is fast.
    assert!(started.elapsed() < std::time::Duration::from_secs(2));
}

#[tokio::test]
async fn test_progress_callback_observes_poll_snapshots() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/search/jobs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(job_created_body("sid-6")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/search/jobs/sid-6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_status_body("sid-6", false, 0.25)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/search/jobs/sid-6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_status_body("sid-6", true, 1.0)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"/services/search/jobs/[^/]+/results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    let mut snapshots = Vec::new();
    let mut callback = |status: &splunk_engine::SearchStatus| {
        snapshots.push((status.progress, status.result_count));
    };
    engine
        .execute_query_with_progress(SearchRequest::new("index=main"), Some(&mut callback))
        .await
        .unwrap();

    assert_eq!(snapshots.len(), 2);
    assert!((snapshots[0].0 - 25.0).abs() < 1e-9);
    assert!((snapshots[1].0 - 100.0).abs() < 1e-9);
    assert_eq!(snapshots[0].1, 10);
}
