//! Poll-loop failure handling and cancellation tests.
//!
//! Covers the consecutive-failure budget (abort and best-effort cancel after
//! three straight errors, counter reset on success), the completion
//! re-check, and the cancel-on-drop behavior of abandoned jobs.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use splunk_engine::{EngineError, SearchRequest};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_job_created(server: &MockServer, sid: &str) {
    Mock::given(method("POST"))
        .and(path("/services/search/jobs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(job_created_body(sid)))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_three_consecutive_poll_failures_cancel_job() {
    let server = MockServer::start().await;
    mount_job_created(&server, "sid-1").await;

    // Status always fails; a fourth poll must never happen.
    Mock::given(method("GET"))
        .and(path("/services/search/jobs/sid-1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("splunkd worker died"))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/services/search/jobs/sid-1/control"))
        .and(body_string_contains("action=cancel"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    let err = engine
        .execute_query(SearchRequest::new("index=main"))
        .await
        .unwrap_err();

    match err {
        EngineError::PollFailed {
            sid,
            attempts,
            source,
        } => {
            assert_eq!(sid, "sid-1");
            assert_eq!(attempts, 3);
            assert!(matches!(*source, EngineError::Api { status: 500, .. }));
        }
        other => panic!("expected PollFailed, got {other:?}"),
    }

    assert_eq!(request_count(&server, "GET", "/search/jobs/sid-1").await, 3);
    assert_eq!(
        request_count(&server, "POST", "/search/jobs/sid-1/control").await,
        1
    );
}

#[tokio::test]
async fn test_successful_poll_resets_failure_counter() {
    let server = MockServer::start().await;
    mount_job_created(&server, "sid-2").await;

    // Two failures, one success (not done), then three failures: only the
    // final streak of three trips the budget, six status reads total.
    Mock::given(method("GET"))
        .and(path("/services/search/jobs/sid-2"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/search/jobs/sid-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_status_body("sid-2", false, 0.5)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/search/jobs/sid-2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/services/search/jobs/sid-2/control"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    let err = engine
        .execute_query(SearchRequest::new("index=main"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::PollFailed { attempts: 3, .. }
    ));
    assert_eq!(request_count(&server, "GET", "/search/jobs/sid-2").await, 6);
}

#[tokio::test]
async fn test_dropped_future_fires_one_remote_cancel() {
    let server = MockServer::start().await;
    mount_job_created(&server, "sid-3").await;

    // The job never finishes; the caller gives up and drops the future.
    Mock::given(method("GET"))
        .and(path("/services/search/jobs/sid-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_status_body("sid-3", false, 0.1)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/services/search/jobs/sid-3/control"))
        .and(body_string_contains("action=cancel"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let engine = Arc::new(engine_for(&server));
    let task_engine = engine.clone();
    let handle = tokio::spawn(async move {
        task_engine
            .execute_query(SearchRequest::new("index=main"))
            .await
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());

    // Give the detached best-effort cancel time to land.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(
        request_count(&server, "POST", "/search/jobs/sid-3/control").await,
        1
    );
}

#[tokio::test]
async fn test_completion_recheck_failure_is_an_error() {
    let server = MockServer::start().await;
    mount_job_created(&server, "sid-4").await;

    // The poll observes done, but the re-check contradicts it.
    Mock::given(method("GET"))
        .and(path("/services/search/jobs/sid-4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_status_body("sid-4", true, 1.0)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/search/jobs/sid-4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_status_body("sid-4", false, 0.9)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/services/search/jobs/sid-4/control"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    let err = engine
        .execute_query(SearchRequest::new("index=main"))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::JobNotDone { sid } if sid == "sid-4"));

    // The abandoned job gets its best-effort cancel.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(
        request_count(&server, "POST", "/search/jobs/sid-4/control").await,
        1
    );
}
