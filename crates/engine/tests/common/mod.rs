//! Shared helpers for engine integration tests.

#![allow(dead_code)]

use secrecy::SecretString;
use splunk_engine::{SplunkEngine, SplunkEngineBuilder};
use wiremock::MockServer;

/// Builder pointed at a mock server, authenticated with a static token.
pub fn engine_builder(server: &MockServer) -> SplunkEngineBuilder {
    SplunkEngine::builder()
        .base_url(server.uri())
        .token(SecretString::new("test-token".to_string().into()))
}

pub fn engine_for(server: &MockServer) -> SplunkEngine {
    engine_builder(server).build().unwrap()
}

/// Job-creation response carrying a bare SID.
pub fn job_created_body(sid: &str) -> serde_json::Value {
    serde_json::json!({ "sid": sid })
}

/// Entry-wrapped job status response.
pub fn job_status_body(sid: &str, is_done: bool, progress: f64) -> serde_json::Value {
    serde_json::json!({
        "entry": [{
            "name": sid,
            "content": {
                "sid": sid,
                "isDone": is_done,
                "doneProgress": progress,
                "runDuration": 0.42,
                "scanCount": 100,
                "eventCount": 50,
                "resultCount": 10
            }
        }]
    })
}

/// Decode an application/x-www-form-urlencoded request body.
pub fn form_params(request: &wiremock::Request) -> Vec<(String, String)> {
    url::form_urlencoded::parse(&request.body)
        .into_owned()
        .collect()
}

/// Value of one form field, if present.
pub fn form_value(request: &wiremock::Request, key: &str) -> Option<String> {
    form_params(request)
        .into_iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
}

/// The search string of the first job-creation request the server saw.
pub async fn dispatched_search(server: &MockServer) -> Option<String> {
    let requests = server.received_requests().await?;
    requests
        .iter()
        .find(|r| r.method.as_str() == "POST" && r.url.path().ends_with("/search/jobs"))
        .and_then(|r| form_value(r, "search"))
}

/// How many requests the server saw for a given method and path suffix.
pub async fn request_count(server: &MockServer, method: &str, path_suffix: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == method && r.url.path().ends_with(path_suffix))
        .count()
}
