//! REST API endpoint implementations.

pub(crate) mod oauth;
mod request;
pub(crate) mod saved;
pub(crate) mod search;

pub(crate) use request::send_request_with_retry;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::error::{EngineError, Result};

/// Characters percent-encoded when a value is placed in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode a value for use as a single URL path segment.
///
/// Search job SIDs are server-assigned and may contain characters that are
/// not path-safe.
pub(crate) fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Extract `entry[0].content` from a Splunk entity response.
pub(crate) fn extract_entry_content(resp: &serde_json::Value) -> Result<&serde_json::Value> {
    resp.get("entry")
        .and_then(|e| e.get(0))
        .and_then(|e| e.get("content"))
        .ok_or_else(|| EngineError::InvalidResponse("missing entry content".to_string()))
}
