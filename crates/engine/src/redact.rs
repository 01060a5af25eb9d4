//! Query redaction for log output.
//!
//! Search strings routinely carry credentials-like material
//! (`token=...`, `password=...` filters pasted by operators), so queries are
//! redacted before they reach the log stream.

const SENSITIVE_KEYS: &[&str] = &["password", "passwd", "token", "secret", "api_key", "apikey"];

/// Redact values of sensitive `key=value` pairs in a query string.
pub(crate) fn redact_query(query: &str) -> String {
    let mut redacted = String::with_capacity(query.len());
    for (i, part) in query.split_whitespace().enumerate() {
        if i > 0 {
            redacted.push(' ');
        }
        match part.split_once('=') {
            Some((key, _))
                if SENSITIVE_KEYS
                    .iter()
                    .any(|s| key.to_ascii_lowercase().ends_with(s)) =>
            {
                redacted.push_str(key);
                redacted.push_str("=***");
            }
            _ => redacted.push_str(part),
        }
    }
    redacted
}
