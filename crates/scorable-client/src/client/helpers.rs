//! Pure helpers: error detail extraction, continuation links, header redaction
//! (no HTTP, no status logic).

use serde_json::Value;
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Header names whose values never reach the logs (case-insensitive).
pub(crate) const SENSITIVE_HEADER_NAMES: &[&str] = &[
    "authorization",
    "x-api-key",
    "proxy-authorization",
    "cookie",
    "set-cookie",
    "x-auth-token",
];

const REDACTED: &str = "**********";

pub(crate) fn is_sensitive(name: &str) -> bool {
    SENSITIVE_HEADER_NAMES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(name))
}

/// Render headers for a debug log line with credential values masked.
pub(crate) fn redact_headers(headers: &reqwest::header::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if is_sensitive(name.as_str()) {
                REDACTED.to_string()
            } else {
                value.to_str().unwrap_or("<binary>").to_string()
            };
            (name.as_str().to_string(), shown)
        })
        .collect()
}

/// Best-effort error message for a failed response.
///
/// Order: JSON `detail` field, the JSON body itself, the raw text, the status line.
pub(crate) fn extract_error_message(status: u16, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        return match map.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => Value::Object(map).to_string(),
        };
    }

    if body.is_empty() {
        format!("HTTP {}", status)
    } else {
        body.to_string()
    }
}

/// Turn a `next` link into a path relative to the API base URL and re-append
/// any caller parameters the server dropped.
///
/// Absolute links lose their scheme and host; links under `base_url` lose the
/// whole base so a base URL with a path prefix is not applied twice.
pub(crate) fn continuation_path(next: &str, base_url: &str, preserve: &[(&str, String)]) -> String {
    let under_base = next
        .strip_prefix(base_url)
        .filter(|rest| rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'));

    let mut path = if let Some(rest) = under_base {
        rest.to_string()
    } else if next.starts_with("http") {
        match Url::parse(next) {
            Ok(url) => match url.query() {
                Some(query) => format!("{}?{}", url.path(), query),
                None => url.path().to_string(),
            },
            Err(_) => next.to_string(),
        }
    } else {
        next.to_string()
    };

    if !path.starts_with('/') {
        path.insert(0, '/');
    }

    for (name, value) in preserve {
        if path.contains(&format!("{}=", name)) {
            continue;
        }
        let separator = if path.contains('?') { '&' } else { '?' };
        path.push(separator);
        path.push_str(name);
        path.push('=');
        path.push_str(value);
    }

    path
}

/// Build an endpoint path with a trailing slash from literal segments.
///
/// Each segment is percent-encoded, so an id holding `/`, `?` or `%` stays a
/// single segment. Empty and dot segments are rejected.
pub(crate) fn endpoint_path(segments: &[&str]) -> ClientResult<String> {
    if let Some(segment) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
        return Err(ClientError::Unexpected {
            message: format!("invalid path segment: {:?}", segment),
        });
    }

    let mut url = Url::parse("http://localhost/").map_err(|e| ClientError::Unexpected {
        message: format!("failed to build endpoint path: {}", e),
    })?;
    url.path_segments_mut()
        .map_err(|_| ClientError::Unexpected {
            message: "failed to build endpoint path".to_string(),
        })?
        .clear()
        .extend(segments)
        .push("");

    Ok(url.path().to_string())
}

/// JSON type name used in shape-mismatch messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

    #[test]
    fn test_extract_error_message_prefers_detail() {
        assert_eq!(
            extract_error_message(404, r#"{"detail": "not found"}"#),
            "not found"
        );
    }

    #[test]
    fn test_extract_error_message_json_without_detail() {
        assert_eq!(
            extract_error_message(400, r#"{"request": ["This field is required."]}"#),
            r#"{"request":["This field is required."]}"#
        );
    }

    #[test]
    fn test_extract_error_message_plain_text_and_empty() {
        assert_eq!(extract_error_message(502, "Bad Gateway"), "Bad Gateway");
        assert_eq!(extract_error_message(500, ""), "HTTP 500");
        assert_eq!(extract_error_message(400, "[1, 2]"), "[1, 2]");
    }

    #[test]
    fn test_continuation_path_strips_scheme_and_host() {
        let path = continuation_path(
            "https://api.scorable.ai/v1/evaluators?cursor=abc&page_size=40",
            "http://localhost:1234",
            &[],
        );
        assert_eq!(path, "/v1/evaluators?cursor=abc&page_size=40");
    }

    #[test]
    fn test_continuation_path_relative_link_kept() {
        let path = continuation_path("/v1/judges?cursor=xyz", "https://api.scorable.ai", &[]);
        assert_eq!(path, "/v1/judges?cursor=xyz");
    }

    #[test]
    fn test_continuation_path_strips_base_with_prefix() {
        let path = continuation_path(
            "http://proxy.local/scorable/v1/evaluators?cursor=2",
            "http://proxy.local/scorable",
            &[],
        );
        assert_eq!(path, "/v1/evaluators?cursor=2");
    }

    #[test]
    fn test_continuation_path_reappends_missing_params() {
        let preserve = [("show_global", "true".to_string())];
        let path = continuation_path(
            "https://api.scorable.ai/v1/judges?cursor=xyz",
            "https://api.scorable.ai",
            &preserve,
        );
        assert_eq!(path, "/v1/judges?cursor=xyz&show_global=true");

        let path = continuation_path("/v1/judges", "https://api.scorable.ai", &preserve);
        assert_eq!(path, "/v1/judges?show_global=true");
    }

    #[test]
    fn test_continuation_path_does_not_duplicate_params() {
        let preserve = [("show_global", "true".to_string())];
        let path = continuation_path(
            "/v1/judges?cursor=xyz&show_global=false",
            "https://api.scorable.ai",
            &preserve,
        );
        assert_eq!(path, "/v1/judges?cursor=xyz&show_global=false");
    }

    #[test]
    fn test_endpoint_path_encodes_each_segment() {
        assert_eq!(
            endpoint_path(&["v1", "judges", "j1", "execute"]).unwrap(),
            "/v1/judges/j1/execute/"
        );
        assert_eq!(
            endpoint_path(&["v1", "judges", "a/../b?x=1#f", "execute"]).unwrap(),
            "/v1/judges/a%2F..%2Fb%3Fx=1%23f/execute/"
        );
        assert_eq!(
            endpoint_path(&["v1", "evaluators", "execute", "50%"]).unwrap(),
            "/v1/evaluators/execute/50%25/"
        );
    }

    #[test]
    fn test_endpoint_path_rejects_dot_and_empty_segments() {
        for id in ["", ".", ".."] {
            let err = endpoint_path(&["v1", "judges", id, "execute"]).unwrap_err();
            assert!(err.to_string().contains("invalid path segment"), "{}", err);
        }
    }

    #[test]
    fn test_redact_headers_masks_credentials() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Api-Key secret"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let redacted = redact_headers(&headers);
        assert!(redacted
            .iter()
            .any(|(k, v)| k == "authorization" && v == "**********"));
        assert!(redacted
            .iter()
            .any(|(k, v)| k == "content-type" && v == "application/json"));
        assert!(!redacted.iter().any(|(_, v)| v.contains("secret")));
    }

    #[test]
    fn test_is_sensitive_case_insensitive() {
        assert!(is_sensitive("Authorization"));
        assert!(is_sensitive("X-API-KEY"));
        assert!(!is_sensitive("accept"));
    }
}
