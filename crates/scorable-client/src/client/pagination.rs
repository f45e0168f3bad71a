//! Cursor-following collection fetch.

use std::fmt;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

use super::helpers::{continuation_path, json_type_name};
use super::http::HttpBackend;

/// The two paginated collection types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Evaluators,
    Judges,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Evaluators => "evaluators",
            Self::Judges => "judges",
        }
    }

    /// Capitalised singular, used when pointing at one record.
    pub(crate) fn record_label(&self) -> &'static str {
        match self {
            Self::Evaluators => "Evaluator",
            Self::Judges => "Judge",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepted shapes of one page.
#[derive(Debug, PartialEq)]
pub(crate) enum PageResponse {
    /// `{"results": [...], "next": "..."}`
    Page {
        results: Vec<Value>,
        next: Option<String>,
    },
    /// A bare list; always the last page.
    TerminalList(Vec<Value>),
}

impl PageResponse {
    pub(crate) fn from_value(value: Value) -> ClientResult<Self> {
        match value {
            Value::Object(mut map) => {
                let next = match map.get("next") {
                    Some(Value::String(next)) if !next.is_empty() => Some(next.clone()),
                    _ => None,
                };
                match map.remove("results") {
                    Some(Value::Array(results)) => Ok(Self::Page { results, next }),
                    other => {
                        if let Some(other) = other {
                            map.insert("results".to_string(), other);
                        }
                        Err(ClientError::validation(
                            "Could not find results field in response",
                            Some(Value::Object(map)),
                        ))
                    }
                }
            }
            Value::Array(results) => Ok(Self::TerminalList(results)),
            other => Err(ClientError::validation(
                format!(
                    "Expected response to be an object or list, got {}",
                    json_type_name(&other)
                ),
                Some(other),
            )),
        }
    }
}

/// Fetch up to `max_to_fetch` raw records starting at `initial_path`.
///
/// Stops when the cursor runs out, the cap is reached, or a page is empty.
/// The result is trimmed to exactly `max_to_fetch`. `preserve` lists query
/// parameters re-appended to continuation links that dropped them.
pub(crate) async fn fetch_collection(
    http: &HttpBackend,
    initial_path: &str,
    max_to_fetch: usize,
    kind: ResourceKind,
    preserve: &[(&str, String)],
) -> ClientResult<Vec<Value>> {
    let mut items: Vec<Value> = Vec::new();
    let mut next_path = Some(initial_path.to_string());

    while let Some(path) = next_path.take() {
        if items.len() >= max_to_fetch {
            break;
        }

        let response = http.request(Method::GET, &path, &[], None).await?;
        debug!(resource = %kind, response = %response, "raw page");

        let page = PageResponse::from_value(response).inspect_err(|e| {
            warn!(resource = %kind, error = %e, payload = ?e.response_data(), "unexpected page shape");
        })?;

        let page_items = match page {
            PageResponse::Page { results, next } => {
                next_path = next.map(|next| continuation_path(&next, &http.base_url, preserve));
                results
            }
            PageResponse::TerminalList(results) => {
                debug!(resource = %kind, "response is a bare list");
                results
            }
        };

        let fetched = page_items.len();
        items.extend(page_items);
        info!(resource = %kind, fetched, total = items.len(), "fetched page");

        if fetched == 0 {
            debug!(resource = %kind, "received empty page, stopping pagination");
            break;
        }
    }

    if items.len() > max_to_fetch {
        items.truncate(max_to_fetch);
        debug!(resource = %kind, max_to_fetch, "trimmed results");
    }

    info!(resource = %kind, total = items.len(), "pagination finished");
    Ok(items)
}
