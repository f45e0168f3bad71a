//! HTTP layer: header setup, status mapping, body decoding.
//!
//! This is the ONLY place for status code handling. The repositories never
//! interpret status codes.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

use super::helpers::{extract_error_message, redact_headers};

pub(crate) const USER_AGENT_VALUE: &str = concat!("scorable-mcp/", env!("CARGO_PKG_VERSION"));

/// HTTP backend shared by the repositories (holds the reqwest client and base URL).
///
/// `reqwest::Client` is reference counted, so clones share one connection pool;
/// every call is still an independent request with its own timeout.
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    client: reqwest::Client,
    headers: HeaderMap,
    pub(crate) base_url: String,
    debug: bool,
}

impl HttpBackend {
    pub(crate) fn new(config: &ClientConfig) -> ClientResult<Self> {
        let headers = default_headers(&config.api_key)?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers.clone())
            .build()
            .map_err(|e| ClientError::Unexpected {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        debug!(user_agent = USER_AGENT_VALUE, "initialized Scorable API client");

        Ok(Self {
            client,
            headers,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            debug: config.debug,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Make a single request and decode the JSON body.
    ///
    /// Status >= 400 becomes [`ClientError::Api`]; transport failures become
    /// `Api` with status 0; 204 yields an empty object. No retries.
    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> ClientResult<Value> {
        let url = self.url(path);
        debug!(method = %method, url = %url, "making request");
        if self.debug {
            debug!(headers = ?redact_headers(&self.headers), "request headers");
            if !query.is_empty() {
                debug!(params = ?query, "request params");
            }
            if let Some(body) = body {
                debug!(payload = %body, "request payload");
            }
        }

        let mut request = self.client.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            error!(url = %url, error = %e, "request error");
            ClientError::from(e)
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), "response status");

        if status.as_u16() >= 400 {
            let text = response.text().await.unwrap_or_default();
            let detail = extract_error_message(status.as_u16(), &text);
            error!(status = status.as_u16(), detail = %detail, "API error response");
            return Err(ClientError::Api {
                status_code: status.as_u16(),
                detail,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Object(Map::new()));
        }

        let text = response.text().await.map_err(|e| {
            error!(url = %url, error = %e, "failed to read response body");
            ClientError::from(e)
        })?;

        match serde_json::from_str::<Value>(&text) {
            Ok(data) => {
                if self.debug {
                    debug!(data = %data, "response data");
                }
                Ok(data)
            }
            Err(e) => {
                warn!(url = %url, body = %text, "response body is not JSON");
                Err(ClientError::validation(
                    format!("response body is not valid JSON: {}", e),
                    Some(Value::String(text)),
                ))
            }
        }
    }
}

fn default_headers(api_key: &str) -> ClientResult<HeaderMap> {
    let mut auth = HeaderValue::from_str(&format!("Api-Key {}", api_key)).map_err(|_| {
        ClientError::Unexpected {
            message: "API key contains characters not allowed in an HTTP header".to_string(),
        }
    })?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    Ok(headers)
}
