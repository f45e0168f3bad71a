//! Repository clients for the Scorable API.
//!
//! Public API: no status code knowledge. All HTTP/status mapping in http.rs.

use serde_json::Value;

use crate::config::{ClientConfig, MAX_PAGE_SIZE};
use crate::error::ClientResult;

mod evaluators;
mod helpers;
mod http;
mod judges;
mod pagination;

pub use evaluators::EvaluatorRepository;
pub use judges::JudgeRepository;
pub use pagination::ResourceKind;

use http::HttpBackend;

/// User agent sent with every request.
pub const USER_AGENT: &str = http::USER_AGENT_VALUE;

/// Shared base of the evaluator and judge repositories.
#[derive(Debug, Clone)]
pub struct ScorableClient {
    http: HttpBackend,
    config: ClientConfig,
}

impl ScorableClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = HttpBackend::new(&config)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.http.base_url
    }

    /// Follow `next` links from `initial_path` and return at most
    /// `max_to_fetch` raw records.
    ///
    /// Query parameters in `preserve` are re-appended to continuation links
    /// that do not carry them.
    pub async fn fetch_collection(
        &self,
        initial_path: &str,
        max_to_fetch: usize,
        kind: ResourceKind,
        preserve: &[(&str, String)],
    ) -> ClientResult<Vec<Value>> {
        pagination::fetch_collection(&self.http, initial_path, max_to_fetch, kind, preserve).await
    }
}

/// Page size for a capped listing.
pub(crate) fn page_size(max_to_fetch: usize) -> usize {
    max_to_fetch.min(MAX_PAGE_SIZE)
}
