//! Client configuration.

use std::fmt;
use std::time::Duration;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.scorable.ai";

/// Server-side page size is capped client-side at this value.
pub const MAX_PAGE_SIZE: usize = 40;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_EVALUATORS: usize = 40;
const DEFAULT_MAX_JUDGES: usize = 40;

/// Immutable settings for [`crate::ScorableClient`].
#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL for the API (no trailing slash required).
    pub base_url: String,

    /// API key sent as `Authorization: Api-Key <key>`.
    pub api_key: String,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Default cap for `list_evaluators`.
    pub max_evaluators: usize,

    /// Default cap for `list_judges`.
    pub max_judges: usize,

    /// Include globally shared judges when listing.
    pub show_public_judges: bool,

    /// Log request payloads and (redacted) headers.
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            timeout: DEFAULT_TIMEOUT,
            max_evaluators: DEFAULT_MAX_EVALUATORS,
            max_judges: DEFAULT_MAX_JUDGES,
            show_public_judges: false,
            debug: false,
        }
    }
}

// The API key must never end up in logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"**********")
            .field("timeout", &self.timeout)
            .field("max_evaluators", &self.max_evaluators)
            .field("max_judges", &self.max_judges)
            .field("show_public_judges", &self.show_public_judges)
            .field("debug", &self.debug)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::default().with_api_key(api_key)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_evaluators(mut self, max: usize) -> Self {
        self.max_evaluators = max;
        self
    }

    pub fn with_max_judges(mut self, max: usize) -> Self {
        self.max_judges = max;
        self
    }

    pub fn with_show_public_judges(mut self, show: bool) -> Self {
        self.show_public_judges = show;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
