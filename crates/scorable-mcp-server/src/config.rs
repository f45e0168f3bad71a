//! Server configuration, read once at startup from flags and environment.

use std::time::Duration;

use anyhow::{bail, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use scorable_client::{ClientConfig, DEFAULT_API_URL};

use crate::logging::LogFormat;

pub const DEFAULT_CODING_POLICY_EVALUATOR_ID: &str = "4613f248-b60e-403a-bcdc-157d1c44194a";
pub const DEFAULT_CODING_POLICY_EVALUATOR_REQUEST: &str =
    "Is the response written according to the coding policy?";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "scorable-mcp-server",
    version,
    about = "MCP server exposing Scorable evaluators and judges as tools (stdio transport)"
)]
pub struct ServerArgs {
    /// Scorable API key
    #[arg(long, env = "SCORABLE_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Scorable API base URL
    #[arg(long, env = "SCORABLE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "SCORABLE_API_TIMEOUT", default_value_t = 30.0)]
    pub api_timeout: f64,

    /// Default cap for list_evaluators
    #[arg(long, env = "MAX_EVALUATORS", default_value_t = 40)]
    pub max_evaluators: usize,

    /// Default cap for list_judges
    #[arg(long, env = "MAX_JUDGES", default_value_t = 40)]
    pub max_judges: usize,

    /// Include globally shared judges in list_judges
    #[arg(
        long,
        env = "SHOW_PUBLIC_JUDGES",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        default_value_t = false
    )]
    pub show_public_judges: bool,

    /// Evaluator used by run_coding_policy_adherence
    #[arg(long, env = "CODING_POLICY_EVALUATOR_ID", default_value = DEFAULT_CODING_POLICY_EVALUATOR_ID)]
    pub coding_policy_evaluator_id: String,

    /// Request text used by run_coding_policy_adherence
    #[arg(
        long,
        env = "CODING_POLICY_EVALUATOR_REQUEST",
        default_value = DEFAULT_CODING_POLICY_EVALUATOR_REQUEST
    )]
    pub coding_policy_evaluator_request: String,

    /// Log level or filter directive (RUST_LOG takes precedence)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format (written to stderr)
    #[arg(long, value_enum, env = "LOG_FORMAT", default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Log request payloads and (redacted) headers; implies debug log level
    #[arg(
        long,
        env = "DEBUG",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        default_value_t = false
    )]
    pub debug: bool,
}

impl ServerArgs {
    /// Check the parsed values and build the immutable runtime configuration.
    pub fn into_config(self) -> Result<ServerConfig> {
        if self.api_key.trim().is_empty() {
            bail!("SCORABLE_API_KEY must not be empty");
        }
        if !self.api_timeout.is_finite() || self.api_timeout <= 0.0 {
            bail!(
                "SCORABLE_API_TIMEOUT must be a positive number of seconds, got {}",
                self.api_timeout
            );
        }

        let client = ClientConfig::new(self.api_key)
            .with_base_url(self.api_url)
            .with_timeout(Duration::from_secs_f64(self.api_timeout))
            .with_max_evaluators(self.max_evaluators)
            .with_max_judges(self.max_judges)
            .with_show_public_judges(self.show_public_judges)
            .with_debug(self.debug);

        let log_level = if self.debug {
            "debug".to_string()
        } else {
            self.log_level
        };

        Ok(ServerConfig {
            client,
            coding_policy_evaluator_id: self.coding_policy_evaluator_id,
            coding_policy_evaluator_request: self.coding_policy_evaluator_request,
            log_level,
            log_format: self.log_format,
        })
    }
}

/// Runtime configuration handed to the router and transport.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub client: ClientConfig,
    pub coding_policy_evaluator_id: String,
    pub coding_policy_evaluator_request: String,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn new(client: ClientConfig) -> Self {
        Self {
            client,
            coding_policy_evaluator_id: DEFAULT_CODING_POLICY_EVALUATOR_ID.to_string(),
            coding_policy_evaluator_request: DEFAULT_CODING_POLICY_EVALUATOR_REQUEST.to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> ServerArgs {
        let mut argv = vec!["scorable-mcp-server", "--api-key", "sk-test"];
        argv.extend_from_slice(extra);
        ServerArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = parse(&[
            "--api-url",
            "http://localhost:9000",
            "--api-timeout",
            "2.5",
            "--max-judges",
            "7",
            "--show-public-judges",
            "true",
            "--log-format",
            "json",
        ])
        .into_config()
        .unwrap();

        assert_eq!(config.client.base_url, "http://localhost:9000");
        assert_eq!(config.client.timeout, Duration::from_millis(2500));
        assert_eq!(config.client.max_judges, 7);
        assert!(config.client.show_public_judges);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let args = ServerArgs::try_parse_from(["scorable-mcp-server", "--api-key", "  "]).unwrap();
        let err = args.into_config().unwrap_err();
        assert!(err.to_string().contains("SCORABLE_API_KEY"));
    }

    #[test]
    fn test_non_positive_timeout_rejected() {
        let err = parse(&["--api-timeout", "0"]).into_config().unwrap_err();
        assert!(err.to_string().contains("SCORABLE_API_TIMEOUT"));
    }

    #[test]
    fn test_debug_forces_debug_level() {
        let config = parse(&["--debug", "yes", "--log-level", "warn"])
            .into_config()
            .unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(config.client.debug);
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::new(ClientConfig::new("key"));
        assert_eq!(
            config.coding_policy_evaluator_id,
            "4613f248-b60e-403a-bcdc-157d1c44194a"
        );
        assert_eq!(
            config.coding_policy_evaluator_request,
            "Is the response written according to the coding policy?"
        );
    }
}
