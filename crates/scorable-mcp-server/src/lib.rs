//! MCP server exposing Scorable evaluators and judges as tools.
//!
//! The [`router::ToolRouter`] validates a call against the tool's declared
//! schema, runs it through the service layer and always answers with a single
//! JSON text payload. [`server::StdioServer`] carries those calls over
//! line-delimited JSON-RPC on stdin/stdout.
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `SCORABLE_API_KEY` | API key (required) |
//! | `SCORABLE_API_URL` | API base URL (default: `https://api.scorable.ai`) |
//! | `SCORABLE_API_TIMEOUT` | Request timeout in seconds (default: 30) |
//! | `MAX_EVALUATORS` / `MAX_JUDGES` | Listing caps (default: 40) |
//! | `SHOW_PUBLIC_JUDGES` | Include globally shared judges (default: false) |
//! | `CODING_POLICY_EVALUATOR_ID` | Evaluator behind `run_coding_policy_adherence` |
//! | `CODING_POLICY_EVALUATOR_REQUEST` | Request text for that evaluator |
//! | `LOG_LEVEL` / `LOG_FORMAT` | Log filter and `text`/`json` output (stderr) |
//! | `DEBUG` | Log request payloads and redacted headers |

pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod router;
pub mod server;
pub mod service;
pub mod tools;

pub use config::{ServerArgs, ServerConfig};
pub use error::ServerError;
pub use router::ToolRouter;
pub use server::StdioServer;
pub use service::{EvaluatorService, JudgeService, ServiceError};
pub use tools::{ToolCatalogue, ToolDescriptor, ToolName};
