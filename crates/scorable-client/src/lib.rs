//! HTTP client for the Scorable evaluator and judge API.
//!
//! This crate provides:
//!
//! - Repositories for listing and executing evaluators and judges
//! - Cursor-following pagination with a hard cap on fetched records
//! - Tolerant decoding: unknown fields ignored, missing required fields rejected
//!
//! # Quick Start
//!
//! ```no_run
//! use scorable_client::{ClientConfig, EvaluationPayload, EvaluatorRef, EvaluatorRepository};
//!
//! # async fn example() -> Result<(), scorable_client::ClientError> {
//! let evaluators = EvaluatorRepository::new(ClientConfig::new("my-api-key"))?;
//!
//! for evaluator in evaluators.list_evaluators(Some(10)).await? {
//!     println!("{} ({})", evaluator.name, evaluator.id);
//! }
//!
//! let payload = EvaluationPayload::new("What is 2+2?", "4");
//! let result = evaluators
//!     .run_evaluator(EvaluatorRef::Name("Truthfulness"), &payload)
//!     .await?;
//! println!("score: {}", result.score);
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! Every HTTP status >= 400 surfaces as [`ClientError::Api`] carrying the
//! status and the server's `detail`; transport failures use status 0.
//! Requests are never retried.

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod types;

pub use client::{EvaluatorRepository, JudgeRepository, ResourceKind, ScorableClient, USER_AGENT};
pub use config::{ClientConfig, DEFAULT_API_URL, MAX_PAGE_SIZE};
pub use error::{ClientError, ClientResult};
pub use types::{
    ArrayInputItem, EvaluationPayload, EvaluationResponse, EvaluatorInfo, EvaluatorRef,
    EvaluatorsListResponse, InputSpec, JudgeEvaluatorResult, JudgeInfo, JudgesListResponse,
    NestedEvaluatorInfo, RunJudgeResponse,
};
