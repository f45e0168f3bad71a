//! Typed records returned by the Scorable API.
//!
//! Decoding policy: unknown fields are ignored so additive API changes do not
//! break the client, while missing required fields still fail. Every struct
//! here relies on serde's default of discarding unknown keys; none of them use
//! `#[serde(flatten)]` catch-alls, so extras are never retrievable afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Item type of an array-valued evaluator input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayInputItem {
    #[serde(rename = "type")]
    pub item_type: String,
}

/// Declared type of one evaluator input parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSpec {
    #[serde(rename = "type")]
    pub input_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<ArrayInputItem>,
}

/// Evaluator information, trimmed down to what a calling agent needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorInfo {
    /// Name of the evaluator.
    pub name: String,

    /// ID of the evaluator.
    pub id: String,

    /// Creation timestamp (ISO-8601, as sent by the API).
    pub created_at: String,

    /// Intent of the evaluator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,

    /// Input parameters required for running the evaluator.
    pub inputs: BTreeMap<String, InputSpec>,
}

impl EvaluatorInfo {
    /// Whether the evaluator expects `contexts` passages.
    pub fn requires_contexts(&self) -> bool {
        self.inputs.contains_key("contexts")
    }

    /// Whether the evaluator expects an `expected_output`.
    pub fn requires_expected_output(&self) -> bool {
        self.inputs.contains_key("expected_output")
    }
}

/// Response of the `list_evaluators` tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorsListResponse {
    pub evaluators: Vec<EvaluatorInfo>,
}

/// Evaluator as listed inside a judge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedEvaluatorInfo {
    pub name: String,
    pub id: String,
    #[serde(
        default = "empty_intent",
        skip_serializing_if = "Option::is_none"
    )]
    pub intent: Option<String>,
}

fn empty_intent() -> Option<String> {
    Some(String::new())
}

/// Judge information: a named bundle of evaluators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeInfo {
    pub name: String,
    pub id: String,
    pub created_at: String,
    pub evaluators: Vec<NestedEvaluatorInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Response of the `list_judges` tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgesListResponse {
    pub judges: Vec<JudgeInfo>,
}

/// Result of running a single evaluator.
///
/// `score` is nominally in `[0, 1]`; the range is not enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub evaluator_name: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_log_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

/// One evaluator's outcome within a judge run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeEvaluatorResult {
    pub evaluator_name: String,
    pub score: f64,
    pub justification: String,
}

/// Result of running a judge, one entry per member evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunJudgeResponse {
    pub evaluator_results: Vec<JudgeEvaluatorResult>,
}

/// How an evaluator is addressed on the execute endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluatorRef<'a> {
    /// `POST /v1/evaluators/execute/{id}/`
    Id(&'a str),
    /// `POST /v1/evaluators/execute/by-name/?name=...`
    Name(&'a str),
}

impl std::fmt::Display for EvaluatorRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id={}", id),
            Self::Name(name) => write!(f, "name={}", name),
        }
    }
}

/// Body of an evaluator execution. Empty optional values are left out of the
/// wire payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationPayload {
    pub request: String,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contexts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
}

impl EvaluationPayload {
    pub fn new(request: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            request: request.into(),
            response: response.into(),
            contexts: None,
            expected_output: None,
        }
    }

    pub fn with_contexts(mut self, contexts: Option<Vec<String>>) -> Self {
        self.contexts = contexts.filter(|c| !c.is_empty());
        self
    }

    pub fn with_expected_output(mut self, expected_output: Option<String>) -> Self {
        self.expected_output = expected_output.filter(|e| !e.is_empty());
        self
    }
}
