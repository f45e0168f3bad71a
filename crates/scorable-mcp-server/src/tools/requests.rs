//! Typed tool arguments and the checks JSON Schema cannot express.

use std::fmt;

use scorable_client::EvaluationPayload;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One rejected argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: Option<String>,
    pub reason: String,
}

impl Violation {
    pub fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            reason: reason.into(),
        }
    }

    pub fn schema(reason: impl Into<String>) -> Self {
        Self {
            field: None,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}: {}", field, self.reason),
            None => f.write_str(&self.reason),
        }
    }
}

/// Tool arguments rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.violations.iter().map(ToString::to_string).collect();
        f.write_str(&rendered.join("; "))
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn mentions(&self, field: &str) -> bool {
        self.violations
            .iter()
            .any(|v| v.field.as_deref() == Some(field) || v.reason.contains(field))
    }
}

/// Constraints checked after deserialization.
pub trait Validate {
    fn violations(&self) -> Vec<Violation> {
        Vec::new()
    }
}

fn require_text(violations: &mut Vec<Violation>, field: &str, value: &str, label: &str) {
    if value.trim().is_empty() {
        violations.push(Violation::field(field, format!("{} cannot be empty", label)));
    }
}

fn request_response_violations(request: &str, response: &str) -> Vec<Violation> {
    let mut violations = Vec::new();
    require_text(&mut violations, "request", request, "Request");
    require_text(&mut violations, "response", response, "Response");
    violations
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListEvaluatorsRequest {}

impl Validate for ListEvaluatorsRequest {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListJudgesRequest {}

impl Validate for ListJudgesRequest {}

/// Run an evaluator addressed by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluationRequest {
    pub evaluator_id: String,
    pub request: String,
    pub response: String,
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
    #[serde(default)]
    pub expected_output: Option<String>,
}

impl EvaluationRequest {
    pub fn payload(&self) -> EvaluationPayload {
        EvaluationPayload::new(self.request.clone(), self.response.clone())
            .with_contexts(self.contexts.clone())
            .with_expected_output(self.expected_output.clone())
    }
}

impl Validate for EvaluationRequest {
    fn violations(&self) -> Vec<Violation> {
        request_response_violations(&self.request, &self.response)
    }
}

/// Run an evaluator addressed by its exact name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluationRequestByName {
    pub evaluator_name: String,
    pub request: String,
    pub response: String,
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
    #[serde(default)]
    pub expected_output: Option<String>,
}

impl EvaluationRequestByName {
    pub fn payload(&self) -> EvaluationPayload {
        EvaluationPayload::new(self.request.clone(), self.response.clone())
            .with_contexts(self.contexts.clone())
            .with_expected_output(self.expected_output.clone())
    }
}

impl Validate for EvaluationRequestByName {
    fn violations(&self) -> Vec<Violation> {
        request_response_violations(&self.request, &self.response)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodingPolicyAdherenceEvaluationRequest {
    pub policy_documents: Vec<String>,
    pub code: String,
}

impl CodingPolicyAdherenceEvaluationRequest {
    /// Rewrite into a regular evaluation: the policy documents become the
    /// contexts and the code is the response under test.
    ///
    /// The rewritten request goes through the same non-empty checks as a
    /// direct `run_evaluation` call.
    pub fn into_evaluation(
        self,
        evaluator_id: &str,
        request: &str,
    ) -> Result<EvaluationRequest, ValidationError> {
        let evaluation = EvaluationRequest {
            evaluator_id: evaluator_id.to_string(),
            request: request.to_string(),
            response: self.code,
            contexts: Some(self.policy_documents),
            expected_output: None,
        };

        let violations = evaluation.violations();
        if violations.is_empty() {
            Ok(evaluation)
        } else {
            Err(ValidationError::new(violations))
        }
    }
}

impl Validate for CodingPolicyAdherenceEvaluationRequest {}

fn default_judge_name() -> String {
    "-".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunJudgeRequest {
    pub judge_id: String,
    /// Only used in log lines.
    #[serde(default = "default_judge_name")]
    pub judge_name: String,
    pub request: String,
    pub response: String,
}

impl Validate for RunJudgeRequest {
    fn violations(&self) -> Vec<Violation> {
        request_response_violations(&self.request, &self.response)
    }
}

/// Arguments of a call to a tool we do not serve, kept verbatim for the log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnknownToolRequest {
    #[serde(flatten)]
    pub arguments: Map<String, Value>,
}

impl UnknownToolRequest {
    pub fn from_arguments(arguments: &Value) -> Self {
        match arguments {
            Value::Object(map) => Self {
                arguments: map.clone(),
            },
            Value::Null => Self::default(),
            other => {
                let mut arguments = Map::new();
                arguments.insert("arguments".to_string(), other.clone());
                Self { arguments }
            }
        }
    }
}
