//! Static tool catalogue: one entry per tool with its description, declared
//! input schema and the compiled validator for that schema.

use std::fmt;

use jsonschema::Draft;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub mod requests;
mod schemas;

use requests::{
    CodingPolicyAdherenceEvaluationRequest, EvaluationRequest, EvaluationRequestByName,
    ListEvaluatorsRequest, ListJudgesRequest, RunJudgeRequest, Validate, ValidationError,
    Violation,
};

/// Schema violations reported per call before the rest are dropped.
const MAX_SCHEMA_ERRORS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    ListEvaluators,
    RunEvaluation,
    RunEvaluationByName,
    RunCodingPolicyAdherence,
    ListJudges,
    RunJudge,
}

impl ToolName {
    pub const ALL: [ToolName; 6] = [
        ToolName::ListEvaluators,
        ToolName::RunEvaluation,
        ToolName::RunEvaluationByName,
        ToolName::RunCodingPolicyAdherence,
        ToolName::ListJudges,
        ToolName::RunJudge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListEvaluators => "list_evaluators",
            Self::RunEvaluation => "run_evaluation",
            Self::RunEvaluationByName => "run_evaluation_by_name",
            Self::RunCodingPolicyAdherence => "run_coding_policy_adherence",
            Self::ListJudges => "list_judges",
            Self::RunJudge => "run_judge",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::ListEvaluators => "List all available evaluators from Scorable",
            Self::RunEvaluation => "Run a standard evaluation using a Scorable evaluator by ID",
            Self::RunEvaluationByName => {
                "Run a standard evaluation using a Scorable evaluator by name"
            }
            Self::RunCodingPolicyAdherence => {
                "Evaluate code against repository coding policy documents using a dedicated Scorable evaluator"
            }
            Self::ListJudges => {
                "List all available judges from Scorable. Judge is a collection of evaluators forming LLM-as-a-judge."
            }
            Self::RunJudge => "Run a judge using a Scorable judge by ID",
        }
    }

    pub fn input_schema(&self) -> Value {
        match self {
            Self::ListEvaluators => schemas::list_evaluators(),
            Self::RunEvaluation => schemas::run_evaluation(),
            Self::RunEvaluationByName => schemas::run_evaluation_by_name(),
            Self::RunCodingPolicyAdherence => schemas::run_coding_policy_adherence(),
            Self::ListJudges => schemas::list_judges(),
            Self::RunJudge => schemas::run_judge(),
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What `tools/list` returns for one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// A validated call, one variant per tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    ListEvaluators(ListEvaluatorsRequest),
    RunEvaluation(EvaluationRequest),
    RunEvaluationByName(EvaluationRequestByName),
    RunCodingPolicyAdherence(CodingPolicyAdherenceEvaluationRequest),
    ListJudges(ListJudgesRequest),
    RunJudge(RunJudgeRequest),
}

#[derive(Debug, thiserror::Error)]
#[error("input schema for tool {tool} does not compile: {message}")]
pub struct CatalogueError {
    pub tool: ToolName,
    pub message: String,
}

struct CatalogueEntry {
    tool: ToolName,
    descriptor: ToolDescriptor,
    validator: jsonschema::Validator,
}

/// Built once at startup and read-only afterwards.
pub struct ToolCatalogue {
    entries: Vec<CatalogueEntry>,
}

impl fmt::Debug for ToolCatalogue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| entry.tool))
            .finish()
    }
}

impl ToolCatalogue {
    pub fn new() -> Result<Self, CatalogueError> {
        let entries = ToolName::ALL
            .into_iter()
            .map(|tool| -> Result<CatalogueEntry, CatalogueError> {
                let schema = tool.input_schema();
                let validator = jsonschema::options()
                    .with_draft(Draft::Draft202012)
                    .build(&schema)
                    .map_err(|e| CatalogueError {
                        tool,
                        message: e.to_string(),
                    })?;
                Ok(CatalogueEntry {
                    tool,
                    descriptor: ToolDescriptor {
                        name: tool.as_str().to_string(),
                        description: tool.description().to_string(),
                        input_schema: schema,
                    },
                    validator,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.entries
            .iter()
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    pub fn resolve(&self, name: &str) -> Option<ToolName> {
        self.entries
            .iter()
            .map(|entry| entry.tool)
            .find(|tool| tool.as_str() == name)
    }

    /// Validate `arguments` against the tool's schema, then build the typed request.
    pub fn parse_request(
        &self,
        tool: ToolName,
        arguments: &Value,
    ) -> Result<ToolRequest, ValidationError> {
        if let Some(entry) = self.entries.iter().find(|entry| entry.tool == tool) {
            let violations: Vec<Violation> = entry
                .validator
                .iter_errors(arguments)
                .take(MAX_SCHEMA_ERRORS)
                .map(|e| Violation::schema(e.to_string()))
                .collect();
            if !violations.is_empty() {
                return Err(ValidationError::new(violations));
            }
        }

        Ok(match tool {
            ToolName::ListEvaluators => ToolRequest::ListEvaluators(typed(arguments)?),
            ToolName::RunEvaluation => ToolRequest::RunEvaluation(typed(arguments)?),
            ToolName::RunEvaluationByName => ToolRequest::RunEvaluationByName(typed(arguments)?),
            ToolName::RunCodingPolicyAdherence => {
                ToolRequest::RunCodingPolicyAdherence(typed(arguments)?)
            }
            ToolName::ListJudges => ToolRequest::ListJudges(typed(arguments)?),
            ToolName::RunJudge => ToolRequest::RunJudge(typed(arguments)?),
        })
    }
}

fn typed<T: DeserializeOwned + Validate>(arguments: &Value) -> Result<T, ValidationError> {
    let request: T = serde_json::from_value(arguments.clone())
        .map_err(|e| ValidationError::new(vec![Violation::schema(e.to_string())]))?;

    let violations = request.violations();
    if violations.is_empty() {
        Ok(request)
    } else {
        Err(ValidationError::new(violations))
    }
}
