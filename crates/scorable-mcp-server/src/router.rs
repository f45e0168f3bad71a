//! Dispatch core: tool name + raw arguments in, one text result out.
//!
//! Every path ends in exactly one text payload. Failures are reported as
//! `{"error": "..."}` inside that payload, never raised to the transport.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use anyhow::{Context, Result};
use futures::FutureExt;
use scorable_client::{EvaluatorRepository, JudgeRepository, ScorableClient};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, error, warn};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::service::{EvaluatorService, JudgeService};
use crate::tools::requests::{CodingPolicyAdherenceEvaluationRequest, UnknownToolRequest};
use crate::tools::{ToolCatalogue, ToolDescriptor, ToolName, ToolRequest};

/// Fixed evaluator and prompt behind `run_coding_policy_adherence`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodingPolicySettings {
    pub evaluator_id: String,
    pub request: String,
}

#[derive(Debug)]
pub struct ToolRouter {
    catalogue: ToolCatalogue,
    evaluators: EvaluatorService,
    judges: JudgeService,
    coding_policy: CodingPolicySettings,
}

impl ToolRouter {
    pub fn new(config: &ServerConfig) -> Result<Self, ServerError> {
        let client = ScorableClient::new(config.client.clone())?;
        Ok(Self {
            catalogue: ToolCatalogue::new()?,
            evaluators: EvaluatorService::new(EvaluatorRepository::from_client(client.clone())),
            judges: JudgeService::new(JudgeRepository::from_client(client)),
            coding_policy: CodingPolicySettings {
                evaluator_id: config.coding_policy_evaluator_id.clone(),
                request: config.coding_policy_evaluator_request.clone(),
            },
        })
    }

    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.catalogue.descriptors()
    }

    /// Validate and run one tool call; returns the text payload for the caller.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> String {
        debug!(tool = name, arguments = %arguments, "tool call");

        let Some(tool) = self.catalogue.resolve(name) else {
            let echoed = UnknownToolRequest::from_arguments(&arguments);
            warn!(tool = name, arguments = ?echoed.arguments, "Unknown tool");
            return error_text(format!("Unknown tool: {}", name));
        };

        // A missing argument object means "no arguments".
        let arguments = match arguments {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        let request = match self.catalogue.parse_request(tool, &arguments) {
            Ok(request) => request,
            Err(e) => {
                error!(tool = name, error = %e, "validation error");
                return error_text(format!("Invalid arguments for {}: {}", name, e));
            }
        };

        match AssertUnwindSafe(self.dispatch(request)).catch_unwind().await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                error!(tool = name, error = %e, "error executing tool");
                error_text(format!("Error calling tool {}: {}", name, e))
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(tool = name, panic = %message, "tool handler panicked");
                error_text(format!("Error calling tool {}: {}", name, message))
            }
        }
    }

    async fn dispatch(&self, request: ToolRequest) -> Result<String> {
        match request {
            ToolRequest::ListEvaluators(_) => {
                debug!(tool = %ToolName::ListEvaluators, "handling request");
                to_text(&self.evaluators.list_evaluators(None).await?)
            }
            ToolRequest::RunEvaluation(request) => {
                debug!(evaluator_id = %request.evaluator_id, "handling run_evaluation");
                to_text(&self.evaluators.run_evaluation(&request).await?)
            }
            ToolRequest::RunEvaluationByName(request) => {
                debug!(evaluator_name = %request.evaluator_name, "handling run_evaluation_by_name");
                to_text(&self.evaluators.run_evaluation_by_name(&request).await?)
            }
            ToolRequest::RunCodingPolicyAdherence(request) => {
                debug!(tool = %ToolName::RunCodingPolicyAdherence, "handling request");
                self.run_coding_policy_adherence(request).await
            }
            ToolRequest::ListJudges(_) => {
                debug!(tool = %ToolName::ListJudges, "handling request");
                to_text(&self.judges.list_judges(None).await?)
            }
            ToolRequest::RunJudge(request) => {
                debug!(judge_id = %request.judge_id, "handling run_judge");
                to_text(&self.judges.run_judge(&request).await?)
            }
        }
    }

    async fn run_coding_policy_adherence(
        &self,
        request: CodingPolicyAdherenceEvaluationRequest,
    ) -> Result<String> {
        let evaluation = request
            .into_evaluation(&self.coding_policy.evaluator_id, &self.coding_policy.request)?;
        to_text(&self.evaluators.run_evaluation(&evaluation).await?)
    }
}

fn to_text<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).context("failed to serialize tool result")
}

fn error_text(message: String) -> String {
    json!({ "error": message }).to_string()
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "tool handler panicked".to_string()
    }
}
