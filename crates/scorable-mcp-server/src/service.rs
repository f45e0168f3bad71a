//! Service layer: the one place client errors become a reported failure.

use std::fmt;

use scorable_client::{
    ClientError, EvaluationResponse, EvaluatorInfo, EvaluatorRef, EvaluatorRepository,
    EvaluatorsListResponse, JudgeRepository, JudgesListResponse, RunJudgeResponse,
};
use tracing::{debug, error, info};

use crate::tools::requests::{EvaluationRequest, EvaluationRequestByName, RunJudgeRequest};

/// Operations the services expose; names the failure in user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListEvaluators,
    RunEvaluation,
    RunEvaluationByName,
    ListJudges,
    RunJudge,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListEvaluators => "list_evaluators",
            Self::RunEvaluation => "run_evaluation",
            Self::RunEvaluationByName => "run_evaluation_by_name",
            Self::ListJudges => "list_judges",
            Self::RunJudge => "run_judge",
        }
    }

    fn failure_prefix(&self) -> &'static str {
        match self {
            Self::ListEvaluators => "Cannot fetch evaluators",
            Self::RunEvaluation => "Failed to run evaluation",
            Self::RunEvaluationByName => "Failed to run evaluation by name",
            Self::ListJudges => "Cannot fetch judges",
            Self::RunJudge => "Judge execution failed",
        }
    }

    fn invalid_response_prefix(&self) -> &'static str {
        match self {
            Self::ListEvaluators => "Invalid evaluators response",
            Self::RunEvaluation | Self::RunEvaluationByName => "Invalid evaluation response",
            Self::ListJudges => "Invalid judges response",
            Self::RunJudge => "Invalid judge response",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{message}")]
    OperationFailed {
        operation: Operation,
        message: String,
        #[source]
        source: ClientError,
    },
}

impl ServiceError {
    pub fn operation(&self) -> Operation {
        match self {
            Self::OperationFailed { operation, .. } => *operation,
        }
    }

    fn from_client(operation: Operation, err: ClientError) -> Self {
        let prefix = match &err {
            ClientError::Api { .. } => {
                error!(operation = %operation, error = %err, "Scorable API call failed");
                operation.failure_prefix()
            }
            ClientError::ResponseValidation { response_data, .. } => {
                error!(operation = %operation, error = %err, "response validation error");
                if let Some(data) = response_data {
                    debug!(operation = %operation, response_data = %data, "response data");
                }
                operation.invalid_response_prefix()
            }
            ClientError::Unexpected { .. } => {
                error!(operation = %operation, error = %err, "unexpected client error");
                operation.failure_prefix()
            }
        };

        Self::OperationFailed {
            operation,
            message: format!("{}: {}", prefix, err),
            source: err,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone)]
pub struct EvaluatorService {
    repository: EvaluatorRepository,
}

impl EvaluatorService {
    pub fn new(repository: EvaluatorRepository) -> Self {
        Self { repository }
    }

    pub async fn list_evaluators(
        &self,
        max_count: Option<usize>,
    ) -> ServiceResult<EvaluatorsListResponse> {
        info!(max_count = ?max_count, "fetching evaluators from Scorable API");
        let evaluators = self
            .repository
            .list_evaluators(max_count)
            .await
            .map_err(|e| ServiceError::from_client(Operation::ListEvaluators, e))?;

        info!(total = evaluators.len(), "retrieved evaluators");
        Ok(EvaluatorsListResponse { evaluators })
    }

    /// Look an evaluator up by id among the listed ones.
    pub async fn get_evaluator_by_id(&self, evaluator_id: &str) -> ServiceResult<Option<EvaluatorInfo>> {
        let listed = self.list_evaluators(None).await?;
        Ok(listed
            .evaluators
            .into_iter()
            .find(|evaluator| evaluator.id == evaluator_id))
    }

    pub async fn run_evaluation(
        &self,
        request: &EvaluationRequest,
    ) -> ServiceResult<EvaluationResponse> {
        self.repository
            .run_evaluator(EvaluatorRef::Id(&request.evaluator_id), &request.payload())
            .await
            .map_err(|e| ServiceError::from_client(Operation::RunEvaluation, e))
    }

    pub async fn run_evaluation_by_name(
        &self,
        request: &EvaluationRequestByName,
    ) -> ServiceResult<EvaluationResponse> {
        self.repository
            .run_evaluator(EvaluatorRef::Name(&request.evaluator_name), &request.payload())
            .await
            .map_err(|e| ServiceError::from_client(Operation::RunEvaluationByName, e))
    }
}

#[derive(Debug, Clone)]
pub struct JudgeService {
    repository: JudgeRepository,
}

impl JudgeService {
    pub fn new(repository: JudgeRepository) -> Self {
        Self { repository }
    }

    pub async fn list_judges(&self, max_count: Option<usize>) -> ServiceResult<JudgesListResponse> {
        info!(max_count = ?max_count, "fetching judges from Scorable API");
        let judges = self
            .repository
            .list_judges(max_count)
            .await
            .map_err(|e| ServiceError::from_client(Operation::ListJudges, e))?;

        info!(total = judges.len(), "retrieved judges");
        Ok(JudgesListResponse { judges })
    }

    pub async fn run_judge(&self, request: &RunJudgeRequest) -> ServiceResult<RunJudgeResponse> {
        info!(judge_id = %request.judge_id, judge_name = %request.judge_name, "running judge");
        let result = self
            .repository
            .run_judge(&request.judge_id, &request.request, &request.response)
            .await
            .map_err(|e| ServiceError::from_client(Operation::RunJudge, e))?;

        info!(results = result.evaluator_results.len(), "judge execution completed");
        Ok(result)
    }
}
