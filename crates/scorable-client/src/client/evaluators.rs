use reqwest::Method;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::decode::{decode_all, decode_evaluator, decode_result};
use crate::error::{ClientError, ClientResult};
use crate::types::{EvaluationPayload, EvaluationResponse, EvaluatorInfo, EvaluatorRef};

use super::helpers::endpoint_path;
use super::{page_size, ResourceKind, ScorableClient};

/// Client for the evaluators endpoints.
#[derive(Debug, Clone)]
pub struct EvaluatorRepository {
    client: ScorableClient,
}

impl EvaluatorRepository {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Ok(Self::from_client(ScorableClient::new(config)?))
    }

    pub fn from_client(client: ScorableClient) -> Self {
        Self { client }
    }

    /// List evaluators, newest first as ordered by the API.
    ///
    /// `max_count` defaults to the configured `max_evaluators`.
    pub async fn list_evaluators(&self, max_count: Option<usize>) -> ClientResult<Vec<EvaluatorInfo>> {
        let max_to_fetch = max_count.unwrap_or(self.client.config().max_evaluators);
        let initial_path = format!("/v1/evaluators?page_size={}", page_size(max_to_fetch));

        let raw = self
            .client
            .fetch_collection(&initial_path, max_to_fetch, ResourceKind::Evaluators, &[])
            .await?;

        decode_all(&raw, decode_evaluator)
    }

    /// Execute one evaluator against a request/response pair.
    pub async fn run_evaluator(
        &self,
        evaluator: EvaluatorRef<'_>,
        payload: &EvaluationPayload,
    ) -> ClientResult<EvaluationResponse> {
        let body = serde_json::to_value(payload).map_err(|e| ClientError::Unexpected {
            message: format!("failed to encode evaluation payload: {}", e),
        })?;

        info!(evaluator = %evaluator, "running evaluator");
        let response = match evaluator {
            EvaluatorRef::Id(id) => {
                let path = endpoint_path(&["v1", "evaluators", "execute", id])?;
                self.client.http.request(Method::POST, &path, &[], Some(&body)).await?
            }
            EvaluatorRef::Name(name) => {
                self.client
                    .http
                    .request(
                        Method::POST,
                        "/v1/evaluators/execute/by-name/",
                        &[("name", name)],
                        Some(&body),
                    )
                    .await?
            }
        };
        debug!(response = %response, "raw evaluation response");

        decode_result(response, "evaluation")
    }
}
