use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::decode::{decode_all, decode_judge, decode_result};
use crate::error::ClientResult;
use crate::types::{JudgeInfo, RunJudgeResponse};

use super::helpers::endpoint_path;
use super::{page_size, ResourceKind, ScorableClient};

/// Client for the judges endpoints.
#[derive(Debug, Clone)]
pub struct JudgeRepository {
    client: ScorableClient,
}

impl JudgeRepository {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Ok(Self::from_client(ScorableClient::new(config)?))
    }

    pub fn from_client(client: ScorableClient) -> Self {
        Self { client }
    }

    /// List judges; `show_global` follows the configuration and survives
    /// continuation links.
    pub async fn list_judges(&self, max_count: Option<usize>) -> ClientResult<Vec<JudgeInfo>> {
        let config = self.client.config();
        let max_to_fetch = max_count.unwrap_or(config.max_judges);
        let show_global = config.show_public_judges.to_string();
        let initial_path = format!(
            "/v1/judges?page_size={}&show_global={}",
            page_size(max_to_fetch),
            show_global
        );

        let raw = self
            .client
            .fetch_collection(
                &initial_path,
                max_to_fetch,
                ResourceKind::Judges,
                &[("show_global", show_global.clone())],
            )
            .await?;

        decode_all(&raw, decode_judge)
    }

    /// Run every evaluator of a judge against one request/response pair.
    pub async fn run_judge(
        &self,
        judge_id: &str,
        request: &str,
        response: &str,
    ) -> ClientResult<RunJudgeResponse> {
        info!(judge_id, "running judge");
        debug!(
            request = %preview(request),
            response = %preview(response),
            "judge inputs"
        );

        let body = json!({ "request": request, "response": response });
        let path = endpoint_path(&["v1", "judges", judge_id, "execute"])?;
        let result = self.client.http.request(Method::POST, &path, &[], Some(&body)).await?;

        decode_result(result, "judge")
    }
}

fn preview(text: &str) -> String {
    text.chars().take(100).collect()
}
