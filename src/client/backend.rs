use async_trait::async_trait;
use reqwest::StatusCode;

use crate::client::error::ClientError;
use crate::client::{JobPersistence, SaveJobRequest, SaveReceipt, SavedJobSummary};

/// Client for the saved-jobs API served by `jobsearch serve`.
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Persistence(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn jobs_url(&self) -> String {
        format!("{}/api/v1/me/jobs", self.base_url)
    }
}

#[async_trait]
impl JobPersistence for BackendClient {
    async fn save_job(
        &self,
        token: &str,
        job: &SaveJobRequest,
    ) -> Result<SaveReceipt, ClientError> {
        let resp = self
            .client
            .post(self.jobs_url())
            .bearer_auth(token)
            .json(job)
            .send()
            .await
            .map_err(|e| ClientError::Persistence(format!("Save request failed: {e}")))?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        classify_save(status, &body)
    }

    async fn saved_jobs(&self, token: &str) -> Result<Vec<SavedJobSummary>, ClientError> {
        let resp = self
            .client
            .get(self.jobs_url())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ClientError::Persistence(format!("Request failed: {e}")))?;

        match resp.status() {
            StatusCode::UNAUTHORIZED => Err(ClientError::AuthRequired),
            status if !status.is_success() => Err(ClientError::Persistence(format!(
                "backend returned {status}"
            ))),
            _ => resp
                .json()
                .await
                .map_err(|e| ClientError::Persistence(format!("Failed to parse response: {e}"))),
        }
    }
}

/// Map the backend's answer to a save. A conflict means the job is already
/// stored for this user, which is as good as a fresh save.
fn classify_save(status: StatusCode, body: &str) -> Result<SaveReceipt, ClientError> {
    match status {
        s if s.is_success() => Ok(SaveReceipt::Created),
        StatusCode::CONFLICT => Ok(SaveReceipt::AlreadyPresent),
        StatusCode::UNAUTHORIZED => Err(ClientError::AuthRequired),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            Err(ClientError::Validation(error_message(body)))
        }
        s => Err(ClientError::Persistence(format!("backend returned {s}"))),
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}
