use std::sync::Arc;

use crate::client::error::ClientError;
use crate::client::view::SearchView;
use crate::client::{AuthSession, JobPersistence, SaveJobRequest, SaveReceipt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Already in the saved set; no request was made.
    AlreadySaved,
    /// Not among the displayed results.
    NotFound,
    /// Nobody is logged in; no request was made.
    AuthRequired,
}

pub struct SaveController {
    persistence: Arc<dyn JobPersistence>,
    auth: Arc<dyn AuthSession>,
}

impl SaveController {
    pub fn new(persistence: Arc<dyn JobPersistence>, auth: Arc<dyn AuthSession>) -> Self {
        Self { persistence, auth }
    }

    /// Save one of the displayed jobs to the caller's account.
    ///
    /// The saved set only grows after the backend has accepted the job. A
    /// failed save is logged and returned; it is never retried.
    pub async fn save(
        &self,
        view: &mut SearchView,
        job_id: &str,
    ) -> Result<SaveOutcome, ClientError> {
        let Some(job) = view.find(job_id) else {
            tracing::debug!("Job {job_id} is not among the displayed results");
            return Ok(SaveOutcome::NotFound);
        };

        if view.is_saved(job_id) {
            return Ok(SaveOutcome::AlreadySaved);
        }

        let token = match self.auth.current_token() {
            Some(token) if self.auth.is_logged_in() => token,
            _ => {
                tracing::warn!("Not saving job {job_id}: not logged in");
                return Ok(SaveOutcome::AuthRequired);
            }
        };

        let request = SaveJobRequest::from(job);
        match self.persistence.save_job(&token, &request).await {
            Ok(receipt) => {
                if receipt == SaveReceipt::AlreadyPresent {
                    tracing::info!("Job {job_id} was already saved on the account");
                } else {
                    tracing::info!("Saved job {job_id}");
                }
                view.mark_saved(request.job_id);
                Ok(SaveOutcome::Saved)
            }
            Err(e) => {
                tracing::error!("Saving job {job_id} failed: {e}");
                Err(e)
            }
        }
    }
}
