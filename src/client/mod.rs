//! Job search client: talks to the external listing API, keeps the
//! displayed results and the set of saved job ids, and saves jobs to the
//! backend on behalf of a logged-in user.

pub mod backend;
pub mod browse;
pub mod error;
pub mod muse;
pub mod normalizer;
pub mod save;
pub mod saved_ids;
pub mod search;
pub mod session;
pub mod storage;
pub mod view;

#[cfg(test)]
mod fakes;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::client::error::ClientError;
use crate::client::normalizer::Job;

/// Raw reply of the job search API. Status is kept so callers can tell a
/// failed search from an empty one.
#[derive(Debug, Clone)]
pub struct SearchResponse {
    pub status: StatusCode,
    pub body: String,
}

/// External job listing search.
#[async_trait]
pub trait JobSearchApi: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResponse, ClientError>;
}

/// Fields sent to the backend when saving a job. No user identity is
/// included: the backend derives the owner from the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveJobRequest {
    pub job_id: String,
    pub name: String,
    pub company: String,
    pub category: String,
    pub level: String,
    pub location: String,
    pub link: String,
}

impl From<&Job> for SaveJobRequest {
    fn from(job: &Job) -> Self {
        Self {
            job_id: job.job_id.clone(),
            name: job.name.clone(),
            company: job.company.clone(),
            category: job.category.clone(),
            level: job.level.clone(),
            location: job.location.clone(),
            link: job.link.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveReceipt {
    Created,
    /// The backend already holds this job for the caller.
    AlreadyPresent,
}

/// A saved job as listed by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct SavedJobSummary {
    pub id: i32,
    pub name: String,
    pub company: String,
    pub level: String,
    pub location: String,
    pub link: Option<String>,
}

/// Persistence of saved jobs on the caller's account.
#[async_trait]
pub trait JobPersistence: Send + Sync {
    async fn save_job(
        &self,
        token: &str,
        job: &SaveJobRequest,
    ) -> Result<SaveReceipt, ClientError>;

    async fn saved_jobs(&self, token: &str) -> Result<Vec<SavedJobSummary>, ClientError>;
}

/// Whoever issued the session token. Opaque to the client.
pub trait AuthSession: Send + Sync {
    fn is_logged_in(&self) -> bool;
    fn current_token(&self) -> Option<String>;
}

/// Local storage for saved job ids.
pub trait SavedIdStorage: Send + Sync {
    /// Absent data is an empty list; unreadable data is `StorageCorruption`.
    fn load_saved_ids(&self) -> Result<Vec<String>, ClientError>;
    /// Overwrites whatever was stored before.
    fn store_saved_ids(&self, ids: &[String]) -> Result<(), ClientError>;
}
