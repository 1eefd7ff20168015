//! Scripted capability doubles shared by the controller tests.

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::client::error::ClientError;
use crate::client::normalizer::Job;
use crate::client::{
    JobPersistence, JobSearchApi, SaveJobRequest, SaveReceipt, SavedJobSummary, SearchResponse,
};

pub fn job(id: &str) -> Job {
    Job {
        job_id: id.to_string(),
        name: format!("Job {id}"),
        company: "Acme".into(),
        category: "Software".into(),
        level: "Senior".into(),
        location: "Remote".into(),
        link: format!("http://jobs.example/{id}"),
    }
}

pub enum Reply {
    Status(StatusCode, String),
    Fail(String),
}

/// Search API that records queries and plays back one reply per call.
pub struct FakeSearchApi {
    replies: Mutex<Vec<Reply>>,
    pub queries: Mutex<Vec<String>>,
}

impl FakeSearchApi {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl JobSearchApi for FakeSearchApi {
    async fn search(&self, query: &str) -> Result<SearchResponse, ClientError> {
        self.queries.lock().unwrap().push(query.to_string());
        let mut replies = self.replies.lock().unwrap();
        assert!(!replies.is_empty(), "unexpected search for {query:?}");
        match replies.remove(0) {
            Reply::Status(status, body) => Ok(SearchResponse { status, body }),
            Reply::Fail(msg) => Err(ClientError::ExternalApi(msg)),
        }
    }
}

/// Persistence that records every request and answers with a fixed result.
pub struct FakePersistence {
    result: fn() -> Result<SaveReceipt, ClientError>,
    pub requests: Mutex<Vec<(String, SaveJobRequest)>>,
}

impl FakePersistence {
    pub fn new(result: fn() -> Result<SaveReceipt, ClientError>) -> Self {
        Self {
            result,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl JobPersistence for FakePersistence {
    async fn save_job(
        &self,
        token: &str,
        job: &SaveJobRequest,
    ) -> Result<SaveReceipt, ClientError> {
        self.requests
            .lock()
            .unwrap()
            .push((token.to_string(), job.clone()));
        (self.result)()
    }

    async fn saved_jobs(&self, _token: &str) -> Result<Vec<SavedJobSummary>, ClientError> {
        Ok(Vec::new())
    }
}
