use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::client::JobSearchApi;
use crate::client::error::ClientError;
use crate::client::normalizer::{Job, NO_VALUE, RawExternalJob, normalize};
use crate::client::view::SearchView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank query; nothing was sent and the results were left alone.
    Skipped,
    /// The displayed results were replaced by this many jobs.
    Replaced(usize),
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    results: Vec<serde_json::Value>,
}

pub struct SearchController {
    api: Arc<dyn JobSearchApi>,
}

impl SearchController {
    pub fn new(api: Arc<dyn JobSearchApi>) -> Self {
        Self { api }
    }

    /// Run a search and swap the view's results for the new ones.
    ///
    /// On any failure the view is untouched: the previous results stay on
    /// screen and the input is kept so the user can retry.
    pub async fn search(
        &self,
        view: &mut SearchView,
        query: &str,
    ) -> Result<SearchOutcome, ClientError> {
        if query.trim().is_empty() {
            return Ok(SearchOutcome::Skipped);
        }

        match self.fetch(query).await {
            Ok(jobs) => {
                let count = jobs.len();
                tracing::info!("Search for '{query}' returned {count} jobs");
                view.replace_results(jobs);
                view.input.clear();
                Ok(SearchOutcome::Replaced(count))
            }
            Err(e) => {
                tracing::error!("Search for '{query}' failed: {e}");
                Err(e)
            }
        }
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Job>, ClientError> {
        let resp = self.api.search(query).await?;
        if !resp.status.is_success() {
            return Err(ClientError::ExternalApi(format!(
                "search returned {}",
                resp.status
            )));
        }

        let page: SearchPage = serde_json::from_str(&resp.body)
            .map_err(|e| ClientError::ExternalApi(format!("Failed to parse response: {e}")))?;

        let mut jobs: Vec<Job> = page
            .results
            .into_iter()
            .map(|value| {
                let raw: RawExternalJob = serde_json::from_value(value).unwrap_or_default();
                normalize(&raw)
            })
            .collect();
        make_ids_unique(&mut jobs);
        Ok(jobs)
    }
}

/// Give listings without an id a key derived from their content, and
/// suffix ids repeated within one result set, so that lookups by id hit
/// exactly one job and the same listing keeps its key across searches.
fn make_ids_unique(jobs: &mut [Job]) {
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(jobs.len());
    for job in jobs.iter_mut() {
        if job.job_id == NO_VALUE {
            job.job_id = content_key(job);
        }
        let count = seen.entry(job.job_id.clone()).or_insert(0);
        *count += 1;
        if *count > 1 {
            job.job_id = format!("{}-{count}", job.job_id);
        }
    }
}

fn content_key(job: &Job) -> String {
    let mut hasher = Sha256::new();
    for field in [
        &job.name,
        &job.company,
        &job.category,
        &job.level,
        &job.location,
        &job.link,
    ] {
        hasher.update(field.as_bytes());
        hasher.update(b"|");
    }
    let digest = hex::encode(hasher.finalize());
    format!("local-{}", &digest[..16])
}
