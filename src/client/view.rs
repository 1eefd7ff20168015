use crate::client::error::ClientError;
use crate::client::normalizer::Job;
use crate::client::saved_ids::SavedIdSet;
use crate::client::{AuthSession, SavedIdStorage};

/// State of one search screen: the text being typed, the results on
/// display and the ids already saved. Both controllers act on it; nothing
/// about it is global.
#[derive(Debug)]
pub struct SearchView {
    pub input: String,
    results: Vec<Job>,
    saved: SavedIdSet,
}

impl SearchView {
    pub fn mount(storage: &dyn SavedIdStorage) -> Self {
        Self {
            input: String::new(),
            results: Vec::new(),
            saved: SavedIdSet::hydrate(storage),
        }
    }

    pub fn results(&self) -> &[Job] {
        &self.results
    }

    pub fn find(&self, job_id: &str) -> Option<&Job> {
        self.results.iter().find(|job| job.job_id == job_id)
    }

    pub fn saved_ids(&self) -> &SavedIdSet {
        &self.saved
    }

    pub fn is_saved(&self, job_id: &str) -> bool {
        self.saved.contains(job_id)
    }

    /// Whether the save action is offered for this job.
    pub fn can_save(&self, auth: &dyn AuthSession, job_id: &str) -> bool {
        auth.is_logged_in() && !self.is_saved(job_id)
    }

    pub(crate) fn replace_results(&mut self, jobs: Vec<Job>) {
        self.results = jobs;
    }

    pub(crate) fn mark_saved(&mut self, job_id: String) {
        self.saved.insert(job_id);
    }

    /// Tear the view down, writing the saved ids back to storage.
    pub fn unmount(self, storage: &dyn SavedIdStorage) -> Result<(), ClientError> {
        self.saved.flush(storage)
    }
}
