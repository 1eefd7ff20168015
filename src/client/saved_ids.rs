use std::collections::BTreeSet;

use crate::client::SavedIdStorage;
use crate::client::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavedIdState {
    Hydrated,
    Mutated,
}

/// Ids of the jobs the current user has saved, owned by one view.
///
/// Created by [`SavedIdSet::hydrate`] and written back exactly once by
/// [`SavedIdSet::flush`], which consumes the set. Nothing is persisted in
/// between, so ids saved after hydration are lost if the process dies
/// before the flush.
#[derive(Debug)]
pub struct SavedIdSet {
    ids: BTreeSet<String>,
    state: SavedIdState,
}

impl SavedIdSet {
    /// Read the stored ids. Missing or unreadable storage yields an empty set.
    pub fn hydrate(storage: &dyn SavedIdStorage) -> Self {
        let ids = match storage.load_saved_ids() {
            Ok(ids) => ids.into_iter().filter(|id| !id.is_empty()).collect(),
            Err(e) => {
                tracing::warn!("Ignoring stored saved job ids: {e}");
                BTreeSet::new()
            }
        };
        Self {
            ids,
            state: SavedIdState::Hydrated,
        }
    }

    pub fn contains(&self, job_id: &str) -> bool {
        self.ids.contains(job_id)
    }

    /// Returns false if the id was already present.
    pub fn insert(&mut self, job_id: String) -> bool {
        let inserted = self.ids.insert(job_id);
        if inserted {
            self.state = SavedIdState::Mutated;
        }
        inserted
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn state(&self) -> SavedIdState {
        self.state
    }

    /// Overwrite storage with the current ids.
    pub fn flush(self, storage: &dyn SavedIdStorage) -> Result<(), ClientError> {
        let state = self.state;
        let ids: Vec<String> = self.ids.into_iter().collect();
        storage.store_saved_ids(&ids)?;
        tracing::debug!("Flushed {} saved job ids ({state:?})", ids.len());
        Ok(())
    }
}
