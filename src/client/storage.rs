use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::client::SavedIdStorage;
use crate::client::error::ClientError;

/// Saved job ids kept as a JSON array in a single file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SavedIdStorage for FileStorage {
    fn load_saved_ids(&self) -> Result<Vec<String>, ClientError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ClientError::StorageCorruption(format!(
                    "{}: {e}",
                    self.path.display()
                )));
            }
        };
        serde_json::from_str(&raw).map_err(|e| {
            ClientError::StorageCorruption(format!("{}: {e}", self.path.display()))
        })
    }

    fn store_saved_ids(&self, ids: &[String]) -> Result<(), ClientError> {
        // An empty list removes the entry rather than storing "[]".
        if ids.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(ids)
            .map_err(|e| ClientError::StorageCorruption(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
pub use memory::MemoryStorage;
