#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Job search API error: {0}")]
    ExternalApi(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Authentication required")]
    AuthRequired,

    #[error("Saving job failed: {0}")]
    Persistence(String),

    #[error("Saved job ids are unreadable: {0}")]
    StorageCorruption(String),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}
