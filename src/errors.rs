use thiserror::Error;

/// Error type shared by the storage, configuration, and reporting layers.
#[derive(Debug, Error)]
pub enum PropFlowError {
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PropFlowError>;

impl From<std::io::Error> for PropFlowError {
    fn from(err: std::io::Error) -> Self {
        PropFlowError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for PropFlowError {
    fn from(err: serde_json::Error) -> Self {
        PropFlowError::Storage(err.to_string())
    }
}
