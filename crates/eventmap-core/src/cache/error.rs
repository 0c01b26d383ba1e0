use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Key \"{key}\" not in cache")]
    NotInCache { key: String },

    #[error("Invalid cache key: {0:?}")]
    InvalidKey(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl CacheError {
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::NotInCache { .. })
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
