use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Version conflict: {0}")]
    Conflict(String),
    #[error("Remote store error: {0}")]
    Store(String),
    #[error("Upstream error: {0}")]
    Upstream(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Config error: {0}")]
    Config(String),
}

impl GalleryError {
    /// True when a concurrent writer committed between our read and write.
    pub fn is_conflict(&self) -> bool {
        matches!(self, GalleryError::Conflict(_))
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;
