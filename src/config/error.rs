use thiserror::Error;

use crate::bbox::BboxError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid bbox: {0}")]
    Bbox(#[from] BboxError),
    #[error("target_variable {0:?} is not a known variable code")]
    TargetVariable(String),
    #[error("pattern cannot be empty")]
    EmptyPattern,
}
