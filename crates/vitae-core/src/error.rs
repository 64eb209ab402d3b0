use thiserror::Error;

use crate::resume::ParseStatus;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Resume not found: {0}")]
    ResumeNotFound(uuid::Uuid),

    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    #[error("Invalid parse status: {0}")]
    InvalidParseStatus(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: ParseStatus, to: ParseStatus },

    #[error("Corrupt stored row: {0}")]
    CorruptRow(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
