use thiserror::Error;

/// Application-wide error types.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No query provided")]
    EmptyQuery,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Search index error: {0}")]
    Search(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Helper conversion from anyhow::Error
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<meilisearch_sdk::errors::Error> for AppError {
    fn from(err: meilisearch_sdk::errors::Error) -> Self {
        AppError::Search(err.to_string())
    }
}
