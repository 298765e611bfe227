use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("No points recorded on {0}; nothing to anchor an insertion to")]
    EmptyRoute(NaiveDate),
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
