use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Message broker error: {0}")]
    Broker(String),
}

impl AppError {
    /// Transient errors are worth retrying; request errors never are.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Database(_) | AppError::Broker(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
