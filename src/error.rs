use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A connection pool error.
    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A resource not found error.
    #[error("Resource not found")]
    NotFound,

    /// An entity is not in the status the operation requires.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A deadline has passed.
    #[error("Expired")]
    Expired,

    /// An encryption error.
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Key material could not be read back. Carries no detail: the cause
    /// (wrong principal, tampered ciphertext, bad IV) must not be observable.
    #[error("Decryption failed")]
    Decryption,

    /// A row was missing an expected column.
    #[error("Missing data: {0}")]
    MissingData(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Coarse classification of an `AppError` for callers that map errors onto
/// a transport (HTTP status codes, RPC error codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    InvalidState,
    Expired,
    Decryption,
    Internal,
}

impl AppError {
    /// Classifies the error and produces a caller-safe message.
    ///
    /// Domain errors pass their message through; infrastructure failures are
    /// logged here with full context and collapsed to a generic message so
    /// no internal detail reaches the caller.
    pub fn to_public(&self) -> (ErrorKind, String) {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (ErrorKind::Internal, "Internal server error".to_string())
            }

            AppError::Pool(e) => {
                tracing::error!("Pool error: {}", e);
                (ErrorKind::Internal, "Internal server error".to_string())
            }

            AppError::Validation(msg) => {
                tracing::debug!("Validation error: {}", msg);
                (ErrorKind::Validation, msg.clone())
            }

            AppError::NotFound => {
                tracing::debug!("Resource not found");
                (ErrorKind::NotFound, "Resource not found".to_string())
            }

            AppError::InvalidState(msg) => {
                tracing::debug!("Invalid state: {}", msg);
                (ErrorKind::InvalidState, msg.clone())
            }

            AppError::Expired => {
                tracing::debug!("Deadline passed");
                (ErrorKind::Expired, "Expired".to_string())
            }

            AppError::Encryption(msg) => {
                tracing::error!("Encryption error: {}", msg);
                (ErrorKind::Internal, "Encryption error".to_string())
            }

            AppError::Decryption => {
                tracing::warn!("Decryption failed");
                (ErrorKind::Decryption, "Decryption failed".to_string())
            }

            AppError::MissingData(col) => {
                tracing::error!("Missing data: {}", col);
                (ErrorKind::Internal, "Internal server error".to_string())
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (ErrorKind::Internal, "Internal server error".to_string())
            }
        }
    }
}
