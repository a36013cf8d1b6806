use thiserror::Error;

/// Centralized error types for the application
///
/// Fallible operations inside handlers converge on this enum so the
/// dispatcher sees a single error type. Uses `thiserror` for conversions
/// and display formatting.
#[derive(Error, Debug)]
pub enum AppError {
    /// Database errors
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database connection pool errors
    #[error("database pool error: {0}")]
    DatabasePool(#[from] r2d2::Error),

    /// Telegram API errors
    #[error("telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
