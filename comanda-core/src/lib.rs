pub mod billing;
pub mod tenant;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Boxed error type used across repository and adapter seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
