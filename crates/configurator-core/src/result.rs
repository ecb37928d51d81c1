//! Convenience result type alias for the Configurator host.

use crate::error::AppError;

/// A specialized `Result` type for Configurator operations.
pub type AppResult<T> = Result<T, AppError>;
