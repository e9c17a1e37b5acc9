//! Error types for the amps-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// and gives the CLI a single error interface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Param file error: {0}")]
    Param(String),

    #[error("Physics error: {0}")]
    Physics(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Submission blocked: {errors} check(s) failed")]
    SubmissionBlocked { errors: usize },

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for amps-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<amps_config::ConfigError> for AppError {
    fn from(err: amps_config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<amps_config::FieldError> for AppError {
    fn from(err: amps_config::FieldError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<amps_param::ParamError> for AppError {
    fn from(err: amps_param::ParamError) -> Self {
        match err {
            amps_param::ParamError::Blocked { errors } => AppError::SubmissionBlocked { errors },
            other => AppError::Param(other.to_string()),
        }
    }
}

impl From<amps_physics::PhysicsError> for AppError {
    fn from(err: amps_physics::PhysicsError) -> Self {
        AppError::Physics(err.to_string())
    }
}

impl From<amps_core::AmpsError> for AppError {
    fn from(err: amps_core::AmpsError) -> Self {
        AppError::Physics(err.to_string())
    }
}
