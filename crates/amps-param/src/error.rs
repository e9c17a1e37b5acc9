//! Param file errors.

use amps_config::FieldError;

pub type ParamResult<T> = Result<T, ParamError>;

#[derive(thiserror::Error, Debug)]
pub enum ParamError {
    #[error("Line {line}: entry '{key}' appears before any #SECTION header")]
    OutsideSection { line: usize, key: String },

    #[error("Line {line}: content after #END")]
    AfterEnd { line: usize },

    #[error("Missing section #{section}")]
    MissingSection { section: String },

    #[error("Missing key {key} in #{section}")]
    MissingKey { section: String, key: String },

    #[error("Invalid value for {key} in #{section}: '{value}' ({reason})")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    #[error("Submission blocked by {errors} failing check(s)")]
    Blocked { errors: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
