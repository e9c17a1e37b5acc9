use thiserror::Error;

pub type AmpsResult<T> = Result<T, AmpsError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmpsError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
