//! Physics derivation errors.

use amps_core::AmpsError;
use thiserror::Error;

/// Result type for physics derivations.
pub type PhysicsResult<T> = Result<T, PhysicsError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Charge state of zero has no rigidity.
    #[error("Charge state must be non-zero")]
    ZeroCharge,

    /// Non-physical values (negative mass, energy, etc.).
    #[error("Non-physical value for {what}: {value}")]
    NonPhysical { what: &'static str, value: f64 },

    /// Closed form is not available for this model.
    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    #[error(transparent)]
    Core(#[from] AmpsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PhysicsError::NonPhysical {
            what: "mass",
            value: -1.0,
        };
        assert!(err.to_string().contains("mass"));

        let err: PhysicsError = AmpsError::InvalidArg { what: "bounds" }.into();
        assert!(err.to_string().contains("bounds"));
    }
}
