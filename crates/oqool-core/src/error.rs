//! Unified Error Model
use thiserror::Error;

pub type OqoolResult<T> = Result<T, OqoolError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OqoolError {
    /// Missing, unknown, revoked or expired credential. Never says which.
    #[error("AUTH/{0}")]
    Auth(String),

    /// Structurally malformed request; carries one message per failed field.
    #[error("VALIDATION/{}", .0.join("; "))]
    Validation(Vec<String>),

    /// The underlying operation ran and failed (not found, permission denied, ...).
    #[error("EXEC/{0}")]
    Execution(String),

    /// Categorically disallowed operation (shell execution, git mutation).
    #[error("POLICY/{0}")]
    Policy(String),
}

impl OqoolError {
    /// Human-readable message without the category prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Auth(msg)
            | Self::Execution(msg)
            | Self::Policy(msg) => msg.clone(),
            Self::Validation(errors) => errors.join("; "),
        }
    }
}
