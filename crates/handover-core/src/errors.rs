//! Error taxonomy for ceremony operations
//!
//! Every ceremony operation either returns its declared result or fails with
//! exactly one `CeremonyError`. Transports map `ErrorKind` to their own
//! status codes; that mapping does not live here.

use crate::effects::StorageError;
use crate::role::Role;

/// Fieldless classification of a [`CeremonyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Credential code not present in the static table
    InvalidCredential,
    /// Step id outside `[1, total_steps]` or not an integer
    InvalidStep,
    /// Caller is neither the administrator nor responsible for the step
    Forbidden,
    /// Step id in range but missing from the catalog
    StepNotFound,
    /// Step already confirmed and re-confirmation is rejected by policy
    AlreadyCompleted,
    /// Persistence collaborator failed
    AdapterFailure,
}

/// Error returned by ceremony operations
#[derive(Debug, thiserror::Error)]
pub enum CeremonyError {
    /// Unknown credential code
    #[error("Invalid credential: {code}")]
    InvalidCredential {
        /// The normalized code that failed lookup
        code: String,
    },

    /// Step id is not a valid position in the catalog
    #[error("Invalid step id: {raw}")]
    InvalidStep {
        /// The raw step id as supplied by the caller
        raw: String,
    },

    /// Caller is not authorized for the requested action
    #[error("Forbidden: {reason}")]
    Forbidden {
        /// Role the caller resolved to
        role: Role,
        /// Why the action was refused
        reason: String,
    },

    /// Step id in range but not found in the catalog
    #[error("Step not found: {step_id}")]
    StepNotFound {
        /// The step id that failed lookup
        step_id: u8,
    },

    /// Step already confirmed
    #[error("Step {step_id} already completed by {completed_by}")]
    AlreadyCompleted {
        /// The step that was already confirmed
        step_id: u8,
        /// Code recorded on the existing confirmation
        completed_by: String,
    },

    /// Persistence collaborator failure, propagated without retry
    #[error("Storage adapter failure: {0}")]
    Adapter(#[from] StorageError),
}

impl CeremonyError {
    /// Create an invalid credential error
    pub fn invalid_credential(code: impl Into<String>) -> Self {
        Self::InvalidCredential { code: code.into() }
    }

    /// Create an invalid step error
    pub fn invalid_step(raw: impl ToString) -> Self {
        Self::InvalidStep {
            raw: raw.to_string(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(role: Role, reason: impl Into<String>) -> Self {
        Self::Forbidden {
            role,
            reason: reason.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCredential { .. } => ErrorKind::InvalidCredential,
            Self::InvalidStep { .. } => ErrorKind::InvalidStep,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::StepNotFound { .. } => ErrorKind::StepNotFound,
            Self::AlreadyCompleted { .. } => ErrorKind::AlreadyCompleted,
            Self::Adapter(_) => ErrorKind::AdapterFailure,
        }
    }
}

/// Standard result type for ceremony operations
pub type CeremonyResult<T> = std::result::Result<T, CeremonyError>;

/// Configuration and catalog loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read config file {path}: {reason}")]
    Read {
        /// Path that was being read
        path: String,
        /// Underlying I/O failure
        reason: String,
    },

    /// Configuration text could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Configuration parsed but violates a catalog or policy constraint
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create an invalid configuration error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            CeremonyError::invalid_credential("NOPE").kind(),
            ErrorKind::InvalidCredential
        );
        assert_eq!(CeremonyError::invalid_step(9).kind(), ErrorKind::InvalidStep);
        assert_eq!(
            CeremonyError::forbidden(Role::Outgoing, "not responsible").kind(),
            ErrorKind::Forbidden
        );
        let adapter = CeremonyError::from(StorageError::Unavailable("down".into()));
        assert_eq!(adapter.kind(), ErrorKind::AdapterFailure);
    }

    #[test]
    fn test_error_display() {
        let err = CeremonyError::invalid_step("abc");
        assert_eq!(err.to_string(), "Invalid step id: abc");

        let err = CeremonyError::AlreadyCompleted {
            step_id: 2,
            completed_by: "SL2026".into(),
        };
        assert_eq!(err.to_string(), "Step 2 already completed by SL2026");
    }
}
