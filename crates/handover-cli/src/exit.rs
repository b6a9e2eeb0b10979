//! Process exit codes
//!
//! | code | meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | success                                   |
//! | 1    | any other failure                         |
//! | 2    | bad request (credential, step, re-confirm)|
//! | 3    | forbidden                                 |
//! | 4    | step not found                            |
//! | 5    | storage adapter failure                   |
//! | 78   | configuration error (`EX_CONFIG`)         |

use handover_core::{CeremonyError, ConfigError, ErrorKind};

/// Exit code for a generic failure
pub const FAILURE: u8 = 1;

/// Exit code for configuration errors
pub const CONFIG: u8 = 78;

/// Exit code for a ceremony error kind
pub fn for_kind(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::InvalidCredential | ErrorKind::InvalidStep | ErrorKind::AlreadyCompleted => 2,
        ErrorKind::Forbidden => 3,
        ErrorKind::StepNotFound => 4,
        ErrorKind::AdapterFailure => 5,
    }
}

/// Exit code for any error returned by a command
pub fn for_error(err: &anyhow::Error) -> u8 {
    if let Some(ceremony) = err.downcast_ref::<CeremonyError>() {
        return for_kind(ceremony.kind());
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return CONFIG;
    }
    FAILURE
}
