//! Persisted key layout
//!
//! ```text
//! participant:<CODE>      -> Participant
//! ceremony:step:<id>      -> StepCompletion   (id in 1..=4)
//! ceremony:state          -> CeremonyState    (cache, re-derivable)
//! ceremony:host           -> Role             (delegated host)
//! ```
//!
//! A prefix delete over [`PARTICIPANT_PREFIX`] and [`CEREMONY_PREFIX`] clears a run.

use crate::types::StepId;

/// Prefix shared by every participant record
pub const PARTICIPANT_PREFIX: &str = "participant:";

/// Prefix shared by every ceremony record
pub const CEREMONY_PREFIX: &str = "ceremony:";

/// Cached aggregate state
pub const STATE_KEY: &str = "ceremony:state";

/// Delegated host role
pub const HOST_KEY: &str = "ceremony:host";

/// Prefixes removed by a whole-run reset, in deletion order.
///
/// Ceremony records go first: a reset interrupted between the two deletes
/// leaves a roster with no progress, never completed steps with no roster.
pub const RESET_PREFIXES: [&str; 2] = [CEREMONY_PREFIX, PARTICIPANT_PREFIX];

/// Key of a participant record; `code` must already be normalized
pub fn participant_key(code: &str) -> String {
    format!("{PARTICIPANT_PREFIX}{code}")
}

/// Key of a step completion record
pub fn step_key(id: StepId) -> String {
    format!("{CEREMONY_PREFIX}step:{id}")
}
