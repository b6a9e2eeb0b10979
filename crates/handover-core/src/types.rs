//! Ceremony data model
//!
//! Participants and step completion records are persisted; `CeremonyState` is
//! a materialized view that can always be re-derived from the completion
//! records alone.

use crate::catalog::StepDefinition;
use crate::errors::{CeremonyError, CeremonyResult};
use crate::role::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Step Identifier
// =============================================================================

/// One-based position of a step in the catalog.
///
/// Constructed through [`StepId::new`] or [`StepId::parse`], both of which
/// check the id against the catalog size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(u8);

impl StepId {
    /// Validate a raw integer step id against the number of catalog steps
    pub fn new(raw: i64, total_steps: usize) -> CeremonyResult<Self> {
        if raw < 1 || raw > total_steps as i64 {
            return Err(CeremonyError::invalid_step(raw));
        }
        u8::try_from(raw)
            .map(StepId)
            .map_err(|_| CeremonyError::invalid_step(raw))
    }

    /// Validate a textual step id; anything that is not an integer is rejected
    pub fn parse(raw: &str, total_steps: usize) -> CeremonyResult<Self> {
        let value: i64 = raw
            .trim()
            .parse()
            .map_err(|_| CeremonyError::invalid_step(raw))?;
        Self::new(value, total_steps)
    }

    /// Trusted constructor for ids baked into the built-in catalog
    pub(crate) const fn from_catalog(id: u8) -> Self {
        StepId(id)
    }

    /// Raw one-based value
    pub fn get(&self) -> u8 {
        self.0
    }

    /// Zero-based position in the catalog
    pub fn index(&self) -> usize {
        usize::from(self.0) - 1
    }

    /// Iterate `1..=total_steps` in catalog order
    pub fn all(total_steps: usize) -> impl Iterator<Item = StepId> {
        (1..=total_steps).filter_map(|id| u8::try_from(id).ok().map(StepId))
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Participant
// =============================================================================

/// A registrant admitted under one credential code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Uppercase credential code; unique per participant
    pub code: String,
    /// Display name from the credential table
    pub name: String,
    /// Role bound to the code
    pub role: Role,
    /// Display label from the credential table
    pub label: String,
    /// Set once, at first registration
    pub joined_at: DateTime<Utc>,
    /// True only for the administrator role
    #[serde(default)]
    pub is_admin: bool,
}

// =============================================================================
// Step Completion
// =============================================================================

/// Dynamic completion record for one step.
///
/// Always written whole; a pending record has no `completed_by` or
/// `completed_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepCompletion {
    /// Whether the step has been confirmed
    pub completed: bool,
    /// Code of the participant that confirmed the step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_by: Option<String>,
    /// When the step was confirmed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Role impersonated by the confirming administrator or host, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acting_as: Option<Role>,
}

impl StepCompletion {
    /// Record for a step nobody has confirmed yet
    pub fn pending() -> Self {
        Self::default()
    }

    /// Record for a confirmed step
    pub fn confirmed(
        completed_by: impl Into<String>,
        completed_at: DateTime<Utc>,
        acting_as: Option<Role>,
    ) -> Self {
        Self {
            completed: true,
            completed_by: Some(completed_by.into()),
            completed_at: Some(completed_at),
            acting_as,
        }
    }
}

// =============================================================================
// Ceremony State
// =============================================================================

/// Aggregate progress derived from the completion records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CeremonyState {
    /// Lowest pending step, or the last step once all are complete
    pub current_step: u8,
    /// True iff every step is complete
    pub is_complete: bool,
}

impl CeremonyState {
    /// State of a ceremony nobody has touched
    pub fn initial() -> Self {
        Self {
            current_step: 1,
            is_complete: false,
        }
    }

    /// `current_step = min(completed + 1, total)`, `is_complete = completed == total`
    pub fn derive(completed_count: usize, total_steps: usize) -> Self {
        let current = (completed_count + 1).min(total_steps).max(1);
        Self {
            current_step: u8::try_from(current).unwrap_or(u8::MAX),
            is_complete: total_steps > 0 && completed_count == total_steps,
        }
    }

    /// Derive the state from a full set of completion records
    pub fn from_completions(completions: &[StepCompletion]) -> Self {
        let completed = completions.iter().filter(|c| c.completed).count();
        Self::derive(completed, completions.len())
    }
}

impl Default for CeremonyState {
    fn default() -> Self {
        Self::initial()
    }
}

// =============================================================================
// Read Models
// =============================================================================

/// A catalog step merged with its completion record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepView {
    /// Static definition
    #[serde(flatten)]
    pub definition: StepDefinition,
    /// Dynamic completion status
    #[serde(flatten)]
    pub completion: StepCompletion,
}

impl StepView {
    /// Whether this step has been confirmed
    pub fn is_completed(&self) -> bool {
        self.completion.completed
    }
}

/// Full progress snapshot returned to polling callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CeremonyProgress {
    /// Every step in catalog order
    pub steps: Vec<StepView>,
    /// State derived from `steps`
    pub state: CeremonyState,
}

impl CeremonyProgress {
    /// Merge the catalog with completion records by position.
    ///
    /// Both sequences must be in ascending id order; a missing record is
    /// treated as pending.
    pub fn merge(definitions: &[StepDefinition], completions: Vec<StepCompletion>) -> Self {
        let mut completions = completions.into_iter();
        let steps: Vec<StepView> = definitions
            .iter()
            .map(|definition| StepView {
                definition: definition.clone(),
                completion: completions.next().unwrap_or_default(),
            })
            .collect();
        let completed = steps.iter().filter(|s| s.is_completed()).count();
        let state = CeremonyState::derive(completed, steps.len());
        Self { steps, state }
    }

    /// Look up a step view by id
    pub fn step(&self, id: StepId) -> Option<&StepView> {
        self.steps.get(id.index())
    }
}

/// Result of a successful step confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionReceipt {
    /// Step that was confirmed
    pub step_id: StepId,
    /// Code recorded as the confirmer
    pub completed_by: String,
    /// Timestamp that was persisted
    pub completed_at: DateTime<Utc>,
    /// Role impersonated, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acting_as: Option<Role>,
    /// Ceremony state recomputed after the write
    pub ceremony_state: CeremonyState,
}

/// Who has joined and which responsible roles are still missing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterStatus {
    /// Registered non-admin participants
    pub joined: Vec<Participant>,
    /// Step-responsible roles with no registered participant, in step order
    pub waiting_for: Vec<Role>,
    /// True once every responsible role has joined
    pub ready: bool,
}
