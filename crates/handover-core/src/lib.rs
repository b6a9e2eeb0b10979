//! Handover Core - Layer 1
//!
//! Pure data model, error taxonomy and effect trait definitions for the
//! handover ceremony: a fixed four-step approval workflow in which every step
//! must be confirmed by the one role responsible for it (or by the
//! administrator).
//!
//! # Architecture
//!
//! - `catalog`: static credential table and step catalog, loaded once and shared
//! - `types`: participants, completion records and the derived ceremony state
//! - `effects`: what side effects the ceremony needs (storage, time); handlers
//!   live in `handover-effects`
//! - `keys`: the persisted key layout inside the key-value collaborator
//!
//! Nothing in this crate performs I/O.

#![forbid(unsafe_code)]

pub mod catalog;
pub mod effects;
pub mod errors;
pub mod keys;
pub mod role;
pub mod types;

pub use catalog::{CatalogConfig, CeremonyCatalog, CredentialEntry, StepDefinition, TOTAL_STEPS};
pub use errors::{CeremonyError, CeremonyResult, ConfigError, ErrorKind};
pub use role::Role;
pub use types::{
    CeremonyProgress, CeremonyState, CompletionReceipt, Participant, RosterStatus,
    StepCompletion, StepId, StepView,
};
