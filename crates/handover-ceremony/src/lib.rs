//! Handover Ceremony - Layer 4
//!
//! The step-confirmation state machine and its authorization rules.
//!
//! # Architecture
//!
//! - `ParticipantRegistry`: admits participants under a credential code
//! - `StepConfirmationEngine`: validates and records step confirmations and
//!   derives ceremony progress
//! - `LifecycleController`: whole-run reset and host delegation
//! - `CeremonyService`: facade exposing the operation table to transports
//!
//! All components share one `CeremonyStore` (typed access to the key-value
//! collaborator) and one read-only `CeremonyCatalog`. There are no locks and
//! no transactions: concurrent confirmations of the same step are
//! last-writer-wins, and the cached ceremony state may briefly lag until the
//! next `get_progress`, which always re-derives it from the step records.

#![forbid(unsafe_code)]

pub mod confirmation;
pub mod lifecycle;
pub mod registry;
pub mod service;
pub mod store;

pub use confirmation::{ConfirmStep, ReconfirmPolicy, StepConfirmationEngine};
pub use lifecycle::LifecycleController;
pub use registry::ParticipantRegistry;
pub use service::{CeremonyConfig, CeremonyService};
pub use store::CeremonyStore;
