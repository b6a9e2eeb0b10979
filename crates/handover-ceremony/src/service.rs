//! Ceremony Service
//!
//! Facade over the registry, confirmation engine and lifecycle controller.
//! Transports (the CLI, an HTTP layer, tests) call this type only; each method
//! is one entry of the operation table.
//!
//! # Architecture
//!
//! The catalog is built once by the caller and shared read-only. Storage and
//! time arrive as effect handlers, so the same service runs against the
//! in-memory map in tests and the filesystem store in deployment.

use crate::confirmation::{ConfirmStep, ReconfirmPolicy, StepConfirmationEngine};
use crate::lifecycle::LifecycleController;
use crate::registry::ParticipantRegistry;
use crate::store::CeremonyStore;
use handover_core::effects::{PhysicalTimeEffects, StorageEffects};
use handover_core::{
    CeremonyCatalog, CeremonyProgress, CeremonyResult, CeremonyState, CompletionReceipt,
    Participant, Role, RosterStatus,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// =============================================================================
// Service Configuration
// =============================================================================

/// `[policy]` configuration section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CeremonyConfig {
    /// Behavior when a completed step is confirmed again
    #[serde(default)]
    pub reconfirm: ReconfirmPolicy,
}

// =============================================================================
// Ceremony Service
// =============================================================================

/// Entry point for every ceremony operation
#[derive(Clone)]
pub struct CeremonyService {
    catalog: Arc<CeremonyCatalog>,
    registry: ParticipantRegistry,
    engine: StepConfirmationEngine,
    lifecycle: LifecycleController,
}

impl CeremonyService {
    /// Wire the components over one catalog, storage handler and clock
    pub fn new(
        catalog: Arc<CeremonyCatalog>,
        storage: Arc<dyn StorageEffects>,
        clock: Arc<dyn PhysicalTimeEffects>,
        config: CeremonyConfig,
    ) -> Self {
        let store = CeremonyStore::new(storage);
        tracing::debug!(
            backend = store.backend_type(),
            reconfirm = ?config.reconfirm,
            "Ceremony service initialized"
        );
        Self {
            registry: ParticipantRegistry::new(catalog.clone(), store.clone(), clock.clone()),
            engine: StepConfirmationEngine::new(
                catalog.clone(),
                store.clone(),
                clock,
                config.reconfirm,
            ),
            lifecycle: LifecycleController::new(catalog.clone(), store),
            catalog,
        }
    }

    /// Shared read-only catalog
    pub fn catalog(&self) -> &CeremonyCatalog {
        &self.catalog
    }

    // -------------------------------------------------------------------------
    // Participants
    // -------------------------------------------------------------------------

    /// Registered participants, administrator excluded
    #[tracing::instrument(skip(self))]
    pub async fn list_participants(&self) -> CeremonyResult<Vec<Participant>> {
        self.registry.list_participants().await
    }

    /// Idempotent join under a credential code
    #[tracing::instrument(skip(self))]
    pub async fn register(&self, code: &str) -> CeremonyResult<Participant> {
        self.registry.register(code).await
    }

    /// Direct participant lookup
    #[tracing::instrument(skip(self))]
    pub async fn get_participant(&self, code: &str) -> CeremonyResult<Option<Participant>> {
        self.registry.get_participant(code).await
    }

    /// Joined participants and the roles still awaited
    #[tracing::instrument(skip(self))]
    pub async fn roster_status(&self) -> CeremonyResult<RosterStatus> {
        self.registry.roster_status().await
    }

    // -------------------------------------------------------------------------
    // Steps
    // -------------------------------------------------------------------------

    /// Step views and the state re-derived from them
    #[tracing::instrument(skip(self))]
    pub async fn get_progress(&self) -> CeremonyResult<CeremonyProgress> {
        self.engine.get_progress().await
    }

    /// Confirm one step
    #[tracing::instrument(
        skip(self, request),
        fields(step = request.step_id, code = %request.participant_code, acting_as = ?request.acting_as)
    )]
    pub async fn complete_step(&self, request: ConfirmStep) -> CeremonyResult<CompletionReceipt> {
        self.engine.complete_step(request).await
    }

    /// Last persisted ceremony state; may lag `get_progress`
    #[tracing::instrument(skip(self))]
    pub async fn cached_state(&self) -> CeremonyResult<CeremonyState> {
        self.engine.cached_state().await
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Clear the whole run
    #[tracing::instrument(skip(self))]
    pub async fn reset(&self) -> CeremonyResult<()> {
        self.lifecycle.reset().await
    }

    /// Designate the host role
    #[tracing::instrument(skip(self))]
    pub async fn delegate_host(&self, admin_code: &str, role: Role) -> CeremonyResult<()> {
        self.lifecycle.delegate_host(admin_code, role).await
    }

    /// Currently delegated host role
    #[tracing::instrument(skip(self))]
    pub async fn host_role(&self) -> CeremonyResult<Option<Role>> {
        self.lifecycle.host_role().await
    }
}
