//! Participant Registry
//!
//! Admits participants under a credential code and answers roster queries.
//! `register` is the only mutator and writes exactly one record.

use crate::store::CeremonyStore;
use handover_core::catalog::normalize_code;
use handover_core::effects::PhysicalTimeEffects;
use handover_core::{CeremonyCatalog, CeremonyResult, Participant, RosterStatus};
use std::sync::Arc;
use tracing::{debug, info};

/// Registry of participants for the current ceremony run
#[derive(Clone)]
pub struct ParticipantRegistry {
    catalog: Arc<CeremonyCatalog>,
    store: CeremonyStore,
    clock: Arc<dyn PhysicalTimeEffects>,
}

impl ParticipantRegistry {
    /// Create a registry over the shared catalog and store
    pub fn new(
        catalog: Arc<CeremonyCatalog>,
        store: CeremonyStore,
        clock: Arc<dyn PhysicalTimeEffects>,
    ) -> Self {
        Self {
            catalog,
            store,
            clock,
        }
    }

    /// Admit a participant under `code`.
    ///
    /// Re-registering a known code returns the stored record untouched, so a
    /// client that re-submits its code never resets `joined_at`.
    pub async fn register(&self, code: &str) -> CeremonyResult<Participant> {
        let credential = self.catalog.resolve(code)?;

        if let Some(existing) = self.store.participant(&credential.code).await? {
            debug!(code = %existing.code, "Participant already registered");
            return Ok(existing);
        }

        let participant = Participant {
            code: credential.code.clone(),
            name: credential.name.clone(),
            role: credential.role,
            label: credential.label.clone(),
            joined_at: self.clock.now().await,
            is_admin: credential.is_admin(),
        };
        self.store.put_participant(&participant).await?;

        info!(
            code = %participant.code,
            role = %participant.role,
            "Participant joined ceremony"
        );
        Ok(participant)
    }

    /// Registered participants, administrator excluded, in code order
    pub async fn list_participants(&self) -> CeremonyResult<Vec<Participant>> {
        let mut participants = self.store.participants().await?;
        participants.retain(|p| !p.is_admin);
        Ok(participants)
    }

    /// Direct lookup; unknown and unregistered codes both yield `None`
    pub async fn get_participant(&self, code: &str) -> CeremonyResult<Option<Participant>> {
        self.store.participant(&normalize_code(code)).await
    }

    /// Which responsible roles have joined and which are still awaited
    pub async fn roster_status(&self) -> CeremonyResult<RosterStatus> {
        let joined = self.list_participants().await?;
        let waiting_for: Vec<_> = self
            .catalog
            .responsible_roles()
            .filter(|role| !joined.iter().any(|p| p.role == *role))
            .collect();
        Ok(RosterStatus {
            ready: waiting_for.is_empty(),
            joined,
            waiting_for,
        })
    }
}
