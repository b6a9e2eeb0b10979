//! Step Confirmation Engine
//!
//! Validates and records step confirmations and derives ceremony progress.
//!
//! Each step moves one way, `pending -> completed`; only a whole-run reset
//! returns it to pending. The current step is informational: confirming step 3
//! before step 2 is allowed as long as the caller is authorized for step 3.

use crate::store::CeremonyStore;
use handover_core::effects::PhysicalTimeEffects;
use handover_core::{
    CeremonyCatalog, CeremonyError, CeremonyProgress, CeremonyResult, CeremonyState,
    CompletionReceipt, CredentialEntry, Role, StepCompletion, StepDefinition, StepId,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What to do when an authorized caller confirms a step that is already complete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconfirmPolicy {
    /// Replace `completedBy`/`completedAt` with the new confirmation
    #[default]
    Overwrite,
    /// Fail with `AlreadyCompleted` and leave the record untouched
    Reject,
}

/// A request to confirm one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmStep {
    /// Raw step id as received from the transport
    pub step_id: i64,
    /// Credential code of the caller
    pub participant_code: String,
    /// Role the caller impersonates, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acting_as: Option<Role>,
}

impl ConfirmStep {
    /// Confirm `step_id` as the role bound to `participant_code`
    pub fn new(step_id: i64, participant_code: impl Into<String>) -> Self {
        Self {
            step_id,
            participant_code: participant_code.into(),
            acting_as: None,
        }
    }

    /// Confirm on behalf of `role`
    pub fn acting_as(mut self, role: Role) -> Self {
        self.acting_as = Some(role);
        self
    }
}

/// Records step confirmations against the catalog
#[derive(Clone)]
pub struct StepConfirmationEngine {
    catalog: Arc<CeremonyCatalog>,
    store: CeremonyStore,
    clock: Arc<dyn PhysicalTimeEffects>,
    policy: ReconfirmPolicy,
}

impl StepConfirmationEngine {
    /// Create an engine with the given re-confirmation policy
    pub fn new(
        catalog: Arc<CeremonyCatalog>,
        store: CeremonyStore,
        clock: Arc<dyn PhysicalTimeEffects>,
        policy: ReconfirmPolicy,
    ) -> Self {
        Self {
            catalog,
            store,
            clock,
            policy,
        }
    }

    /// Catalog merged with the current completion records.
    ///
    /// The state is always re-derived from the records; the cached state is
    /// never consulted.
    pub async fn get_progress(&self) -> CeremonyResult<CeremonyProgress> {
        let completions = self
            .store
            .step_completions(self.catalog.total_steps())
            .await?;
        Ok(CeremonyProgress::merge(self.catalog.steps(), completions))
    }

    /// Persisted state, or the initial state if none was written
    pub async fn cached_state(&self) -> CeremonyResult<CeremonyState> {
        Ok(self.store.cached_state().await?.unwrap_or_default())
    }

    /// Confirm a step.
    ///
    /// Every validation and read runs before the single step write, so a
    /// failed request leaves storage unchanged. Once the step record is
    /// written the call succeeds; a failed refresh of the cached state is
    /// logged and healed by the next confirmation.
    pub async fn complete_step(&self, request: ConfirmStep) -> CeremonyResult<CompletionReceipt> {
        let total_steps = self.catalog.total_steps();
        let step_id = StepId::new(request.step_id, total_steps)?;
        let caller = self.catalog.resolve(&request.participant_code)?;
        let step = self.catalog.step(step_id)?;

        let effective_role = self.effective_role(caller, request.acting_as).await?;
        authorize(effective_role, step)?;

        let mut completions = self.store.step_completions(total_steps).await?;
        if self.policy == ReconfirmPolicy::Reject {
            let existing = &completions[step_id.index()];
            if existing.completed {
                let completed_by = existing.completed_by.clone().unwrap_or_default();
                debug!(step = %step_id, %completed_by, "Rejecting re-confirmation");
                return Err(CeremonyError::AlreadyCompleted {
                    step_id: step_id.get(),
                    completed_by,
                });
            }
        }

        let completed_at = self.clock.now().await;
        let completion =
            StepCompletion::confirmed(caller.code.clone(), completed_at, request.acting_as);
        self.store.put_step_completion(step_id, &completion).await?;
        completions[step_id.index()] = completion;

        let ceremony_state = match self.refresh_state().await {
            Ok(state) => state,
            Err(err) => {
                warn!(step = %step_id, error = %err, "Failed to refresh cached ceremony state");
                CeremonyState::from_completions(&completions)
            }
        };

        info!(
            step = %step_id,
            code = %caller.code,
            role = %effective_role,
            current_step = ceremony_state.current_step,
            is_complete = ceremony_state.is_complete,
            "Step confirmed"
        );

        Ok(CompletionReceipt {
            step_id,
            completed_by: caller.code.clone(),
            completed_at,
            acting_as: request.acting_as,
            ceremony_state,
        })
    }

    async fn effective_role(
        &self,
        caller: &CredentialEntry,
        acting_as: Option<Role>,
    ) -> CeremonyResult<Role> {
        let Some(role) = acting_as else {
            return Ok(caller.role);
        };

        if role.is_admin() {
            return Err(CeremonyError::forbidden(
                caller.role,
                "cannot act as the administrator",
            ));
        }
        if caller.is_admin() || role == caller.role {
            return Ok(role);
        }

        match self.store.host_role().await? {
            Some(host) if host == caller.role => Ok(role),
            _ => {
                warn!(code = %caller.code, acting_as = %role, "Impersonation refused");
                Err(CeremonyError::forbidden(
                    caller.role,
                    "only the administrator or the delegated host may act as another role",
                ))
            }
        }
    }

    /// Re-read every record rather than incrementing: a concurrent
    /// confirmation may have landed since the records were first read.
    async fn refresh_state(&self) -> CeremonyResult<CeremonyState> {
        let completions = self
            .store
            .step_completions(self.catalog.total_steps())
            .await?;
        let state = CeremonyState::from_completions(&completions);
        self.store.put_state(&state).await?;
        Ok(state)
    }
}

fn authorize(role: Role, step: &StepDefinition) -> CeremonyResult<()> {
    if role.is_admin() || role == step.responsible_role {
        Ok(())
    } else {
        Err(CeremonyError::forbidden(role, "not responsible for this step"))
    }
}
