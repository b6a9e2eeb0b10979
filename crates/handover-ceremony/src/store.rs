//! Typed access to the key-value collaborator
//!
//! Maps ceremony records onto the key layout in `handover_core::keys` and
//! converts between JSON values and the typed records. A value that no longer
//! decodes is reported as a storage failure rather than skipped.

use handover_core::effects::{StorageEffects, StorageError};
use handover_core::keys::{self, HOST_KEY, PARTICIPANT_PREFIX, RESET_PREFIXES, STATE_KEY};
use handover_core::{CeremonyResult, CeremonyState, Participant, Role, StepCompletion, StepId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Ceremony repository over an opaque key-value store
#[derive(Clone)]
pub struct CeremonyStore {
    storage: Arc<dyn StorageEffects>,
}

impl CeremonyStore {
    /// Wrap a storage handler
    pub fn new(storage: Arc<dyn StorageEffects>) -> Self {
        Self { storage }
    }

    /// Name of the underlying backend
    pub fn backend_type(&self) -> &'static str {
        self.storage.backend_type()
    }

    async fn load<T>(&self, key: &str) -> CeremonyResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.storage.get(key).await? {
            Some(value) => {
                let decoded = serde_json::from_value(value).map_err(|e| {
                    StorageError::Serialization(format!("Failed to decode {key}: {e}"))
                })?;
                Ok(Some(decoded))
            }
            None => Ok(None),
        }
    }

    async fn save<T>(&self, key: &str, record: &T) -> CeremonyResult<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let value = serde_json::to_value(record).map_err(StorageError::from)?;
        self.storage.set(key, value).await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Participants
    // -------------------------------------------------------------------------

    /// Participant registered under a normalized code
    pub async fn participant(&self, code: &str) -> CeremonyResult<Option<Participant>> {
        self.load(&keys::participant_key(code)).await
    }

    /// Store a participant record keyed by its code
    pub async fn put_participant(&self, participant: &Participant) -> CeremonyResult<()> {
        self.save(&keys::participant_key(&participant.code), participant)
            .await
    }

    /// Every registered participant, administrator included, in code order
    pub async fn participants(&self) -> CeremonyResult<Vec<Participant>> {
        let entries = self.storage.get_by_prefix(PARTICIPANT_PREFIX).await?;
        let mut participants = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let participant: Participant = serde_json::from_value(value).map_err(|e| {
                StorageError::Serialization(format!("Failed to decode {key}: {e}"))
            })?;
            participants.push(participant);
        }
        Ok(participants)
    }

    // -------------------------------------------------------------------------
    // Step completions
    // -------------------------------------------------------------------------

    /// Completion record for one step; pending if never written
    pub async fn step_completion(&self, id: StepId) -> CeremonyResult<StepCompletion> {
        Ok(self.load(&keys::step_key(id)).await?.unwrap_or_default())
    }

    /// Overwrite the completion record for one step
    pub async fn put_step_completion(
        &self,
        id: StepId,
        completion: &StepCompletion,
    ) -> CeremonyResult<()> {
        self.save(&keys::step_key(id), completion).await
    }

    /// Completion records for steps `1..=total_steps`, in id order
    pub async fn step_completions(&self, total_steps: usize) -> CeremonyResult<Vec<StepCompletion>> {
        let mut completions = Vec::with_capacity(total_steps);
        for id in StepId::all(total_steps) {
            completions.push(self.step_completion(id).await?);
        }
        Ok(completions)
    }

    // -------------------------------------------------------------------------
    // Ceremony-level records
    // -------------------------------------------------------------------------

    /// Cached aggregate state, if one was written
    pub async fn cached_state(&self) -> CeremonyResult<Option<CeremonyState>> {
        self.load(STATE_KEY).await
    }

    /// Replace the cached aggregate state
    pub async fn put_state(&self, state: &CeremonyState) -> CeremonyResult<()> {
        self.save(STATE_KEY, state).await
    }

    /// Delegated host role, if any
    pub async fn host_role(&self) -> CeremonyResult<Option<Role>> {
        self.load(HOST_KEY).await
    }

    /// Replace the delegated host role
    pub async fn put_host_role(&self, role: Role) -> CeremonyResult<()> {
        self.save(HOST_KEY, &role).await
    }

    /// Delete every participant and ceremony record; returns how many were removed
    pub async fn clear(&self) -> CeremonyResult<usize> {
        let mut removed = 0;
        for prefix in RESET_PREFIXES {
            removed += self.storage.delete_by_prefix(prefix).await?;
        }
        Ok(removed)
    }
}

impl std::fmt::Debug for CeremonyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CeremonyStore")
            .field("backend", &self.backend_type())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use handover_effects::MemoryStorageHandler;
    use serde_json::json;

    #[tokio::test]
    async fn test_records_land_on_documented_keys() {
        let storage = Arc::new(MemoryStorageHandler::new());
        let store = CeremonyStore::new(storage.clone());
        let step = StepId::new(3, 4).unwrap();

        store
            .put_step_completion(step, &StepCompletion::confirmed("OUT2026", Utc::now(), None))
            .await
            .unwrap();
        store.put_state(&CeremonyState::derive(1, 4)).await.unwrap();
        store.put_host_role(Role::Incoming).await.unwrap();

        assert!(storage.get("ceremony:step:3").await.unwrap().is_some());
        assert_eq!(
            storage.get("ceremony:state").await.unwrap(),
            Some(json!({"currentStep": 2, "isComplete": false}))
        );
        assert_eq!(storage.get("ceremony:host").await.unwrap(), Some(json!("incoming")));

        assert_eq!(store.clear().await.unwrap(), 3);
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_missing_step_reads_as_pending() {
        let store = CeremonyStore::new(Arc::new(MemoryStorageHandler::new()));
        let completions = store.step_completions(4).await.unwrap();
        assert_eq!(completions, vec![StepCompletion::pending(); 4]);
        assert_eq!(store.cached_state().await.unwrap(), None);
    }
}
