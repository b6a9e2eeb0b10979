//! Ceremony Lifecycle Controller
//!
//! Whole-run reset and host delegation. Who may call `reset` is decided by
//! the calling layer; the controller itself never refuses it.

use crate::store::CeremonyStore;
use handover_core::{CeremonyCatalog, CeremonyError, CeremonyResult, Role};
use std::sync::Arc;
use tracing::info;

/// Controls the ceremony run as a whole
#[derive(Clone)]
pub struct LifecycleController {
    catalog: Arc<CeremonyCatalog>,
    store: CeremonyStore,
}

impl LifecycleController {
    /// Create a controller over the shared catalog and store
    pub fn new(catalog: Arc<CeremonyCatalog>, store: CeremonyStore) -> Self {
        Self { catalog, store }
    }

    /// Delete every participant, completion record, cached state and host
    /// delegation. Not reversible.
    pub async fn reset(&self) -> CeremonyResult<()> {
        let removed = self.store.clear().await?;
        info!(removed, "Ceremony reset");
        Ok(())
    }

    /// Let the administrator designate one non-admin role as host
    pub async fn delegate_host(&self, admin_code: &str, role: Role) -> CeremonyResult<()> {
        let caller = self.catalog.resolve(admin_code)?;
        if !caller.is_admin() {
            return Err(CeremonyError::forbidden(
                caller.role,
                "only the administrator may delegate the host role",
            ));
        }
        if role.is_admin() {
            return Err(CeremonyError::forbidden(
                caller.role,
                "the host must be a non-admin role",
            ));
        }

        self.store.put_host_role(role).await?;
        info!(host = %role, "Host role delegated");
        Ok(())
    }

    /// Currently delegated host role
    pub async fn host_role(&self) -> CeremonyResult<Option<Role>> {
        self.store.host_role().await
    }
}
