//! Static ceremony configuration
//!
//! The credential table (code → role) and the step catalog are loaded once at
//! process start, validated, and then shared read-only (`Arc<CeremonyCatalog>`)
//! by every ceremony component.

use crate::errors::{CeremonyError, CeremonyResult, ConfigError};
use crate::role::Role;
use crate::types::StepId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Number of steps in a ceremony
pub const TOTAL_STEPS: usize = 4;

/// Static definition of one ceremony step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDefinition {
    /// One-based position; defines ceremony order
    pub id: StepId,
    /// Short title
    pub title: String,
    /// What confirming this step means
    pub description: String,
    /// The one role allowed to confirm this step (besides the administrator)
    #[serde(alias = "responsible_role")]
    pub responsible_role: Role,
}

/// One row of the credential table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialEntry {
    /// Bearer code, assigned out of band
    pub code: String,
    /// Display name
    pub name: String,
    /// Role the code acts as
    pub role: Role,
    /// Display label
    pub label: String,
}

impl CredentialEntry {
    fn new(code: &str, name: &str, role: Role, label: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            role,
            label: label.to_string(),
        }
    }

    /// Whether this credential belongs to the administrator
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Serialized catalog, as it appears in the `[catalog]` configuration section.
///
/// Either table may be omitted; an omitted table falls back to the built-in one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Credential table rows
    #[serde(default)]
    pub credentials: Vec<CredentialEntry>,
    /// Step catalog, in ascending id order
    #[serde(default)]
    pub steps: Vec<StepDefinition>,
}

/// Validated, immutable credential table and step catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CeremonyCatalog {
    credentials: BTreeMap<String, CredentialEntry>,
    steps: Vec<StepDefinition>,
}

impl CeremonyCatalog {
    /// The built-in leadership handover catalog
    pub fn builtin() -> Self {
        let config = CatalogConfig {
            credentials: builtin_credentials(),
            steps: builtin_steps(),
        };
        let credentials = config
            .credentials
            .into_iter()
            .map(|entry| (entry.code.clone(), entry))
            .collect();
        Self {
            credentials,
            steps: config.steps,
        }
    }

    /// Build a catalog from configuration, filling omitted tables with the
    /// built-in ones, and validate it
    pub fn from_config(config: CatalogConfig) -> Result<Self, ConfigError> {
        let entries = if config.credentials.is_empty() {
            builtin_credentials()
        } else {
            config.credentials
        };
        let steps = if config.steps.is_empty() {
            builtin_steps()
        } else {
            config.steps
        };

        let mut credentials = BTreeMap::new();
        for mut entry in entries {
            let code = normalize_code(&entry.code);
            if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ConfigError::invalid(format!(
                    "credential code {:?} must be non-empty ASCII alphanumeric",
                    entry.code
                )));
            }
            entry.code = code.clone();
            if credentials.insert(code.clone(), entry).is_some() {
                return Err(ConfigError::invalid(format!(
                    "duplicate credential code {code}"
                )));
            }
        }

        let catalog = Self { credentials, steps };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse a standalone catalog document
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: CatalogConfig = toml::from_str(text)?;
        Self::from_config(config)
    }

    /// Check the structural invariants of the catalog
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps.len() != TOTAL_STEPS {
            return Err(ConfigError::invalid(format!(
                "step catalog must have exactly {TOTAL_STEPS} entries, found {}",
                self.steps.len()
            )));
        }

        let mut responsible = BTreeSet::new();
        for (position, step) in self.steps.iter().enumerate() {
            if usize::from(step.id.get()) != position + 1 {
                return Err(ConfigError::invalid(format!(
                    "step ids must be dense and ascending from 1; position {} has id {}",
                    position + 1,
                    step.id
                )));
            }
            if step.responsible_role.is_admin() {
                return Err(ConfigError::invalid(format!(
                    "step {} cannot be assigned to the admin role",
                    step.id
                )));
            }
            if !responsible.insert(step.responsible_role) {
                return Err(ConfigError::invalid(format!(
                    "role {} is responsible for more than one step",
                    step.responsible_role
                )));
            }
            if !self.credentials.values().any(|c| c.role == step.responsible_role) {
                return Err(ConfigError::invalid(format!(
                    "no credential acts as {}, so step {} could never be confirmed by its role",
                    step.responsible_role, step.id
                )));
            }
        }
        Ok(())
    }

    /// Resolve a credential code, case-insensitively
    pub fn resolve(&self, code: &str) -> CeremonyResult<&CredentialEntry> {
        let normalized = normalize_code(code);
        self.credentials
            .get(&normalized)
            .ok_or(CeremonyError::InvalidCredential { code: normalized })
    }

    /// Step catalog in ascending id order
    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    /// Number of steps in the catalog
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Look up one step definition
    pub fn step(&self, id: StepId) -> CeremonyResult<&StepDefinition> {
        self.steps
            .get(id.index())
            .filter(|step| step.id == id)
            .ok_or(CeremonyError::StepNotFound { step_id: id.get() })
    }

    /// Responsible roles in step order
    pub fn responsible_roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.steps.iter().map(|step| step.responsible_role)
    }
}

impl Default for CeremonyCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Credential codes are matched case-insensitively and stored uppercase
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

fn builtin_credentials() -> Vec<CredentialEntry> {
    vec![
        CredentialEntry::new("ADV2026", "Ms. Justin", Role::Advisor, "Club Advisor"),
        CredentialEntry::new(
            "SL2026",
            "Ms. Shazrina",
            Role::StudentLife,
            "Student Life Representative",
        ),
        CredentialEntry::new("OUT2026", "Hasin", Role::Outgoing, "Outgoing Vice President"),
        CredentialEntry::new("INC2026", "Umar", Role::Incoming, "Incoming President"),
        CredentialEntry::new("ADMIN2026", "Admin", Role::Admin, "Super User"),
    ]
}

fn builtin_steps() -> Vec<StepDefinition> {
    let step = |id: u8, title: &str, description: &str, role: Role| StepDefinition {
        id: StepId::from_catalog(id),
        title: title.to_string(),
        description: description.to_string(),
        responsible_role: role,
    };
    vec![
        step(
            1,
            "Governance Acknowledgement",
            "Club Advisor confirms committee formation and governance compliance",
            Role::Advisor,
        ),
        step(
            2,
            "Validation & Compliance",
            "Student Life Representative validates the handover process",
            Role::StudentLife,
        ),
        step(
            3,
            "Formal Handover",
            "Outgoing representative officially transfers responsibilities",
            Role::Outgoing,
        ),
        step(
            4,
            "Appointment Acceptance",
            "Incoming representative accepts the appointment",
            Role::Incoming,
        ),
    ]
}
