//! Loading configuration from disk and building the storage it selects

#![allow(clippy::unwrap_used, clippy::expect_used)]

use handover_ceremony::{CeremonyService, ConfirmStep, ReconfirmPolicy};
use handover_cli::CliConfig;
use handover_core::{ConfigError, Role};
use handover_effects::{build_storage, RealTimeHandler, StorageBackend};
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let config = CliConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, CliConfig::default());
    assert_eq!(config.storage.backend, StorageBackend::Memory);
}

#[test]
fn unparsable_file_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[storage\nbackend = ").unwrap();
    assert!(matches!(CliConfig::load(&path), Err(ConfigError::Parse(_))));
}

#[test]
fn catalog_section_replaces_credentials() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[policy]
reconfirm = "reject"

[[catalog.credentials]]
code = "adv27"
name = "New Advisor"
role = "advisor"
label = "Club Advisor"

[[catalog.credentials]]
code = "SL27"
name = "New Rep"
role = "studentlife"
label = "Student Life Representative"

[[catalog.credentials]]
code = "OUT27"
name = "Outgoing"
role = "outgoing"
label = "Outgoing President"

[[catalog.credentials]]
code = "INC27"
name = "Incoming"
role = "incoming"
label = "Incoming President"

[[catalog.credentials]]
code = "ROOT27"
name = "Admin"
role = "admin"
label = "Super User"
"#,
    )
    .unwrap();

    let config = CliConfig::load(&path).unwrap();
    assert_eq!(config.policy.reconfirm, ReconfirmPolicy::Reject);

    let catalog = config.build_catalog().unwrap();
    assert_eq!(catalog.resolve("ADV27").unwrap().name, "New Advisor");
    assert!(catalog.resolve("ADV2026").is_err());
    assert_eq!(catalog.total_steps(), 4);
}

#[test]
fn catalog_without_reachable_role_is_rejected() {
    let config = CliConfig::from_toml_str(
        r#"
[[catalog.credentials]]
code = "ADV27"
name = "Advisor"
role = "advisor"
label = "Club Advisor"
"#,
    )
    .unwrap();
    assert!(matches!(config.build_catalog(), Err(ConfigError::Invalid(_))));
}

#[tokio::test]
async fn filesystem_backend_persists_between_services() {
    let dir = TempDir::new().unwrap();
    let mut config = CliConfig::default();
    config
        .apply_env(|key| match key {
            "HANDOVER_STORAGE_BACKEND" => Some("filesystem".into()),
            "HANDOVER_STORAGE_PATH" => Some(dir.path().display().to_string()),
            _ => None,
        })
        .unwrap();

    let open = || {
        CeremonyService::new(
            Arc::new(config.build_catalog().unwrap()),
            build_storage(&config.storage),
            Arc::new(RealTimeHandler::new()),
            config.policy,
        )
    };

    let first = open();
    first.register("OUT2026").await.unwrap();
    first.delegate_host("ADMIN2026", Role::Outgoing).await.unwrap();
    first
        .complete_step(ConfirmStep::new(3, "OUT2026"))
        .await
        .unwrap();

    let second = open();
    assert_eq!(second.list_participants().await.unwrap().len(), 1);
    assert_eq!(second.host_role().await.unwrap(), Some(Role::Outgoing));
    let progress = second.get_progress().await.unwrap();
    assert!(progress.steps[2].is_completed());
    assert_eq!(second.cached_state().await.unwrap(), progress.state);

    second.reset().await.unwrap();
    assert!(open().list_participants().await.unwrap().is_empty());
}
