//! Atomic persistence of the configuration document.

mod common;

use common::{assembler, identity_provider, vault_url};
use vault_sso_config::model::{EnterpriseConfigDocument, merge};
use vault_sso_config::storage::DocumentStore;

fn document() -> EnterpriseConfigDocument {
    let base = vault_url();
    let assembler = assembler(&base);
    merge(
        &assembler.build_scim_config(),
        &assembler.build_monitoring_policy(),
        &assembler.build_deployment_metadata(),
        &identity_provider(&base),
    )
}

fn leftover_temp_files(dir: &std::path::Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect()
}

#[test]
fn test_write_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(dir.path().join("enterprise-config.json"));
    let document = document();

    store.write(&document).unwrap();
    assert_eq!(store.load().unwrap(), document);
    assert!(leftover_temp_files(dir.path()).is_empty());
}

#[test]
fn test_written_file_uses_camel_case_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(dir.path().join("enterprise-config.json"));
    store.write(&document()).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
    assert!(raw.get("identityProvider").is_some());
    assert!(raw["scim"].get("attributeMappings").is_some());
    assert_eq!(raw["scim"]["authMethod"], "Bearer Token");
}

#[test]
fn test_dropped_stage_leaves_previous_document() {
    let dir = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(dir.path().join("enterprise-config.json"));
    let original = document();
    store.write(&original).unwrap();

    let mut changed = original.clone();
    changed.monitoring.set_enabled(
        vault_sso_config::model::MonitoringSubsystem::Alerting,
        false,
    );
    let staged = store.stage(&changed).unwrap();
    assert!(staged.temp_path().exists());
    drop(staged);

    assert_eq!(store.load().unwrap(), original);
    assert!(leftover_temp_files(dir.path()).is_empty());
}

#[test]
fn test_dropped_stage_without_previous_document_leaves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("enterprise-config.json");
    let store = DocumentStore::new(&target);

    drop(store.stage(&document()).unwrap());

    assert!(!target.exists());
    assert!(leftover_temp_files(dir.path()).is_empty());
}

#[test]
fn test_commit_replaces_previous_document() {
    let dir = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(dir.path().join("enterprise-config.json"));
    store.write(&document()).unwrap();

    let mut changed = document();
    changed.monitoring.set_enabled(
        vault_sso_config::model::MonitoringSubsystem::LogAnalytics,
        false,
    );
    store.stage(&changed).unwrap().commit().unwrap();

    assert_eq!(store.load().unwrap(), changed);
}

#[test]
fn test_missing_directory_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("missing").join("enterprise-config.json");
    let store = DocumentStore::new(&target);

    let err = store.write(&document()).unwrap_err();
    assert_eq!(err.path, target);
    assert!(err.to_string().contains("enterprise-config.json"));
}

#[test]
fn test_load_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(dir.path().join("absent.json"));
    let err = store.load().unwrap_err();
    assert_eq!(err.cause.kind(), std::io::ErrorKind::NotFound);
}
