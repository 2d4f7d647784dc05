//! Settings export/import round trip and wholesale replacement.

use quill_config::{ConfigSnapshot, ConfigStore};
use tempfile::TempDir;

fn populated_snapshot() -> ConfigSnapshot {
    let mut snapshot = ConfigSnapshot {
        api_key: "sk-live-123".to_string(),
        selected_model: "gpt-4o-mini".to_string(),
        ..ConfigSnapshot::default()
    };
    snapshot.prompts.add("Summarize", "Summarize the text.").unwrap();
    snapshot.prompts.add("Fix Grammar", "Fix any mistakes.").unwrap();
    snapshot
}

#[tokio::test]
async fn export_then_import_restores_an_identical_snapshot() {
    let original = populated_snapshot();
    let document = original.export().unwrap();

    let restored = ConfigSnapshot::default().apply_import(&document).unwrap();
    assert_eq!(restored, original);
}

#[tokio::test]
async fn export_uses_the_persisted_key_names() {
    let document = populated_snapshot().export().unwrap();
    let value: serde_json::Value = serde_json::from_str(&document).unwrap();

    assert_eq!(value["apiKey"], "sk-live-123");
    assert_eq!(value["selectedModel"], "gpt-4o-mini");
    assert_eq!(value["prompts"][0]["name"], "Summarize");
    assert_eq!(value["prompts"][0]["id"], 1);
}

#[tokio::test]
async fn partial_import_keeps_unmentioned_fields() {
    let current = populated_snapshot();
    let merged = current
        .apply_import(r#"{ "selectedModel": "gpt-4o" }"#)
        .unwrap();

    assert_eq!(merged.selected_model, "gpt-4o");
    assert_eq!(merged.api_key, "sk-live-123");
    assert_eq!(merged.prompts.len(), 2);
}

#[tokio::test]
async fn unknown_keys_in_an_import_are_ignored() {
    let merged = populated_snapshot()
        .apply_import(r#"{ "apiKey": "sk-new", "theme": "dark" }"#)
        .unwrap();
    assert_eq!(merged.api_key, "sk-new");
}

#[tokio::test]
async fn malformed_import_changes_nothing() {
    let current = populated_snapshot();
    assert!(current.apply_import("{ not json").is_err());
    assert!(current.apply_import("[1, 2, 3]").is_err());
    // The receiver is untouched either way.
    assert_eq!(current, populated_snapshot());
}

#[tokio::test]
async fn replace_writes_the_whole_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let store = ConfigStore::open(&path).unwrap();
    store.replace(populated_snapshot()).unwrap();

    // A second replace with an emptier snapshot leaves no residue behind.
    let trimmed = ConfigSnapshot {
        selected_model: "gpt-4o".to_string(),
        ..ConfigSnapshot::default()
    };
    store.replace(trimmed.clone()).unwrap();

    let reopened = ConfigStore::open(&path).unwrap();
    assert_eq!(*reopened.snapshot(), trimmed);
}

#[tokio::test]
async fn missing_file_reads_as_defaults() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::open(dir.path().join("absent.json")).unwrap();
    assert_eq!(*store.snapshot(), ConfigSnapshot::default());
}
