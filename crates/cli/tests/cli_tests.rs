//! CLI integration tests
//!
//! Each test runs the `erd` binary against a fresh storage directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn erd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("erd").unwrap();
    cmd.current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("ERD_STORAGE_DIR")
        .env_remove("RUST_LOG")
        .arg("--storage-dir")
        .arg(dir.join("store"));
    cmd
}

fn snapshot(dir: &Path) -> Value {
    let output = erd(dir).args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

fn seed(dir: &Path) {
    erd(dir)
        .args(["entity", "add", "Client", "--x", "100", "--y", "100"])
        .assert()
        .success();
    erd(dir)
        .args(["entity", "add", "Commande", "--x", "300", "--y", "100"])
        .assert()
        .success();
    erd(dir)
        .args(["attribute", "add", "Client", "id", "int", "--primary"])
        .assert()
        .success();
    erd(dir)
        .args(["relationship", "add", "Client", "Commande", "--name", "Passe"])
        .assert()
        .success();
}

#[test]
fn test_init_creates_both_keys() {
    let temp_dir = TempDir::new().unwrap();
    erd(temp_dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized storage"));

    let store = temp_dir.path().join("store");
    assert_eq!(fs::read_to_string(store.join("entities.json")).unwrap(), "[]");
    assert_eq!(
        fs::read_to_string(store.join("relationships.json")).unwrap(),
        "[]"
    );
}

#[test]
fn test_entity_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    erd(dir)
        .args(["entity", "add", "Client", "--x", "100", "--y", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created entity 'Client'"));
    erd(dir)
        .args(["entity", "move", "Client", "-20", "40"])
        .assert()
        .success();
    erd(dir)
        .args(["entity", "rename", "Client", "Customer"])
        .assert()
        .success();

    erd(dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Entities (1)"))
        .stdout(predicate::str::contains("Customer  (-20, 40)"));

    erd(dir)
        .args(["entity", "delete", "Customer"])
        .assert()
        .success();
    erd(dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Entities (0)"));
}

#[test]
fn test_unknown_entity_is_tolerated_for_move() {
    let temp_dir = TempDir::new().unwrap();
    erd(temp_dir.path())
        .args(["entity", "move", "Ghost", "1", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing moved"));
}

#[test]
fn test_non_finite_coordinates_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    erd(dir).args(["entity", "add", "Client"]).assert().success();

    erd(dir)
        .args(["entity", "move", "Client", "NaN", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("finite"));
    erd(dir)
        .args(["entity", "add", "Commande", "--x", "inf"])
        .assert()
        .failure();

    erd(dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Client  (0, 0)"));
}

#[test]
fn test_attribute_on_unknown_entity_fails() {
    let temp_dir = TempDir::new().unwrap();
    erd(temp_dir.path())
        .args(["attribute", "add", "Ghost", "id", "int"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Entity not found: Ghost"));
}

#[test]
fn test_record_shape_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    seed(dir);

    let text = fs::read_to_string(dir.join("store").join("entities.json")).unwrap();
    let entities: Value = serde_json::from_str(&text).unwrap();
    let client = &entities[0];
    assert_eq!(client["name"], "Client");
    assert_eq!(client["x"], 100.0);
    assert_eq!(client["attributes"][0]["type"], "int");
    assert_eq!(client["attributes"][0]["isPrimary"], true);

    let text = fs::read_to_string(dir.join("store").join("relationships.json")).unwrap();
    let relationships: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(relationships[0]["sourceId"], client["id"]);
    assert_eq!(relationships[0]["sourceCardinality"], "1,1");
    assert_eq!(relationships[0]["targetCardinality"], "0,n");
    assert_eq!(relationships[0]["name"], "Passe");
}

#[test]
fn test_relationship_with_unknown_entity_fails() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    erd(dir).args(["entity", "add", "Client"]).assert().success();

    erd(dir)
        .args(["relationship", "add", "Client", "Ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ghost"));

    let snap = snapshot(dir);
    assert_eq!(snap["relationships"].as_array().unwrap().len(), 0);
}

#[test]
fn test_relationship_update_and_delete() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    seed(dir);

    let snap = snapshot(dir);
    let id = snap["relationships"][0]["id"].as_str().unwrap().to_string();

    erd(dir)
        .args(["relationship", "update", &id, "0,1", "1,n", "--name", "Possede"])
        .assert()
        .success();
    let snap = snapshot(dir);
    assert_eq!(snap["relationships"][0]["sourceCardinality"], "0,1");
    assert_eq!(snap["relationships"][0]["targetCardinality"], "1,n");
    assert_eq!(snap["relationships"][0]["name"], "Possede");

    erd(dir)
        .args(["relationship", "update", "missing", "0,1", "1,n"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing updated"));

    erd(dir)
        .args(["relationship", "delete", &id])
        .assert()
        .success();
    let snap = snapshot(dir);
    assert!(snap["relationships"].as_array().unwrap().is_empty());
}

#[test]
fn test_validate_reports_dangling_relationship() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    seed(dir);

    erd(dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("diagram is consistent"));

    erd(dir)
        .args(["entity", "delete", "Commande"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 relationship(s) still reference it"));

    erd(dir)
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("error:"));
}

#[test]
fn test_export_import_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    seed(dir);
    let before = snapshot(dir);

    let file = dir.join("shop.erd.json");
    erd(dir)
        .arg("export")
        .arg(&file)
        .assert()
        .success();
    assert!(file.exists());

    let other = TempDir::new().unwrap();
    erd(other.path())
        .arg("import")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Imported 2 entities and 1 relationships",
        ));
    assert_eq!(snapshot(other.path()), before);
}

#[test]
fn test_malformed_storage_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let store = dir.join("store");
    fs::create_dir_all(&store).unwrap();
    fs::write(store.join("entities.json"), "{not json").unwrap();

    erd(dir)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("entities"));
}

#[test]
fn test_config_file_keys() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(
        dir.join("erd.toml"),
        "storage_dir = \"model\"\n\n[keys]\nentities = \"shop.entities\"\nrelationships = \"shop.relationships\"\n",
    )
    .unwrap();

    Command::cargo_bin("erd")
        .unwrap()
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("ERD_STORAGE_DIR")
        .args(["entity", "add", "Client"])
        .assert()
        .success();

    assert!(dir.join("model").join("shop.entities.json").exists());
    assert!(dir.join("model").join("shop.relationships.json").exists());
}

#[test]
fn test_invalid_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let config = dir.join("bad.toml");
    fs::write(&config, "unknown = 1").unwrap();

    erd(dir)
        .arg("--config")
        .arg(&config)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
