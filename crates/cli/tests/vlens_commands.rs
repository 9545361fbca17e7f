use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{TempDir, tempdir};

fn write_file(path: &PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Vault with three linked notes plus an ignored archive folder.
fn setup() -> (TempDir, PathBuf) {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    let vault = root.join("vault");

    write_file(
        &vault.join("alpha.md"),
        "---\ntags: [project]\nstatus: active\n---\n# Alpha\n\nLinks to [[beta]].\n",
    );
    write_file(
        &vault.join("beta.md"),
        "---\ntags: [project]\nstatus: paused\n---\n# Beta\n\nSee [[gamma]] and [[alpha]].\n",
    );
    write_file(&vault.join("gamma.md"), "# Gamma\n\nA quiet note about lighthouses.\n");
    write_file(&vault.join("Archive/old.md"), "# Old\n\nlighthouses again [[alpha]]\n");

    let cfg = root.join("config.toml");
    let toml = format!(
        r#"
version = 1
profile = "default"

[profiles.default]
vault_root = "{}"
ignored_folders = ["archive"]

[logging]
level = "warn"
"#,
        vault.display()
    );
    write_file(&cfg, &toml);

    (tmp, cfg)
}

fn vlens(cfg: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("vlens"));
    cmd.arg("--config").arg(cfg).env("NO_COLOR", "1");
    cmd
}

#[test]
fn search_body_term_skips_ignored_folder() {
    let (_tmp, cfg) = setup();

    vlens(&cfg)
        .args(["search", "lighthouses"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gamma.md"))
        .stdout(predicate::str::contains("body"))
        .stdout(predicate::str::contains("old.md").not());
}

#[test]
fn search_with_filters_as_json() {
    let (_tmp, cfg) = setup();

    let output = vlens(&cfg)
        .args(["search", "--tag", "project", "--meta", "status=active", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let hits: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["path"], "alpha.md");
    assert_eq!(hits[0]["match_from"], "metadata");
    assert_eq!(hits[0]["outbound"], serde_json::json!(["beta.md"]));
    assert_eq!(hits[0]["backlinks"], serde_json::json!(["beta.md"]));
}

#[test]
fn search_quiet_prints_paths_only() {
    let (_tmp, cfg) = setup();

    vlens(&cfg)
        .args(["search", "--tag", "project", "--output", "quiet"])
        .assert()
        .success()
        .stdout("alpha.md\nbeta.md\n");
}

#[test]
fn search_rejects_malformed_meta() {
    let (_tmp, cfg) = setup();

    vlens(&cfg)
        .args(["search", "--meta", "status"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("expected key=value"));
}

#[test]
fn related_resolves_by_title() {
    let (_tmp, cfg) = setup();

    vlens(&cfg)
        .args(["related", "Gamma"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Backlinks ===\n  beta.md"));
}

#[test]
fn related_unknown_note_fails() {
    let (_tmp, cfg) = setup();

    vlens(&cfg)
        .args(["related", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Note not found in index: nowhere"));
}

#[test]
fn graph_json_lists_neighbours() {
    let (_tmp, cfg) = setup();

    let output = vlens(&cfg).args(["graph", "gamma", "--json"]).output().unwrap();
    assert!(output.status.success());

    let nodes: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let paths: Vec<&str> =
        nodes.as_array().unwrap().iter().map(|n| n["path"].as_str().unwrap()).collect();
    assert_eq!(paths, vec!["beta.md", "gamma.md"]);
}

#[test]
fn review_with_fresh_notes_is_empty() {
    let (_tmp, cfg) = setup();

    // Notes were just written, so none has reached the first bucket.
    vlens(&cfg)
        .args(["review"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(nothing to review)"));
}

#[test]
fn missing_config_fails() {
    let tmp = tempdir().unwrap();
    let cfg = tmp.path().join("missing.toml");

    vlens(&cfg)
        .args(["search", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error loading config"));
}

#[test]
fn missing_vault_root_fails() {
    let tmp = tempdir().unwrap();
    let cfg = tmp.path().join("config.toml");
    let toml = format!(
        "version = 1\n[profiles.default]\nvault_root = \"{}\"\n",
        tmp.path().join("no-vault").display()
    );
    write_file(&cfg, &toml);

    vlens(&cfg)
        .args(["search", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error indexing vault"));
}

#[test]
fn log_file_is_written() {
    let (tmp, cfg) = setup();
    let log_file = tmp.path().join("vlens.log");
    let mut toml = fs::read_to_string(&cfg).unwrap();
    toml.push_str(&format!("file = \"{}\"\nfile_level = \"debug\"\n", log_file.display()));
    fs::write(&cfg, toml).unwrap();

    vlens(&cfg).args(["search", "beta"]).assert().success();

    assert!(log_file.exists(), "log file should be created");
}
