// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use assert_cmd::Command;
use serde_json::Value;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

fn govharness() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_govharness"));
    cmd.env_remove("GOVHARNESS_ENVIRONMENT")
        .env_remove("GOVHARNESS_ROOT")
        .env_remove("GOVHARNESS_LOG_LEVEL")
        .env_remove("RUST_LOG")
        .arg("--root")
        .arg(workspace_root())
        .arg("--json");
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is json")
}

fn stderr_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stderr).expect("stderr is json")
}

#[test]
fn resolve_prints_effective_configuration() {
    let output = govharness()
        .args([
            "resolve",
            "--category",
            "network",
            "--policy",
            "deny-network-no-nsg",
            "--environment",
            "dev",
        ])
        .output()
        .expect("run resolve");
    assert!(output.status.success(), "{output:?}");
    let payload = stdout_json(&output);
    assert_eq!(payload["command"], "resolve");
    assert_eq!(payload["fingerprint"].as_str().map(str::len), Some(64));
    let config = &payload["config"];
    assert_eq!(config["environment"], "dev");
    assert_eq!(config["scope"]["defaultRegion"], "eastus");
    assert_eq!(
        config["scope"]["targetScopeId"],
        "/providers/Microsoft.Management/managementGroups/mg-policy-dev"
    );
    assert_eq!(config["policy"]["namePrefix"], "testpolicynsg");
}

#[test]
fn resolve_is_deterministic_across_runs() {
    let run = || {
        let output = govharness()
            .args([
                "resolve",
                "--category",
                "storage",
                "--policy",
                "deny-storage-account-public-access",
                "--environment",
                "prod",
            ])
            .output()
            .expect("run resolve");
        assert!(output.status.success());
        stdout_json(&output)["fingerprint"].clone()
    };
    assert_eq!(run(), run());
}

#[test]
fn name_fits_the_budget_and_ends_with_the_role_suffix() {
    let output = govharness()
        .args([
            "name",
            "--category",
            "storage",
            "--policy",
            "deny-storage-account-public-access",
            "--role",
            "compliant",
        ])
        .output()
        .expect("run name");
    assert!(output.status.success(), "{output:?}");
    let payload = stdout_json(&output);
    let name = payload["name"].as_str().expect("name string");
    assert!(name.len() <= 24, "{name}");
    assert!(name.ends_with("comp"));
    assert!(name.starts_with("testpolicyst"));
    assert_eq!(payload["role"], "compliant");
}

#[test]
fn unknown_role_is_a_validation_error() {
    let output = govharness()
        .args([
            "name",
            "--category",
            "storage",
            "--policy",
            "deny-storage-account-public-access",
            "--role",
            "auditOnly",
        ])
        .output()
        .expect("run name");
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(stderr_json(&output)["code"], "invalid_role");
}

#[test]
fn unknown_policy_reports_not_found() {
    let output = govharness()
        .args(["resolve", "--category", "storage", "--policy", "missing"])
        .output()
        .expect("run resolve");
    assert_eq!(output.status.code(), Some(3));
    let err = stderr_json(&output);
    assert_eq!(err["code"], "not_found");
    assert_eq!(err["details"]["key"], "storage/missing");
}

#[test]
fn unknown_environment_reports_not_found() {
    let output = govharness()
        .args([
            "resolve",
            "--category",
            "storage",
            "--policy",
            "deny-storage-account-public-access",
            "--environment",
            "staging",
        ])
        .output()
        .expect("run resolve");
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(stderr_json(&output)["details"]["kind"], "environment");
}

#[test]
fn path_resolves_committed_definitions() {
    let root = workspace_root();
    let output = govharness()
        .args(["path", "--category", "tags", "--policy", "require-owner-tag", "--from"])
        .arg(&root)
        .output()
        .expect("run path");
    assert!(output.status.success(), "{output:?}");
    let payload = stdout_json(&output);
    assert_eq!(
        payload["path"].as_str().map(PathBuf::from),
        Some(root.join("policies/tags/require-owner-tag.json"))
    );
}

#[test]
fn path_reports_missing_definition_files() {
    let empty = tempfile::tempdir().expect("tempdir");
    let output = govharness()
        .args(["path", "--category", "tags", "--policy", "require-owner-tag", "--from"])
        .arg(empty.path())
        .output()
        .expect("run path");
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(stderr_json(&output)["code"], "file_not_found");
}

#[test]
fn catalog_list_and_lint_cover_committed_entries() {
    let output = govharness()
        .args(["catalog", "list"])
        .output()
        .expect("run list");
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["count"], 5);

    let output = govharness()
        .args(["catalog", "list", "--category", "storage"])
        .output()
        .expect("run list storage");
    assert_eq!(stdout_json(&output)["count"], 2);

    let output = govharness()
        .args(["catalog", "lint"])
        .output()
        .expect("run lint");
    assert!(output.status.success(), "{output:?}");
    assert_eq!(stdout_json(&output)["status"], "ok");
}

#[test]
fn modules_and_tags_read_base_mappings() {
    let output = govharness()
        .args(["modules", "storage"])
        .output()
        .expect("run modules");
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["modules"][0], "Az.Storage");

    let output = govharness()
        .args(["tags", "unknown-purpose"])
        .output()
        .expect("run tags");
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn malformed_catalog_under_root_is_reported() {
    let temp = tempfile::tempdir().expect("tempdir");
    let harness = temp.path().join("configs/harness");
    std::fs::create_dir_all(&harness).expect("mkdir");
    std::fs::write(harness.join("catalog.json"), r#"{"schemaVersion": "1", "policies": {}}"#)
        .expect("write catalog");
    std::fs::copy(
        workspace_root().join("configs/harness/base.json"),
        harness.join("base.json"),
    )
    .expect("copy base");

    let output = Command::new(env!("CARGO_BIN_EXE_govharness"))
        .env_remove("RUST_LOG")
        .env_remove("GOVHARNESS_LOG_LEVEL")
        .args(["--json", "--root"])
        .arg(temp.path())
        .args(["catalog", "list"])
        .output()
        .expect("run list");
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(stderr_json(&output)["code"], "malformed_catalog");
}

#[test]
fn print_config_paths_points_at_harness_sources() {
    let output = govharness()
        .arg("--print-config-paths")
        .output()
        .expect("run print-config-paths");
    assert!(output.status.success());
    let payload = stdout_json(&output);
    let catalog = payload["catalog"].as_str().expect("catalog path");
    assert!(catalog.ends_with("configs/harness/catalog.json"));
}
