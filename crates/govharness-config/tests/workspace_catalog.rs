// SPDX-License-Identifier: Apache-2.0

mod support;

use govharness_config::{
    evaluate_catalog, has_errors, parse_base_configuration, parse_catalog, EnvironmentId,
    HarnessData, LintSeverity, SourceFormat,
};
use govharness_core::canonical::{field_path_exists, leaf_paths};

fn workspace_data() -> HarnessData {
    HarnessData::load_from_workspace(&support::workspace_root()).expect("load workspace data")
}

#[test]
fn committed_catalog_resolves_every_policy_in_every_environment() {
    let data = workspace_data();
    let base = serde_json::to_value(data.base()).expect("base json");
    let base_leaves = leaf_paths(&base);
    assert!(!base_leaves.is_empty());

    for entry in data.catalog().entries(None) {
        for environment in EnvironmentId::ALL {
            let config = data
                .resolve(&entry.category, &entry.name, Some(environment.as_str()))
                .unwrap_or_else(|e| panic!("{} in {environment}: {e}", entry.key()));
            let effective = serde_json::to_value(&config).expect("effective json");
            for leaf in &base_leaves {
                assert!(
                    field_path_exists(&effective, leaf),
                    "{} in {environment} lost base field {leaf}",
                    entry.key()
                );
            }
        }
    }
}

#[test]
fn committed_dev_environment_keeps_base_region() {
    let data = workspace_data();
    let config = data
        .resolve("network", "deny-network-no-nsg", Some("dev"))
        .expect("resolve");
    let overlay = data
        .catalog()
        .overlay(EnvironmentId::Dev)
        .expect("dev overlay");
    assert_eq!(config.scope.target_scope_id, overlay.target_scope_id);
    assert_eq!(config.scope.default_region, data.base().scope.default_region);
}

#[test]
fn committed_catalog_has_no_lint_errors() {
    let data = workspace_data();
    let violations = evaluate_catalog(data.catalog(), data.base());
    assert!(!has_errors(&violations), "{violations:#?}");
}

#[test]
fn lint_flags_budget_and_missing_suffixes() {
    let violations = evaluate_catalog(&support::catalog(), &support::base());
    let ids: Vec<(&str, &str)> = violations
        .iter()
        .map(|v| (v.id, v.subject.as_str()))
        .collect();
    assert!(ids.contains(&("catalog.policy.name_budget.exceeded", "storage/long-prefix")));
    assert!(ids.contains(&("catalog.policy.suffix.missing", "tags/require-owner-tag")));
    assert!(has_errors(&violations));
    assert!(violations
        .iter()
        .filter(|v| v.id == "catalog.policy.suffix.missing")
        .all(|v| v.severity == LintSeverity::Warning));
}

#[test]
fn lint_rejects_prefixes_outside_ascii_alphanumerics() {
    for prefix in ["\u{c9}TUDE", "test-policy", "test policy"] {
        let source = support::CATALOG_JSON.replace("testpolicynsg", prefix);
        let catalog = parse_catalog(&source, SourceFormat::Json).expect("catalog");
        let violations = evaluate_catalog(&catalog, &support::base());
        let flagged = violations.iter().find(|v| {
            v.id == "catalog.policy.prefix.charset" && v.subject == "network/deny-network-no-nsg"
        });
        let flagged = flagged.unwrap_or_else(|| panic!("{prefix:?} not flagged: {violations:#?}"));
        assert_eq!(flagged.severity, LintSeverity::Error);
    }

    let clean = evaluate_catalog(&support::catalog(), &support::base());
    assert!(clean.iter().all(|v| v.id != "catalog.policy.prefix.charset"), "{clean:#?}");
}

#[test]
fn module_groups_and_tags_are_looked_up_by_name() {
    let data = support::data();
    assert_eq!(
        data.required_modules("storage").expect("storage group"),
        ["Az.Storage".to_string()]
    );
    assert_eq!(data.tags_for("speed").expect("speed tags").len(), 2);
    assert_eq!(
        data.required_modules("sql").expect_err("unknown group").code(),
        "not_found"
    );
}

#[test]
fn malformed_base_configuration_is_rejected() {
    let missing = support::BASE_JSON.replace("\"tagTaxonomy\"", "\"tagTaxonomyX\"");
    let err = parse_base_configuration(&missing, SourceFormat::Json).expect_err("missing section");
    assert_eq!(err.code(), "malformed_config");

    let bad_format = support::BASE_JSON.replace("%Y%m%d%H%M%S", "%Y%Q");
    let err = parse_base_configuration(&bad_format, SourceFormat::Json).expect_err("bad format");
    assert!(err.to_string().contains("timestampFormat"));

    let zero = support::BASE_JSON.replace("\"maxNameLength\": 24", "\"maxNameLength\": 0");
    let err = parse_base_configuration(&zero, SourceFormat::Json).expect_err("zero budget");
    assert_eq!(err.code(), "malformed_config");
}
