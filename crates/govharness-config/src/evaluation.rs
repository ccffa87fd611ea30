// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::schema::{BaseConfiguration, Catalog, CatalogEntry, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum LintSeverity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogViolation {
    pub id: &'static str,
    pub severity: LintSeverity,
    pub subject: String,
    pub message: &'static str,
    pub evidence: String,
}

/// Static checks over every entry and overlay. Never fails; the caller decides
/// what to do with error-severity findings.
#[must_use]
pub fn evaluate_catalog(catalog: &Catalog, base: &BaseConfiguration) -> Vec<CatalogViolation> {
    let mut violations = Vec::new();
    for entry in catalog.entries(None) {
        evaluate_entry(entry, base, &mut violations);
    }

    for (id, overlay) in &catalog.environments {
        if overlay.target_scope_id.is_none()
            && base.scope.target_scope_id.is_none()
            && overlay.subscription_id.is_none()
            && base.scope.subscription_id.is_none()
        {
            violations.push(CatalogViolation {
                id: "catalog.environment.scope.missing",
                severity: LintSeverity::Warning,
                subject: id.as_str().to_string(),
                message: "environment defines neither a target scope nor a subscription",
                evidence: "scope falls back to the active session subscription".to_string(),
            });
        }
    }
    violations
}

#[must_use]
pub fn has_errors(violations: &[CatalogViolation]) -> bool {
    violations
        .iter()
        .any(|v| matches!(v.severity, LintSeverity::Error))
}

fn evaluate_entry(entry: &CatalogEntry, base: &BaseConfiguration, out: &mut Vec<CatalogViolation>) {
    let subject = entry.key();
    let max = base.naming.max_name_length;
    let prefix = entry
        .name_prefix
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or(&base.naming.test_resource_prefix);

    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        out.push(CatalogViolation {
            id: "catalog.policy.prefix.charset",
            severity: LintSeverity::Error,
            subject: subject.clone(),
            message: "name prefix must be non-empty ascii alphanumeric",
            evidence: format!("namePrefix={prefix:?}"),
        });
    }

    for role in Role::ALL {
        let Some(suffix) = entry.suffix(role) else {
            out.push(CatalogViolation {
                id: "catalog.policy.suffix.missing",
                severity: LintSeverity::Warning,
                subject: subject.clone(),
                message: "role has no configured suffix; names cannot be generated for it",
                evidence: format!("role={role}"),
            });
            continue;
        };
        if suffix.is_empty()
            || !suffix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            out.push(CatalogViolation {
                id: "catalog.policy.suffix.charset",
                severity: LintSeverity::Error,
                subject: subject.clone(),
                message: "role suffix must be non-empty lowercase alphanumeric",
                evidence: format!("role={role} suffix={suffix:?}"),
            });
        }
        let reserved = prefix.chars().count() + suffix.chars().count();
        if reserved >= max {
            out.push(CatalogViolation {
                id: "catalog.policy.name_budget.exceeded",
                severity: LintSeverity::Error,
                subject: subject.clone(),
                message: "prefix and suffix leave no room for timestamp material",
                evidence: format!("role={role} reserved={reserved} max_name_length={max}"),
            });
        }
    }

    let path = entry.definition_relative_path.trim();
    if path.is_empty() || path.starts_with('/') || path.contains('\\') {
        out.push(CatalogViolation {
            id: "catalog.policy.definition_path.invalid",
            severity: LintSeverity::Error,
            subject,
            message: "definition path must be a non-empty relative posix path",
            evidence: format!("definitionRelativePath={path:?}"),
        });
    }
}
