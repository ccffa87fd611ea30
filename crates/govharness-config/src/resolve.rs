// SPDX-License-Identifier: Apache-2.0

//! Field-by-field merge of base defaults, the catalog entry and the
//! environment overlay. Precedence, highest first: overlay, entry, base. A
//! layer only wins for fields it actually defines.

use govharness_core::{HarnessError, ENV_GOVHARNESS_ENVIRONMENT};
use tracing::debug;

use crate::limits::DEFAULT_ENVIRONMENT;
use crate::schema::{
    BaseConfiguration, BehaviorFlags, BehaviorOverrides, Catalog, CatalogEntry,
    EffectiveConfiguration, EnvironmentId, EnvironmentOverlay, PolicySection, Role,
    ScopeSettings, TimeoutOverrides, Timeouts,
};

/// Explicit id, then `GOVHARNESS_ENVIRONMENT`, then the default environment.
pub fn select_environment(requested: Option<&str>) -> Result<EnvironmentId, HarnessError> {
    if let Some(id) = requested {
        return id.parse();
    }
    match std::env::var(ENV_GOVHARNESS_ENVIRONMENT) {
        Ok(value) if !value.trim().is_empty() => value.parse(),
        _ => Ok(DEFAULT_ENVIRONMENT),
    }
}

pub fn resolve_effective(
    catalog: &Catalog,
    base: &BaseConfiguration,
    category: &str,
    policy_name: &str,
    environment: EnvironmentId,
) -> Result<EffectiveConfiguration, HarnessError> {
    let entry = catalog.entry(category, policy_name)?;
    let overlay = catalog.overlay(environment)?;

    let config = EffectiveConfiguration {
        schema_version: base.schema_version,
        environment,
        timeouts: merge_timeouts(&base.timeouts, &entry.overrides.timeouts, &overlay.timeouts),
        behavior: merge_behavior(&base.behavior, &entry.overrides.behavior, &overlay.behavior),
        naming: base.naming.clone(),
        scope: merge_scope(&base.scope, entry, overlay),
        module_groups: base.module_groups.clone(),
        tag_taxonomy: base.tag_taxonomy.clone(),
        policy: policy_section(entry, base),
    };
    check_name_budget(&config)?;

    debug!(
        policy = %entry.key(),
        environment = %environment,
        target_scope = ?config.scope.target_scope_id,
        region = %config.scope.default_region,
        "resolved effective configuration"
    );
    Ok(config)
}

fn pick<T: Copy>(base: T, entry: Option<T>, overlay: Option<T>) -> T {
    overlay.or(entry).unwrap_or(base)
}

fn pick_text(base: &str, entry: Option<&String>, overlay: Option<&String>) -> String {
    overlay.or(entry).map_or_else(|| base.to_string(), Clone::clone)
}

fn merge_timeouts(base: &Timeouts, entry: &TimeoutOverrides, overlay: &TimeoutOverrides) -> Timeouts {
    Timeouts {
        policy_evaluation: pick(
            base.policy_evaluation,
            entry.policy_evaluation,
            overlay.policy_evaluation,
        ),
        compliance_scan: pick(base.compliance_scan, entry.compliance_scan, overlay.compliance_scan),
        resource_creation: pick(
            base.resource_creation,
            entry.resource_creation,
            overlay.resource_creation,
        ),
        remediation: pick(base.remediation, entry.remediation, overlay.remediation),
        cleanup: pick(base.cleanup, entry.cleanup, overlay.cleanup),
    }
}

fn merge_behavior(
    base: &BehaviorFlags,
    entry: &BehaviorOverrides,
    overlay: &BehaviorOverrides,
) -> BehaviorFlags {
    BehaviorFlags {
        cleanup_resources: pick(
            base.cleanup_resources,
            entry.cleanup_resources,
            overlay.cleanup_resources,
        ),
        verbose: pick(base.verbose, entry.verbose, overlay.verbose),
        skip_long_running: pick(
            base.skip_long_running,
            entry.skip_long_running,
            overlay.skip_long_running,
        ),
        validate_scope_exists: pick(
            base.validate_scope_exists,
            entry.validate_scope_exists,
            overlay.validate_scope_exists,
        ),
        wait_for_compliance: pick(
            base.wait_for_compliance,
            entry.wait_for_compliance,
            overlay.wait_for_compliance,
        ),
    }
}

fn merge_scope(
    base: &ScopeSettings,
    entry: &CatalogEntry,
    overlay: &EnvironmentOverlay,
) -> ScopeSettings {
    ScopeSettings {
        target_scope_id: overlay
            .target_scope_id
            .clone()
            .or_else(|| base.target_scope_id.clone()),
        default_region: pick_text(
            &base.default_region,
            entry.overrides.default_region.as_ref(),
            overlay.default_region.as_ref(),
        ),
        subscription_id: overlay
            .subscription_id
            .clone()
            .or_else(|| base.subscription_id.clone()),
    }
}

fn policy_section(entry: &CatalogEntry, base: &BaseConfiguration) -> PolicySection {
    let name_prefix = entry
        .name_prefix
        .as_deref()
        .map(str::trim)
        .filter(|prefix| !prefix.is_empty())
        .unwrap_or(&base.naming.test_resource_prefix)
        .to_string();
    PolicySection {
        category: entry.category.clone(),
        name: entry.name.clone(),
        display_name: entry.display_name.clone(),
        definition_relative_path: entry.definition_relative_path.clone(),
        name_prefix,
        test_options: entry.test_options.clone(),
    }
}

/// Rejects entries whose prefix plus longest role suffix leaves no room for
/// timestamp material within the naming budget.
fn check_name_budget(config: &EffectiveConfiguration) -> Result<(), HarnessError> {
    let longest = Role::ALL
        .into_iter()
        .filter_map(|role| config.suffix_for(role).ok())
        .max_by_key(|suffix| suffix.chars().count());
    let Some(suffix) = longest else {
        return Ok(());
    };
    let prefix = &config.policy.name_prefix;
    let max = config.naming.max_name_length;
    if prefix.chars().count() + suffix.chars().count() >= max {
        return Err(HarnessError::NameBudgetExceeded {
            prefix: prefix.clone(),
            suffix: suffix.to_string(),
            max_name_length: max,
        });
    }
    Ok(())
}
