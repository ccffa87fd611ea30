// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! Layered test configuration and resource naming for policy test runs.
//!
//! Data flows one way: the catalog and base configuration are loaded once,
//! [`resolve`] merges them with an environment overlay, and the result feeds
//! [`generate_name`], [`validate`] and [`resolve_path`].

mod environment;
mod evaluation;
mod limits;
mod naming;
mod paths;
mod resolve;
mod schema;
mod sources;
mod store;

use std::path::{Path, PathBuf};

use govharness_core::ports::{ScopeLookup, SessionProvider};

pub use govharness_core::HarnessError;

pub use environment::{resolved_scope_id, validate_environment};
pub use evaluation::{evaluate_catalog, has_errors, CatalogViolation, LintSeverity};
pub use limits::{DEFAULT_ENVIRONMENT, MIN_KEPT_TIMESTAMP_CHARS};
pub use naming::{generate_name_at, pack_name, render_timestamp};
pub use paths::{normalize_path, resolve_definition_path};
pub use resolve::{resolve_effective, select_environment};
pub use schema::{
    BaseConfiguration, BehaviorFlags, BehaviorOverrides, Catalog, CatalogEntry,
    EffectiveConfiguration, EnvironmentId, EnvironmentOverlay, GeneratedName, NamingLimits,
    PolicyOverrides, PolicySection, Role, ScalarOption, SchemaVersion, ScopeSettings,
    TimeoutOverrides, Timeouts, ValidationResult,
};
pub use sources::{
    base_config_path, catalog_path, load_base_configuration, load_catalog,
    parse_base_configuration, parse_catalog, SourceFormat,
};
pub use store::HarnessData;

pub const CRATE_NAME: &str = "govharness-config";

/// Resolves against the process-wide workspace data.
pub fn resolve(
    category: &str,
    policy_name: &str,
    environment: Option<&str>,
) -> Result<EffectiveConfiguration, HarnessError> {
    HarnessData::global()?.resolve(category, policy_name, environment)
}

pub fn generate_name(
    config: &EffectiveConfiguration,
    role: Role,
) -> Result<GeneratedName, HarnessError> {
    naming::generate_name(config, role)
}

pub fn validate(
    config: &EffectiveConfiguration,
    sessions: &dyn SessionProvider,
    scopes: &dyn ScopeLookup,
) -> ValidationResult {
    validate_environment(config, sessions, scopes)
}

pub fn resolve_path(
    category: &str,
    policy_name: &str,
    caller_root: &Path,
) -> Result<PathBuf, HarnessError> {
    HarnessData::global()?.resolve_path(category, policy_name, caller_root)
}
