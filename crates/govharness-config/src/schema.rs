// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use govharness_core::ports::AuthContext;
use govharness_core::HarnessError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SchemaVersion {
    #[serde(rename = "1")]
    V1,
}

impl SchemaVersion {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "1",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentId {
    #[default]
    Dev,
    Test,
    Prod,
}

impl EnvironmentId {
    pub const ALL: [Self; 3] = [Self::Dev, Self::Test, Self::Prod];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Test => "test",
            Self::Prod => "prod",
        }
    }
}

impl fmt::Display for EnvironmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnvironmentId {
    type Err = HarnessError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| HarnessError::not_found("environment", trimmed))
    }
}

/// Semantic category of a generated test resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Compliant,
    NonCompliant,
    Exempted,
}

impl Role {
    pub const ALL: [Self; 3] = [Self::Compliant, Self::NonCompliant, Self::Exempted];

    /// Key of the suffix inside a catalog entry's `testOptions`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::NonCompliant => "nonCompliant",
            Self::Exempted => "exempted",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Role {
    type Err = HarnessError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let folded: String = value
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect();
        Self::ALL
            .into_iter()
            .find(|role| role.key().eq_ignore_ascii_case(&folded))
            .ok_or_else(|| HarnessError::InvalidRole {
                role: value.to_string(),
                policy: String::new(),
            })
    }
}

/// Policy-specific scalar carried in `testOptions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarOption {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ScalarOption {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Timeouts {
    pub policy_evaluation: u64,
    pub compliance_scan: u64,
    pub resource_creation: u64,
    pub remediation: u64,
    pub cleanup: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BehaviorFlags {
    pub cleanup_resources: bool,
    pub verbose: bool,
    pub skip_long_running: bool,
    pub validate_scope_exists: bool,
    pub wait_for_compliance: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NamingLimits {
    pub max_name_length: usize,
    /// strftime pattern, rendered in UTC.
    pub timestamp_format: String,
    pub test_resource_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScopeSettings {
    pub target_scope_id: Option<String>,
    pub default_region: String,
    pub subscription_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BaseConfiguration {
    pub schema_version: SchemaVersion,
    pub timeouts: Timeouts,
    pub behavior: BehaviorFlags,
    pub naming: NamingLimits,
    pub scope: ScopeSettings,
    pub module_groups: BTreeMap<String, Vec<String>>,
    pub tag_taxonomy: BTreeMap<String, Vec<String>>,
}

impl BaseConfiguration {
    pub fn required_modules(&self, group: &str) -> Result<&[String], HarnessError> {
        self.module_groups
            .get(group)
            .map(Vec::as_slice)
            .ok_or_else(|| HarnessError::not_found("module group", group))
    }

    pub fn tags_for(&self, purpose: &str) -> Result<&[String], HarnessError> {
        self.tag_taxonomy
            .get(purpose)
            .map(Vec::as_slice)
            .ok_or_else(|| HarnessError::not_found("tag purpose", purpose))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TimeoutOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_evaluation: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_scan: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_creation: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BehaviorOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanup_resources: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_long_running: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_scope_exists: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_for_compliance: Option<bool>,
}

/// Policy-level values that sit between the base defaults and the
/// environment overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PolicyOverrides {
    #[serde(default)]
    pub timeouts: TimeoutOverrides,
    #[serde(default)]
    pub behavior: BehaviorOverrides,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CatalogEntry {
    /// Filled from the enclosing map keys at load time.
    #[serde(default, skip_deserializing)]
    pub category: String,
    #[serde(default, skip_deserializing)]
    pub name: String,
    pub display_name: String,
    pub definition_relative_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_prefix: Option<String>,
    #[serde(default)]
    pub test_options: BTreeMap<String, ScalarOption>,
    #[serde(default)]
    pub overrides: PolicyOverrides,
}

impl CatalogEntry {
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}/{}", self.category, self.name)
    }

    #[must_use]
    pub fn suffix(&self, role: Role) -> Option<&str> {
        self.test_options.get(role.key()).and_then(ScalarOption::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnvironmentOverlay {
    #[serde(default, skip_deserializing)]
    pub environment_id: EnvironmentId,
    #[serde(default)]
    pub target_scope_id: Option<String>,
    #[serde(default)]
    pub default_region: Option<String>,
    #[serde(default)]
    pub subscription_id: Option<String>,
    #[serde(default)]
    pub timeouts: TimeoutOverrides,
    #[serde(default)]
    pub behavior: BehaviorOverrides,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Catalog {
    pub schema_version: SchemaVersion,
    pub policies: BTreeMap<String, BTreeMap<String, CatalogEntry>>,
    pub environments: BTreeMap<EnvironmentId, EnvironmentOverlay>,
}

impl Catalog {
    pub fn entry(&self, category: &str, name: &str) -> Result<&CatalogEntry, HarnessError> {
        self.policies
            .get(category)
            .and_then(|policies| policies.get(name))
            .ok_or_else(|| HarnessError::not_found("policy", format!("{category}/{name}")))
    }

    pub fn overlay(&self, environment: EnvironmentId) -> Result<&EnvironmentOverlay, HarnessError> {
        self.environments
            .get(&environment)
            .ok_or_else(|| HarnessError::not_found("environment", environment.as_str()))
    }

    /// Entries in `(category, name)` order, optionally limited to one category.
    pub fn entries<'a>(&'a self, category: Option<&'a str>) -> impl Iterator<Item = &'a CatalogEntry> + 'a {
        self.policies
            .iter()
            .filter(move |(name, _)| category.is_none_or(|wanted| wanted == name.as_str()))
            .flat_map(|(_, policies)| policies.values())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySection {
    pub category: String,
    pub name: String,
    pub display_name: String,
    pub definition_relative_path: String,
    pub name_prefix: String,
    pub test_options: BTreeMap<String, ScalarOption>,
}

/// Fully merged configuration for one test run. Owns all of its data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfiguration {
    pub schema_version: SchemaVersion,
    pub environment: EnvironmentId,
    pub timeouts: Timeouts,
    pub behavior: BehaviorFlags,
    pub naming: NamingLimits,
    pub scope: ScopeSettings,
    pub module_groups: BTreeMap<String, Vec<String>>,
    pub tag_taxonomy: BTreeMap<String, Vec<String>>,
    pub policy: PolicySection,
}

impl EffectiveConfiguration {
    pub fn suffix_for(&self, role: Role) -> Result<&str, HarnessError> {
        self.policy
            .test_options
            .get(role.key())
            .and_then(ScalarOption::as_str)
            .ok_or_else(|| HarnessError::InvalidRole {
                role: role.key().to_string(),
                policy: format!("{}/{}", self.policy.category, self.policy.name),
            })
    }

    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        govharness_core::canonical::stable_json_hash_hex(self)
    }

    pub fn canonical_json(&self) -> Result<String, serde_json::Error> {
        govharness_core::canonical::stable_json_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub success: bool,
    pub auth_context: Option<AuthContext>,
    pub resolved_scope_id: Option<String>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedName {
    pub value: String,
    pub role: Role,
}

impl GeneratedName {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for GeneratedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
