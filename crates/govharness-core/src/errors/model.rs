// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExitCode {
    Success = 0,
    Usage = 2,
    Validation = 3,
    DependencyFailure = 4,
    Internal = 10,
}

impl ExitCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Usage => "usage",
            Self::Validation => "validation",
            Self::DependencyFailure => "dependency_failure",
            Self::Internal => "internal",
        }
    }
}

/// Failures raised by the resolver, the name generator, the path resolver and
/// the loaders. Environment validation never raises; it reports through
/// `ValidationResult::errors` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HarnessError {
    NotFound {
        kind: &'static str,
        key: String,
    },
    MalformedCatalog(String),
    MalformedConfig(String),
    NameBudgetExceeded {
        prefix: String,
        suffix: String,
        max_name_length: usize,
    },
    InvalidRole {
        role: String,
        policy: String,
    },
    FileNotFound {
        path: PathBuf,
    },
}

impl HarnessError {
    #[must_use]
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::MalformedCatalog(_) => "malformed_catalog",
            Self::MalformedConfig(_) => "malformed_config",
            Self::NameBudgetExceeded { .. } => "name_budget_exceeded",
            Self::InvalidRole { .. } => "invalid_role",
            Self::FileNotFound { .. } => "file_not_found",
        }
    }

    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        ExitCode::Validation
    }

    #[must_use]
    pub fn to_machine_error(&self) -> MachineError {
        let machine = MachineError::new(self.code(), &self.to_string());
        match self {
            Self::NotFound { kind, key } => machine.with_detail("kind", kind).with_detail("key", key),
            Self::NameBudgetExceeded {
                prefix,
                suffix,
                max_name_length,
            } => machine
                .with_detail("prefix", prefix)
                .with_detail("suffix", suffix)
                .with_detail("max_name_length", &max_name_length.to_string()),
            Self::InvalidRole { role, policy } => {
                machine.with_detail("role", role).with_detail("policy", policy)
            }
            Self::FileNotFound { path } => {
                machine.with_detail("path", &path.display().to_string())
            }
            Self::MalformedCatalog(_) | Self::MalformedConfig(_) => machine,
        }
    }
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { kind, key } => write!(f, "{kind} not found: {key}"),
            Self::MalformedCatalog(message) => write!(f, "malformed catalog: {message}"),
            Self::MalformedConfig(message) => write!(f, "malformed base configuration: {message}"),
            Self::NameBudgetExceeded {
                prefix,
                suffix,
                max_name_length,
            } => write!(
                f,
                "name budget exceeded: prefix `{prefix}` ({}) + suffix `{suffix}` ({}) leaves no room within {max_name_length} characters",
                prefix.chars().count(),
                suffix.chars().count()
            ),
            Self::InvalidRole { role, policy } if policy.is_empty() => write!(
                f,
                "unknown role `{role}` (expected compliant, nonCompliant or exempted)"
            ),
            Self::InvalidRole { role, policy } => {
                write!(f, "role `{role}` has no configured suffix for policy {policy}")
            }
            Self::FileNotFound { path } => {
                write!(f, "policy definition file not found: {}", path.display())
            }
        }
    }
}

impl std::error::Error for HarnessError {}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineError {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

impl MachineError {
    #[must_use]
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_detail(mut self, key: &str, value: &str) -> Self {
        self.details.insert(key.to_string(), value.to_string());
        self
    }
}

impl fmt::Display for MachineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for MachineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_error_carries_variant_details() {
        let err = HarnessError::NameBudgetExceeded {
            prefix: "testpolicystorageaccount".to_string(),
            suffix: "comp".to_string(),
            max_name_length: 24,
        };
        let machine = err.to_machine_error();
        assert_eq!(machine.code, "name_budget_exceeded");
        assert_eq!(machine.details.get("max_name_length").map(String::as_str), Some("24"));
        assert!(machine.message.contains("(24)"));
    }

    #[test]
    fn not_found_display_names_kind_and_key() {
        let err = HarnessError::not_found("environment", "staging");
        assert_eq!(err.to_string(), "environment not found: staging");
        assert_eq!(err.exit_code(), ExitCode::Validation);
    }
}
