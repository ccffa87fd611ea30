// SPDX-License-Identifier: Apache-2.0

//! IO boundaries consumed by the resolver and the environment validator.
//!
//! Boundary: `govharness-config` depends on these traits;
//! `govharness-adapters` implements them against the real platform.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    Process { program: String, detail: String },
    Decode { source: &'static str, detail: String },
    Network { detail: String },
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Process { program, detail } => write!(f, "process error: {program} ({detail})"),
            Self::Decode { source, detail } => write!(f, "decode error: {source} ({detail})"),
            Self::Network { detail } => write!(f, "network error: {detail}"),
        }
    }
}

impl std::error::Error for AdapterError {}

/// Identity of the session that test resources will be created under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthContext {
    pub account: String,
    pub account_type: String,
    pub tenant_id: String,
    #[serde(default)]
    pub subscription_id: Option<String>,
    #[serde(default)]
    pub subscription_name: Option<String>,
}

pub trait SessionProvider {
    /// `Ok(None)` means no session is active; errors are reserved for the
    /// provider itself being unusable.
    fn current_session(&self) -> Result<Option<AuthContext>, AdapterError>;
}

pub trait ScopeLookup {
    fn scope_exists(&self, scope_id: &str) -> Result<bool, AdapterError>;
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCapture {
    pub program: String,
    pub args: Vec<String>,
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandCapture {
    #[must_use]
    pub const fn success(&self) -> bool {
        self.status == 0
    }
}

pub trait CommandRunner {
    fn capture(&self, program: &str, args: &[String]) -> Result<CommandCapture, AdapterError>;
}
