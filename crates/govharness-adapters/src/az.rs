// SPDX-License-Identifier: Apache-2.0

//! Session and scope checks through the `az` command line.

use govharness_core::ports::{
    AdapterError, AuthContext, CommandCapture, CommandRunner, ScopeLookup, SessionProvider,
};
use serde::Deserialize;
use tracing::debug;

const AZ: &str = "az";
const MANAGEMENT_GROUP_PREFIX: &str = "/providers/Microsoft.Management/managementGroups/";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AzAccount {
    id: String,
    name: String,
    tenant_id: String,
    user: AzUser,
}

#[derive(Debug, Deserialize)]
struct AzUser {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

impl From<AzAccount> for AuthContext {
    fn from(account: AzAccount) -> Self {
        Self {
            account: account.user.name,
            account_type: account.user.kind,
            tenant_id: account.tenant_id,
            subscription_id: Some(account.id),
            subscription_name: Some(account.name),
        }
    }
}

/// Reads the signed-in account from `az account show`.
#[derive(Debug, Default)]
pub struct AzCliSessionProvider<R> {
    runner: R,
}

impl<R: CommandRunner> AzCliSessionProvider<R> {
    pub const fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> SessionProvider for AzCliSessionProvider<R> {
    fn current_session(&self) -> Result<Option<AuthContext>, AdapterError> {
        let capture = run(&self.runner, &["account", "show", "--output", "json"])?;
        if !capture.success() {
            debug!(stderr = %capture.stderr.trim(), "no active az session");
            return Ok(None);
        }
        let account: AzAccount =
            serde_json::from_str(&capture.stdout).map_err(|err| AdapterError::Decode {
                source: "az account show",
                detail: err.to_string(),
            })?;
        Ok(Some(account.into()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind<'a> {
    ManagementGroup(&'a str),
    Subscription(&'a str),
    ResourceGroup {
        subscription: &'a str,
        name: &'a str,
    },
    Resource(&'a str),
}

impl<'a> ScopeKind<'a> {
    /// Classifies an ARM scope id by its leading segments.
    #[must_use]
    pub fn classify(scope_id: &'a str) -> Self {
        let trimmed = scope_id.trim_end_matches('/');
        if let Some(name) = strip_prefix_ignore_case(trimmed, MANAGEMENT_GROUP_PREFIX) {
            if !name.is_empty() && !name.contains('/') {
                return Self::ManagementGroup(name);
            }
        }
        if let Some(rest) = strip_prefix_ignore_case(trimmed, "/subscriptions/") {
            let segments: Vec<&str> = rest.split('/').collect();
            match *segments.as_slice() {
                [subscription] if !subscription.is_empty() => {
                    return Self::Subscription(subscription)
                }
                [subscription, group, name]
                    if group.eq_ignore_ascii_case("resourceGroups") && !name.is_empty() =>
                {
                    return Self::ResourceGroup { subscription, name }
                }
                _ => {}
            }
        }
        Self::Resource(scope_id)
    }
}

/// Checks scope existence with the narrowest `az` command for the scope kind.
#[derive(Debug, Default)]
pub struct AzCliScopeLookup<R> {
    runner: R,
}

impl<R: CommandRunner> AzCliScopeLookup<R> {
    pub const fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> ScopeLookup for AzCliScopeLookup<R> {
    fn scope_exists(&self, scope_id: &str) -> Result<bool, AdapterError> {
        let kind = ScopeKind::classify(scope_id);
        let exists = match kind {
            ScopeKind::ManagementGroup(name) => run(
                &self.runner,
                &["account", "management-group", "show", "--name", name, "--output", "json"],
            )?
            .success(),
            ScopeKind::Subscription(id) => run(
                &self.runner,
                &["account", "show", "--subscription", id, "--output", "json"],
            )?
            .success(),
            ScopeKind::ResourceGroup { subscription, name } => {
                let capture = run(
                    &self.runner,
                    &["group", "exists", "--name", name, "--subscription", subscription],
                )?;
                capture.success() && capture.stdout.trim().eq_ignore_ascii_case("true")
            }
            ScopeKind::Resource(id) => run(
                &self.runner,
                &["resource", "show", "--ids", id, "--output", "json"],
            )?
            .success(),
        };
        debug!(scope = %scope_id, kind = ?kind, exists, "scope lookup");
        Ok(exists)
    }
}

fn run<R: CommandRunner>(runner: &R, args: &[&str]) -> Result<CommandCapture, AdapterError> {
    let args: Vec<String> = args.iter().map(|arg| (*arg).to_string()).collect();
    runner.capture(AZ, &args)
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &value[prefix.len()..])
}
