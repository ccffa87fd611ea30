// SPDX-License-Identifier: Apache-2.0

//! Pre-flight check of the target environment. This is the only place in the
//! crate that reaches the platform, and only through the two ports.

use govharness_core::ports::{AuthContext, ScopeLookup, SessionProvider};
use tracing::{debug, warn};

use crate::schema::{EffectiveConfiguration, ValidationResult};

/// Checks, in order and stopping at the first failure, that a session is
/// active and (when `behavior.validateScopeExists` is set) that the target
/// scope exists. Failures are returned, never raised.
pub fn validate_environment(
    config: &EffectiveConfiguration,
    sessions: &dyn SessionProvider,
    scopes: &dyn ScopeLookup,
) -> ValidationResult {
    let auth = match sessions.current_session() {
        Ok(Some(auth)) => auth,
        Ok(None) => {
            return failed(
                config,
                None,
                resolved_scope_id(config, None),
                "no active session found; sign in to the platform before running policy tests"
                    .to_string(),
            )
        }
        Err(err) => {
            return failed(
                config,
                None,
                resolved_scope_id(config, None),
                format!("session provider unavailable: {err}"),
            )
        }
    };

    let resolved = resolved_scope_id(config, Some(&auth));
    if config.behavior.validate_scope_exists {
        let Some(scope_id) = resolved else {
            return failed(
                config,
                Some(auth),
                None,
                format!(
                    "no target scope configured for environment {}",
                    config.environment
                ),
            );
        };
        match scopes.scope_exists(&scope_id) {
            Ok(true) => {}
            Ok(false) => {
                let message = format!("target scope not found or not accessible: {scope_id}");
                return failed(config, Some(auth), Some(scope_id), message);
            }
            Err(err) => {
                let message = format!("target scope lookup failed for {scope_id}: {err}");
                return failed(config, Some(auth), Some(scope_id), message);
            }
        }
        return passed(config, auth, Some(scope_id));
    }

    passed(config, auth, resolved)
}

/// The configured target scope, else the subscription scope taken from the
/// configuration or, failing that, from the active session.
#[must_use]
pub fn resolved_scope_id(
    config: &EffectiveConfiguration,
    auth: Option<&AuthContext>,
) -> Option<String> {
    if let Some(scope) = config.scope.target_scope_id.as_deref() {
        return Some(scope.to_string());
    }
    config
        .scope
        .subscription_id
        .as_deref()
        .or_else(|| auth.and_then(|a| a.subscription_id.as_deref()))
        .map(|id| format!("/subscriptions/{id}"))
}

fn passed(
    config: &EffectiveConfiguration,
    auth: AuthContext,
    resolved_scope_id: Option<String>,
) -> ValidationResult {
    debug!(
        environment = %config.environment,
        account = %auth.account,
        scope = ?resolved_scope_id,
        "environment validated"
    );
    ValidationResult {
        success: true,
        auth_context: Some(auth),
        resolved_scope_id,
        errors: Vec::new(),
    }
}

fn failed(
    config: &EffectiveConfiguration,
    auth: Option<AuthContext>,
    resolved_scope_id: Option<String>,
    error: String,
) -> ValidationResult {
    warn!(environment = %config.environment, error = %error, "environment validation failed");
    ValidationResult {
        success: false,
        auth_context: auth,
        resolved_scope_id,
        errors: vec![error],
    }
}
