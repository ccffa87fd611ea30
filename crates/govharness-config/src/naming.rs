// SPDX-License-Identifier: Apache-2.0

//! Length-bounded names for transient test resources.
//!
//! A name is `body + suffix`, where the body is the policy name prefix
//! followed by a timestamp. When the body does not fit, the timestamp tail
//! (the fastest-changing digits) wins over prefix readability. The suffix is
//! never cut: it encodes the resource's role.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use govharness_core::ports::{Clock, SystemClock};
use govharness_core::HarnessError;
use tracing::debug;

use crate::limits::MIN_KEPT_TIMESTAMP_CHARS;
use crate::schema::{EffectiveConfiguration, GeneratedName, Role};

pub fn generate_name(
    config: &EffectiveConfiguration,
    role: Role,
) -> Result<GeneratedName, HarnessError> {
    generate_name_at(config, role, &SystemClock)
}

pub fn generate_name_at(
    config: &EffectiveConfiguration,
    role: Role,
    clock: &dyn Clock,
) -> Result<GeneratedName, HarnessError> {
    let suffix = config.suffix_for(role)?;
    let prefix = config.policy.name_prefix.as_str();
    let timestamp = render_timestamp(&config.naming.timestamp_format, clock.now())?;
    let value = pack_name(prefix, &timestamp, suffix, config.naming.max_name_length)?;
    debug!(
        policy = %config.policy.name,
        role = %role,
        name = %value,
        max_name_length = config.naming.max_name_length,
        "generated test resource name"
    );
    Ok(GeneratedName { value, role })
}

/// Packs `prefix`, `timestamp` and `suffix` into at most `max_len` characters.
pub fn pack_name(
    prefix: &str,
    timestamp: &str,
    suffix: &str,
    max_len: usize,
) -> Result<String, HarnessError> {
    let prefix_len = prefix.chars().count();
    let suffix_len = suffix.chars().count();
    if prefix_len + suffix_len >= max_len {
        return Err(HarnessError::NameBudgetExceeded {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            max_name_length: max_len,
        });
    }

    let body_budget = max_len - suffix_len;
    let timestamp_len = timestamp.chars().count();

    let body = if prefix_len + timestamp_len <= body_budget {
        format!("{prefix}{timestamp}")
    } else {
        let kept = MIN_KEPT_TIMESTAMP_CHARS.min(timestamp_len);
        if kept > body_budget {
            tail(timestamp, body_budget)
        } else {
            let prefix_take = prefix_len.min(body_budget - kept);
            let mut body = head(prefix, prefix_take);
            body.push_str(&tail(timestamp, body_budget - prefix_take));
            body
        }
    };

    let mut name = body;
    name.push_str(suffix);
    Ok(name.to_ascii_lowercase())
}

pub fn render_timestamp(format: &str, now: DateTime<Utc>) -> Result<String, HarnessError> {
    let items = parse_timestamp_format(format)?;
    let mut out = String::new();
    write!(out, "{}", now.format_with_items(items.iter())).map_err(|_| {
        HarnessError::MalformedConfig(format!("timestamp format `{format}` failed to render"))
    })?;
    Ok(out)
}

pub(crate) fn validate_timestamp_format(format: &str) -> Result<(), HarnessError> {
    if format.trim().is_empty() {
        return Err(HarnessError::MalformedConfig(
            "naming.timestampFormat must not be empty".to_string(),
        ));
    }
    render_timestamp(format, DateTime::<Utc>::UNIX_EPOCH).map(|_| ())
}

fn parse_timestamp_format(format: &str) -> Result<Vec<Item<'_>>, HarnessError> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(HarnessError::MalformedConfig(format!(
            "naming.timestampFormat `{format}` is not a valid strftime pattern"
        )));
    }
    Ok(items)
}

fn head(value: &str, count: usize) -> String {
    value.chars().take(count).collect()
}

fn tail(value: &str, count: usize) -> String {
    let len = value.chars().count();
    value.chars().skip(len.saturating_sub(count)).collect()
}
