// SPDX-License-Identifier: Apache-2.0

use crate::schema::EnvironmentId;

/// Trailing timestamp characters kept when a name has to be truncated.
pub const MIN_KEPT_TIMESTAMP_CHARS: usize = 8;

pub const DEFAULT_ENVIRONMENT: EnvironmentId = EnvironmentId::Dev;

pub const CATALOG_REQUIRED_SECTIONS: [&str; 2] = ["policies", "environments"];

pub const BASE_REQUIRED_SECTIONS: [&str; 6] = [
    "timeouts",
    "behavior",
    "naming",
    "scope",
    "moduleGroups",
    "tagTaxonomy",
];
