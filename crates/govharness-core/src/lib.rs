// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

pub mod canonical;
mod errors;
pub mod ports;
mod workspace;

pub use errors::{ExitCode, HarnessError, MachineError};
pub use workspace::{discover_workspace_root, resolve_workspace_root};

pub const CRATE_NAME: &str = "govharness-core";

pub const ENV_GOVHARNESS_ROOT: &str = "GOVHARNESS_ROOT";
pub const ENV_GOVHARNESS_ENVIRONMENT: &str = "GOVHARNESS_ENVIRONMENT";
pub const ENV_GOVHARNESS_LOG_LEVEL: &str = "GOVHARNESS_LOG_LEVEL";
