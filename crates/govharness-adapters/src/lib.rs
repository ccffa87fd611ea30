// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! Real implementations of the `govharness-core` ports.

mod az;

use govharness_core::ports::{AdapterError, CommandCapture, CommandRunner};

pub use az::{AzCliScopeLookup, AzCliSessionProvider, ScopeKind};

pub const CRATE_NAME: &str = "govharness-adapters";

#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn capture(&self, program: &str, args: &[String]) -> Result<CommandCapture, AdapterError> {
        let output = std::process::Command::new(program)
            .args(args)
            .output()
            .map_err(|err| AdapterError::Process {
                program: program.to_string(),
                detail: err.to_string(),
            })?;
        Ok(CommandCapture {
            program: program.to_string(),
            args: args.to_vec(),
            status: output.status.code().unwrap_or(1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
