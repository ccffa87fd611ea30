// SPDX-License-Identifier: Apache-2.0

use govharness_core::canonical;
use serde_json::Value;

use crate::{CliError, OutputMode};

pub(crate) fn emit_ok(output_mode: OutputMode, payload: &Value) -> Result<(), CliError> {
    let text = if output_mode.json {
        let bytes = canonical::stable_json_bytes(payload)
            .map_err(|e| CliError::internal(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| CliError::internal(e.to_string()))?
    } else {
        serde_json::to_string_pretty(payload).map_err(|e| CliError::internal(e.to_string()))?
    };
    println!("{text}");
    Ok(())
}

pub(crate) fn emit_error(error: &CliError, machine_json: bool) {
    if machine_json {
        match serde_json::to_string(&error.machine) {
            Ok(payload) => eprintln!("{payload}"),
            Err(_) => eprintln!(
                "{{\"code\":\"internal_error\",\"message\":\"failed to encode structured error\",\"details\":{{}}}}"
            ),
        }
    } else {
        eprintln!("{}", error.machine.message);
    }
}
