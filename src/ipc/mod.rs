// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! niri and kanshi process integration
//!
//! Everything that leaves this process goes through here: querying niri
//! for connected outputs, previewing an output entry's settings via
//! `niri msg output`, and asking a running kanshi daemon to reload.
//!
//! # Safety Modes
//!
//! This module operates in three modes:
//! - **DryRun** (default for tests): Plans commands, never spawns a process
//! - **ReadOnly**: Can query niri, cannot change anything
//! - **Live**: Full access (requires explicit opt-in)
//!
//! # Example
//! ```
//! use kanshi_profile_manager::ipc::{ClientMode, NiriClient};
//! use kanshi_profile_manager::core::Output;
//!
//! // Safe: DryRun mode plans the niri msg calls but never runs them
//! let client = NiriClient::new(ClientMode::DryRun);
//!
//! let mut output = Output::new("eDP-1");
//! output.enabled = Some(true);
//! output.scale = Some(1.5);
//!
//! assert!(client.apply_output("eDP-1", &output).is_ok());
//! ```

use std::process::Command;

use thiserror::Error;

use crate::core::types::Output;

pub mod outputs;

pub use outputs::{ConnectedOutput, Mode, Size};

#[cfg(test)]
mod tests;

/// IPC client operation mode
///
/// Controls what operations are allowed. Tests default to DryRun.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientMode {
    /// Planning only - NEVER spawns a process (default for tests)
    DryRun,

    /// Can query niri but cannot modify output state
    ReadOnly,

    /// Full access - requires explicit opt-in
    Live,
}

/// Errors from external process integration.
///
/// Command failures carry the full command line and the process's
/// combined stdout/stderr so the user sees exactly what niri said.
#[derive(Debug, Error)]
pub enum IpcError {
    /// Operation not permitted in the current client mode.
    #[error("client in read-only mode - cannot {0}")]
    ReadOnly(&'static str),

    /// The external binary could not be spawned at all.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The external command ran but reported failure.
    #[error("`{command}` failed: {output}")]
    CommandFailed { command: String, output: String },

    /// niri's output report did not deserialize.
    #[error("niri returned invalid output JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Neither the control command nor the signal fallback worked.
    #[error("reloading kanshi failed (kanshictl reload: {ctl}; pkill -HUP kanshi: {signal})")]
    ReloadFailed { ctl: String, signal: String },
}

/// Client for the niri compositor and the kanshi daemon.
///
/// Holds no connection state; every call spawns the relevant control
/// binary, mirroring how the tools are meant to be driven. All mutation
/// paths are gated on [`ClientMode`].
pub struct NiriClient {
    mode: ClientMode,
}

impl NiriClient {
    /// Creates a new client in the specified mode.
    pub fn new(mode: ClientMode) -> Self {
        Self { mode }
    }

    /// Queries niri for currently connected outputs.
    ///
    /// Runs `niri msg --json outputs` and maps the report into
    /// [`ConnectedOutput`] records, ordered by connector name.
    ///
    /// In DryRun mode no process is spawned and no outputs are reported.
    ///
    /// # Errors
    ///
    /// Returns `IpcError::Spawn` when niri is not installed,
    /// `IpcError::CommandFailed` when it exits non-zero (e.g. no
    /// compositor session), and `IpcError::InvalidJson` when the report
    /// cannot be deserialized.
    pub fn detect_outputs(&self) -> Result<Vec<ConnectedOutput>, IpcError> {
        if self.mode == ClientMode::DryRun {
            return Ok(Vec::new());
        }

        let command = "niri msg --json outputs";
        let result = Command::new("niri")
            .args(["msg", "--json", "outputs"])
            .output()
            .map_err(|source| IpcError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if !result.status.success() {
            return Err(IpcError::CommandFailed {
                command: command.to_string(),
                output: combined_output(&result),
            });
        }

        outputs::parse_outputs_json(&String::from_utf8_lossy(&result.stdout))
    }

    /// Applies one output entry's directives to a connector via niri.
    ///
    /// Issues one `niri msg output <connector> ...` invocation per
    /// present directive, in a fixed order: `on`, `mode`, `scale`,
    /// `transform`, `position`, `vrr`. Turning the output off
    /// short-circuits everything else - there is no point configuring a
    /// display that is being powered down, and some actions fail on a
    /// powered-off output.
    ///
    /// In DryRun mode the plan is built but nothing is spawned; use
    /// [`plan_commands`] to inspect it.
    ///
    /// # Errors
    ///
    /// Returns `IpcError::ReadOnly` in ReadOnly mode. In Live mode the
    /// first failing invocation aborts the sequence and surfaces the
    /// command line plus niri's combined output. No retries.
    pub fn apply_output(&self, connector: &str, output: &Output) -> Result<(), IpcError> {
        let plan = plan_commands(connector, output);

        match self.mode {
            ClientMode::DryRun => Ok(()),
            ClientMode::ReadOnly => Err(IpcError::ReadOnly("apply output settings")),
            ClientMode::Live => {
                for args in &plan {
                    run_command("niri", args)?;
                }
                Ok(())
            }
        }
    }

    /// Asks the running kanshi daemon to reload its configuration.
    ///
    /// Tries `kanshictl reload` first; when the control command is
    /// unavailable or fails, falls back to `pkill -HUP kanshi`. Only if
    /// both fail is an error returned, carrying both failure messages.
    pub fn reload_daemon(&self) -> Result<(), IpcError> {
        match self.mode {
            ClientMode::DryRun => Ok(()),
            ClientMode::ReadOnly => Err(IpcError::ReadOnly("reload the kanshi daemon")),
            ClientMode::Live => {
                let ctl = match run_command("kanshictl", &["reload".to_string()]) {
                    Ok(()) => return Ok(()),
                    Err(e) => e.to_string(),
                };

                let signal = match run_command("pkill", &["-HUP".to_string(), "kanshi".to_string()]) {
                    Ok(()) => return Ok(()),
                    Err(e) => e.to_string(),
                };

                Err(IpcError::ReloadFailed { ctl, signal })
            }
        }
    }
}

/// Builds the `niri msg` argument lists for one output entry.
///
/// Pure planning half of [`NiriClient::apply_output`]: one argument list
/// per present directive, in application order. An explicit `disable`
/// yields a single `off` command and suppresses everything else.
pub fn plan_commands(connector: &str, output: &Output) -> Vec<Vec<String>> {
    let action = |parts: &[&str]| -> Vec<String> {
        let mut args = vec!["msg".to_string(), "output".to_string(), connector.to_string()];
        args.extend(parts.iter().map(|p| p.to_string()));
        args
    };

    // Powering off skips every other action.
    if output.enabled == Some(false) {
        return vec![action(&["off"])];
    }

    let mut plan = Vec::new();

    if output.enabled == Some(true) {
        plan.push(action(&["on"]));
    }
    if let Some(mode) = &output.mode {
        plan.push(action(&["mode", mode]));
    }
    if let Some(scale) = output.scale {
        plan.push(action(&["scale", &scale.to_string()]));
    }
    if let Some(transform) = &output.transform {
        plan.push(action(&["transform", transform]));
    }
    if let Some(position) = &output.position {
        plan.push(action(&[
            "position",
            "set",
            &position.x.to_string(),
            &position.y.to_string(),
        ]));
    }
    if let Some(adaptive_sync) = output.adaptive_sync {
        plan.push(action(&["vrr", if adaptive_sync { "on" } else { "off" }]));
    }

    plan
}

/// Runs one external command, surfacing its combined output on failure.
fn run_command(program: &str, args: &[String]) -> Result<(), IpcError> {
    let command = format!("{} {}", program, args.join(" "));

    let result = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| IpcError::Spawn {
            command: command.clone(),
            source,
        })?;

    if !result.status.success() {
        return Err(IpcError::CommandFailed {
            command,
            output: combined_output(&result),
        });
    }

    Ok(())
}

fn combined_output(result: &std::process::Output) -> String {
    let mut text = String::from_utf8_lossy(&result.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&result.stderr));
    text.trim().to_string()
}
