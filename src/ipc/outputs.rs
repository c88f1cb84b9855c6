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

//! src/ipc/outputs.rs
//!
//! niri output detection
//!
//! Maps the report from `niri msg --json outputs` into display
//! description records: the hardware shown next to saved profiles, with
//! the "Make Model Serial" string kanshi uses as matching criteria.
//!
//! niri reports a JSON object keyed by connector name, refresh rates in
//! millihertz, the current mode as an index into the mode list, and the
//! physical size as a `[width, height]` array. All of that is normalised
//! here so the rest of the application never sees niri's wire shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::Position;
use crate::ipc::IpcError;

/// A connected output as reported by niri.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedOutput {
    /// Connector name (e.g. "eDP-1", "DP-3").
    pub connector: String,
    pub make: String,
    pub model: String,
    pub serial: String,

    /// kanshi-style criteria string: "Make Model Serial", with "Unknown"
    /// standing in for a missing serial.
    pub description: String,

    /// The mode the output is currently driving, if any.
    pub current_mode: Option<Mode>,
    pub available_modes: Vec<Mode>,

    /// Placement within the layout; absent when the output is not mapped.
    pub logical_position: Option<Position>,
    /// Scaled dimensions within the layout.
    pub logical_size: Option<Size>,
    pub scale: Option<f64>,
    pub transform: Option<String>,

    /// Panel dimensions in millimetres.
    pub physical_size: Option<Size>,

    pub vrr_supported: bool,
    pub vrr_enabled: bool,
}

/// A display mode.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mode {
    pub width: i32,
    pub height: i32,
    /// In Hz (e.g. 59.973); niri reports millihertz.
    pub refresh_rate: f64,
    pub is_current: bool,
    pub is_preferred: bool,
}

/// Width/height dimensions.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// Wire shape of one entry in `niri msg --json outputs`.
#[derive(Debug, Deserialize)]
struct RawOutput {
    #[serde(default)]
    make: String,
    #[serde(default)]
    model: String,
    // nullable in the report
    #[serde(default)]
    serial: Option<String>,
    #[serde(default)]
    physical_size: Option<[i32; 2]>,
    #[serde(default)]
    modes: Vec<RawMode>,
    /// Index into `modes`; null when the output is off.
    #[serde(default)]
    current_mode: Option<usize>,
    #[serde(default)]
    logical: Option<RawLogical>,
    #[serde(default)]
    vrr_supported: bool,
    #[serde(default)]
    vrr_enabled: bool,
}

#[derive(Debug, Deserialize)]
struct RawMode {
    width: i32,
    height: i32,
    /// Millihertz.
    refresh_rate: i32,
    #[serde(default)]
    is_preferred: bool,
}

#[derive(Debug, Deserialize)]
struct RawLogical {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    scale: f64,
    #[serde(default)]
    transform: String,
}

/// Parses the JSON report from `niri msg --json outputs`.
///
/// The report is an object keyed by connector name; results come back
/// sorted by connector so repeated detections list outputs in a stable
/// order.
pub fn parse_outputs_json(data: &str) -> Result<Vec<ConnectedOutput>, IpcError> {
    let raw: BTreeMap<String, RawOutput> = serde_json::from_str(data)?;

    Ok(raw
        .into_iter()
        .map(|(connector, output)| map_output(connector, output))
        .collect())
}

fn map_output(connector: String, raw: RawOutput) -> ConnectedOutput {
    let serial = raw.serial.unwrap_or_default();

    // kanshi criteria form: "Make Model Serial", serial never omitted
    let mut parts: Vec<&str> = Vec::new();
    if !raw.make.is_empty() {
        parts.push(&raw.make);
    }
    if !raw.model.is_empty() {
        parts.push(&raw.model);
    }
    parts.push(if serial.is_empty() { "Unknown" } else { &serial });
    let description = parts.join(" ");

    let mut current_mode = None;
    let mut available_modes = Vec::with_capacity(raw.modes.len());
    for (i, mode) in raw.modes.iter().enumerate() {
        let mode = Mode {
            width: mode.width,
            height: mode.height,
            refresh_rate: f64::from(mode.refresh_rate) / 1000.0,
            is_current: raw.current_mode == Some(i),
            is_preferred: mode.is_preferred,
        };
        if mode.is_current {
            current_mode = Some(mode);
        }
        available_modes.push(mode);
    }

    let (logical_position, logical_size, scale, transform) = match raw.logical {
        Some(logical) => (
            Some(Position {
                x: logical.x,
                y: logical.y,
            }),
            Some(Size {
                width: logical.width,
                height: logical.height,
            }),
            Some(logical.scale),
            if logical.transform.is_empty() {
                None
            } else {
                Some(logical.transform)
            },
        ),
        None => (None, None, None, None),
    };

    ConnectedOutput {
        connector,
        make: raw.make,
        model: raw.model,
        description,
        current_mode,
        available_modes,
        logical_position,
        logical_size,
        scale,
        transform,
        physical_size: raw.physical_size.map(|[width, height]| Size { width, height }),
        vrr_supported: raw.vrr_supported,
        vrr_enabled: raw.vrr_enabled,
        serial,
    }
}
