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

//! IPC module tests
//!
//! Command planning and niri JSON mapping are pure and tested directly.
//! Process-spawning paths are exercised through DryRun/ReadOnly modes so
//! no test ever needs a running compositor.

use crate::core::types::{Output, Position};
use crate::ipc::{outputs::parse_outputs_json, plan_commands, ClientMode, IpcError, NiriClient};

/// Helper: an output entry with every directive set.
fn full_output() -> Output {
    Output {
        criteria: "Dell Inc. DELL U3419W 7VK66T2".to_string(),
        enabled: Some(true),
        mode: Some("3440x1440@59.973Hz".to_string()),
        scale: Some(1.25),
        position: Some(Position { x: 1920, y: 0 }),
        transform: Some("normal".to_string()),
        adaptive_sync: Some(true),
    }
}

fn joined(plan: &[Vec<String>]) -> Vec<String> {
    plan.iter().map(|args| args.join(" ")).collect()
}

#[test]
fn test_plan_applies_actions_in_fixed_order() {
    let plan = plan_commands("DP-3", &full_output());

    assert_eq!(
        joined(&plan),
        vec![
            "msg output DP-3 on",
            "msg output DP-3 mode 3440x1440@59.973Hz",
            "msg output DP-3 scale 1.25",
            "msg output DP-3 transform normal",
            "msg output DP-3 position set 1920 0",
            "msg output DP-3 vrr on",
        ]
    );
}

#[test]
fn test_plan_off_short_circuits_everything_else() {
    let mut output = full_output();
    output.enabled = Some(false);

    let plan = plan_commands("DP-3", &output);
    assert_eq!(joined(&plan), vec!["msg output DP-3 off"]);
}

#[test]
fn test_plan_skips_absent_directives() {
    let mut output = Output::new("eDP-1");
    output.scale = Some(2.0);

    let plan = plan_commands("eDP-1", &output);
    assert_eq!(joined(&plan), vec!["msg output eDP-1 scale 2"]);
}

#[test]
fn test_plan_for_empty_entry_is_empty() {
    assert!(plan_commands("eDP-1", &Output::new("eDP-1")).is_empty());
}

#[test]
fn test_plan_vrr_off() {
    let mut output = Output::new("DP-1");
    output.adaptive_sync = Some(false);

    let plan = plan_commands("DP-1", &output);
    assert_eq!(joined(&plan), vec!["msg output DP-1 vrr off"]);
}

#[test]
fn test_dryrun_apply_never_spawns() {
    let client = NiriClient::new(ClientMode::DryRun);
    // Would fail loudly if anything tried to exec niri on a test runner
    assert!(client.apply_output("DP-3", &full_output()).is_ok());
}

#[test]
fn test_readonly_apply_is_rejected() {
    let client = NiriClient::new(ClientMode::ReadOnly);
    let result = client.apply_output("DP-3", &full_output());
    assert!(matches!(result, Err(IpcError::ReadOnly(_))));
}

#[test]
fn test_readonly_reload_is_rejected() {
    let client = NiriClient::new(ClientMode::ReadOnly);
    assert!(matches!(client.reload_daemon(), Err(IpcError::ReadOnly(_))));
}

#[test]
fn test_dryrun_detect_reports_nothing() {
    let client = NiriClient::new(ClientMode::DryRun);
    assert!(client.detect_outputs().unwrap().is_empty());
}

const NIRI_OUTPUTS_JSON: &str = r#"{
    "eDP-1": {
        "name": "eDP-1",
        "make": "Lenovo Group Limited",
        "model": "0x40A9",
        "serial": null,
        "physical_size": [302, 189],
        "modes": [
            { "width": 2240, "height": 1400, "refresh_rate": 60000, "is_preferred": true },
            { "width": 1920, "height": 1200, "refresh_rate": 59950, "is_preferred": false }
        ],
        "current_mode": 0,
        "vrr_supported": false,
        "vrr_enabled": false,
        "logical": { "x": 0, "y": 0, "width": 1792, "height": 1120, "scale": 1.25, "transform": "normal" }
    },
    "DP-3": {
        "name": "DP-3",
        "make": "Dell Inc.",
        "model": "DELL U3419W",
        "serial": "7VK66T2",
        "physical_size": [798, 335],
        "modes": [
            { "width": 3440, "height": 1440, "refresh_rate": 59973, "is_preferred": true }
        ],
        "current_mode": null,
        "vrr_supported": true,
        "vrr_enabled": false,
        "logical": null
    }
}"#;

#[test]
fn test_parse_outputs_json() {
    let outputs = parse_outputs_json(NIRI_OUTPUTS_JSON).unwrap();
    assert_eq!(outputs.len(), 2);

    // BTreeMap keying: deterministic connector order
    assert_eq!(outputs[0].connector, "DP-3");
    assert_eq!(outputs[1].connector, "eDP-1");

    let dell = &outputs[0];
    assert_eq!(dell.description, "Dell Inc. DELL U3419W 7VK66T2");
    assert_eq!(dell.serial, "7VK66T2");
    assert!(dell.current_mode.is_none(), "output is off, no current mode");
    assert_eq!(dell.available_modes.len(), 1);
    assert!((dell.available_modes[0].refresh_rate - 59.973).abs() < 1e-9);
    assert!(dell.available_modes[0].is_preferred);
    assert_eq!(dell.logical_position, None);
    assert_eq!(dell.scale, None);
    assert!(dell.vrr_supported);

    let laptop = &outputs[1];
    // Missing serial becomes "Unknown" in the criteria string
    assert_eq!(laptop.description, "Lenovo Group Limited 0x40A9 Unknown");
    assert_eq!(laptop.serial, "");
    let current = laptop.current_mode.expect("panel is driving a mode");
    assert_eq!((current.width, current.height), (2240, 1400));
    assert!((current.refresh_rate - 60.0).abs() < 1e-9);
    assert_eq!(laptop.logical_position, Some(Position { x: 0, y: 0 }));
    assert_eq!(laptop.scale, Some(1.25));
    assert_eq!(laptop.transform.as_deref(), Some("normal"));
    assert_eq!(
        laptop.physical_size.map(|s| (s.width, s.height)),
        Some((302, 189))
    );
}

#[test]
fn test_parse_outputs_json_rejects_garbage() {
    assert!(matches!(
        parse_outputs_json("not json at all"),
        Err(IpcError::InvalidJson(_))
    ));
}

#[test]
fn test_parse_outputs_json_empty_report() {
    assert!(parse_outputs_json("{}").unwrap().is_empty());
}
