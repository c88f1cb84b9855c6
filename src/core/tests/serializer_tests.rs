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

//! Serializer module tests
//!
//! Tests for canonical text emission:
//! - Exact canonical form (indentation, quoting, blank lines)
//! - Fixed directive order and numeric formatting
//! - Round-trip and idempotency properties

use crate::core::{
    parser::parse,
    serializer::serialize,
    types::{Config, Output, Position, Profile},
};

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

#[test]
fn test_serialize_concrete_scenario() {
    let input = r#"profile "Home" {
  output "Dell Inc. DELL U3419W 7VK66T2" {
    enable
    scale 1.25
    position 0,0
  }
}
"#;
    let config = parse(input).unwrap();
    let profile = &config.profiles[0];
    assert_eq!(profile.name.as_deref(), Some("Home"));
    let output = &profile.outputs[0];
    assert_eq!(output.criteria, "Dell Inc. DELL U3419W 7VK66T2");
    assert_eq!(output.enabled, Some(true));
    assert_eq!(output.scale, Some(1.25));
    assert_eq!(output.position, Some(Position { x: 0, y: 0 }));
    assert_eq!(output.mode, None);
    assert_eq!(output.transform, None);
    assert_eq!(output.adaptive_sync, None);

    let expected = "profile \"Home\" {\n  output \"Dell Inc. DELL U3419W 7VK66T2\" {\n    enable\n    scale 1.25\n    position 0,0\n  }\n\n}\n";
    assert_eq!(serialize(&config), expected);
}

#[test]
fn test_scale_formatting() {
    let mut output = Output::new("X");
    output.scale = Some(2.0);
    let config = Config {
        profiles: vec![Profile {
            name: Some("P".to_string()),
            outputs: vec![output],
        }],
    };

    let text = serialize(&config);
    assert!(text.contains("    scale 2.0\n"), "got: {}", text);
    assert!(!text.contains("scale 2\n"), "bare integer scale in: {}", text);

    let mut config = config;
    config.profiles[0].outputs[0].scale = Some(1.25);
    assert!(serialize(&config).contains("    scale 1.25\n"));
}

#[test]
fn test_absent_fields_emit_no_lines() {
    let config = Config {
        profiles: vec![Profile {
            name: Some("P".to_string()),
            outputs: vec![Output::new("X")],
        }],
    };
    let text = serialize(&config);
    assert_eq!(
        text,
        "profile \"P\" {\n  output \"X\" {\n  }\n\n}\n"
    );
}

#[test]
fn test_anonymous_profile_header() {
    let config = Config {
        profiles: vec![Profile::default()],
    };
    assert_eq!(serialize(&config), "profile {\n}\n");
}

#[test]
fn test_blank_line_between_profiles() {
    let config = Config {
        profiles: vec![
            Profile {
                name: Some("A".to_string()),
                outputs: vec![],
            },
            Profile {
                name: Some("B".to_string()),
                outputs: vec![],
            },
        ],
    };
    assert_eq!(serialize(&config), "profile \"A\" {\n}\n\nprofile \"B\" {\n}\n");
}

#[test]
fn test_boolean_directives_render_as_keywords() {
    let mut off = Output::new("X");
    off.enabled = Some(false);
    off.adaptive_sync = Some(false);
    let config = Config {
        profiles: vec![Profile {
            name: None,
            outputs: vec![off],
        }],
    };
    let text = serialize(&config);
    assert!(text.contains("    disable\n"));
    assert!(text.contains("    adaptive_sync off\n"));
    assert!(!text.contains("="));
}

#[test]
fn test_directive_order_is_canonical() {
    // Source order is scrambled; emission order is fixed.
    let input = "profile \"P\" {\n  output \"X\" {\n    adaptive_sync on\n    position 5,6\n    transform 90\n    enable\n    scale 1.5\n    mode 1920x1080@60Hz\n  }\n}\n";
    let text = serialize(&parse(input).unwrap());

    let order = [
        "    enable\n",
        "    mode 1920x1080@60Hz\n",
        "    scale 1.5\n",
        "    position 5,6\n",
        "    transform 90\n",
        "    adaptive_sync on\n",
    ];
    let mut last = 0;
    for line in order {
        let at = text.find(line).unwrap_or_else(|| panic!("missing {:?} in {}", line, text));
        assert!(at >= last, "{:?} out of order in {}", line, text);
        last = at;
    }
}

#[test]
fn test_round_trip_on_representable_input() {
    // Hand-written style: inline entries, comments, odd whitespace.
    let input = "# home setup\nprofile \"Home\" {\n  output eDP-1 enable scale 1.5\n  output \"Dell Inc. DELL U3419W 7VK66T2\" {\n\tmode 3440x1440@59.973Hz\n    position 0,0\n    adaptive_sync on\n  }\n}\n\nprofile {\n  output \"*\" disable\n}\n";
    let first = parse(input).unwrap();
    let second = parse(&serialize(&first)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_serialize_is_idempotent_on_own_output() {
    let config = Config {
        profiles: vec![
            Profile {
                name: Some("Desk".to_string()),
                outputs: vec![full_output()],
            },
            Profile {
                name: None,
                outputs: vec![{
                    let mut o = Output::new("HDMI-A-1");
                    o.enabled = Some(false);
                    o
                }],
            },
        ],
    };

    let once = serialize(&config);
    let twice = serialize(&parse(&once).unwrap());
    assert_eq!(once, twice);
}

#[test]
fn test_unknown_directives_dropped_from_round_trip() {
    let input = "profile \"P\" {\n  output \"X\" {\n    enable\n    max_bpc 10\n  }\n}\n";
    let text = serialize(&parse(input).unwrap());
    assert!(!text.contains("max_bpc"));
    assert!(text.contains("    enable\n"));
}

#[test]
fn test_position_renders_without_spaces() {
    let mut output = Output::new("X");
    output.position = Some(Position { x: -384, y: 1200 });
    let config = Config {
        profiles: vec![Profile {
            name: Some("P".to_string()),
            outputs: vec![output],
        }],
    };
    assert!(serialize(&config).contains("    position -384,1200\n"));
}
