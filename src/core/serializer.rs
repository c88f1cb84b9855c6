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

//! src/core/serializer.rs
//!
//! Canonical text emission for kanshi configuration documents
//!
//! The inverse of the parser, up to normalization: indentation, comments,
//! source directive order, and inline-vs-block style are all canonicalized
//! away, but re-parsing the emitted text always yields a field-wise equal
//! document. On its own output the serializer is byte-idempotent.

use crate::core::types::{Config, Output};

/// Serialises a configuration document into kanshi config format.
///
/// Total function: any well-formed [`Config`] value serialises. Canonical
/// form is one blank line between profiles, every output as a full block
/// with two-space/four-space indentation, and a fixed directive order
/// (`enable`/`disable`, `mode`, `scale`, `position`, `transform`,
/// `adaptive_sync`) regardless of the order directives were parsed in.
///
/// # Example
/// ```
/// use kanshi_profile_manager::core::{parser::parse, serializer::serialize};
///
/// let config = parse("profile \"Home\" { output eDP-1 enable }")?;
/// let text = serialize(&config);
/// assert!(text.starts_with("profile \"Home\" {\n"));
/// # Ok::<(), kanshi_profile_manager::core::parser::ParseError>(())
/// ```
pub fn serialize(config: &Config) -> String {
    let mut out = String::new();

    for (i, profile) in config.profiles.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }

        match &profile.name {
            Some(name) => out.push_str(&format!("profile \"{}\" {{\n", name)),
            None => out.push_str("profile {\n"),
        }

        for output in &profile.outputs {
            serialize_output(&mut out, output);
        }

        out.push_str("}\n");
    }

    out
}

fn serialize_output(out: &mut String, output: &Output) {
    out.push_str(&format!("  output \"{}\" {{\n", output.criteria));

    if let Some(enabled) = output.enabled {
        out.push_str(if enabled { "    enable\n" } else { "    disable\n" });
    }

    if let Some(mode) = &output.mode {
        out.push_str(&format!("    mode {}\n", mode));
    }

    if let Some(scale) = output.scale {
        out.push_str(&format!("    scale {}\n", format_scale(scale)));
    }

    if let Some(position) = &output.position {
        out.push_str(&format!("    position {}\n", position));
    }

    if let Some(transform) = &output.transform {
        out.push_str(&format!("    transform {}\n", transform));
    }

    if let Some(adaptive_sync) = output.adaptive_sync {
        out.push_str(if adaptive_sync {
            "    adaptive_sync on\n"
        } else {
            "    adaptive_sync off\n"
        });
    }

    out.push_str("  }\n\n");
}

/// Formats a scale factor without trailing zeros, but with at least one
/// decimal so the token re-parses as a float (`2.0`, never a bare `2`).
fn format_scale(scale: f64) -> String {
    let mut formatted = format!("{}", scale);
    if !formatted.contains('.') {
        formatted.push_str(".0");
    }
    formatted
}
