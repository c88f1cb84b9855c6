//! src/core/types.rs
//!
//! Document model for kanshi configuration files
//!
//! This module defines the in-memory representation of a config file:
//! - `Config`: an ordered sequence of profiles (one per file)
//! - `Profile`: a named or anonymous group of output entries
//! - `Output`: one display's directives within a profile
//! - `Position`: a signed x,y coordinate pair
//!
//! Profile and output order mirrors file order and survives a
//! load/edit/save cycle. Every directive is optional and tri-state aware:
//! `None` means the directive was absent, which is distinct from an
//! explicit `enable`/`disable` or `adaptive_sync off`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A complete kanshi configuration file.
///
/// Produced by a successful parse and replaced wholesale on reload. The
/// tree below it is a single owned value; callers mutate it in place and
/// hand it back to the serializer.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Config {
    /// Profiles in file order.
    pub profiles: Vec<Profile>,
}

/// A kanshi profile: one physical display arrangement.
///
/// The format permits anonymous profiles (no name token before the opening
/// brace) and duplicate names. Duplicates are preserved as separate
/// entries; which one a consuming daemon honours is its own business.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Profile name, absent for anonymous profiles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Output entries in file order.
    #[serde(default)]
    pub outputs: Vec<Output>,
}

/// One output entry within a profile.
///
/// Matched against real hardware by `criteria` (commonly a
/// "Make Model Serial" description or a connector name). Directive fields
/// are `None` when the directive did not appear in the source; the
/// serializer emits no line for them.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    /// Matcher string identifying the physical output.
    pub criteria: String,

    /// `Some(true)` for `enable`, `Some(false)` for `disable`, `None`
    /// when the profile leaves the power state unspecified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Raw mode token (e.g. "1920x1080@60Hz"); not decomposed here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Display scale factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,

    /// Logical position within the overall layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,

    /// Raw transform token (numeric degrees or a named orientation).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,

    /// Variable refresh rate toggle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adaptive_sync: Option<bool>,
}

impl Output {
    /// Creates an output entry with the given criteria and no directives.
    pub fn new(criteria: impl Into<String>) -> Self {
        Self {
            criteria: criteria.into(),
            ..Self::default()
        }
    }
}

/// An x,y coordinate pair. Both components are signed: outputs left of or
/// above the origin have negative coordinates.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}
