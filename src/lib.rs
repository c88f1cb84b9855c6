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

//! kanshi Profile Manager
//!
//! A display profile manager for the kanshi daemon with niri compositor
//! integration.
//!
//! # Features
//!
//! - **Faithful parsing:** Reads real-world kanshi configs, hand-edited
//!   ones included, with byte-offset error reporting
//! - **Canonical serialization:** Saved files always come out in one
//!   normalized shape that re-parses to an equal document
//! - **Automatic Backups:** Timestamped backups before every config change
//! - **Atomic Operations:** Safe file writes, rollback always possible
//! - **niri integration:** Detect connected outputs and live-preview an
//!   entry's settings without touching the config file
//!
//! # Architecture
//!
//! - **`core`:** Pure business logic (document model, parser, serializer)
//! - **`config`:** File operations (reading, atomic writes, backups)
//! - **`ipc`:** External process integration (niri queries, kanshi reload)
//!
//! The core never performs I/O, and the I/O layers never interpret config
//! text themselves; text crosses the boundary in exactly two places
//! (`load` and `save`).
//!
//! # Examples
//!
//! ## Parsing and re-serializing a config
//!
//! ```
//! use kanshi_profile_manager::core::{parser::parse, serializer::serialize};
//!
//! let text = "profile \"Home\" {\n  output eDP-1 enable scale 1.25\n}\n";
//! let config = parse(text)?;
//! assert_eq!(config.profiles[0].outputs[0].scale, Some(1.25));
//!
//! // Canonical form: block style, fixed directive order
//! let canonical = serialize(&config);
//! assert!(canonical.contains("    scale 1.25\n"));
//! # Ok::<(), kanshi_profile_manager::core::parser::ParseError>(())
//! ```
//!
//! ## Editing a config on disk
//!
//! ```no_run
//! use kanshi_profile_manager::config::ConfigManager;
//!
//! let manager = ConfigManager::new("/home/user/.config/kanshi/config".into())?;
//! let mut config = manager.load()?;
//! config.profiles[0].outputs[0].scale = Some(1.5);
//! manager.save(&config)?; // backup + atomic replace
//! # Ok::<(), kanshi_profile_manager::config::ConfigError>(())
//! ```
//!
//! ## Previewing settings via niri
//!
//! ```no_run
//! use kanshi_profile_manager::core::Output;
//! use kanshi_profile_manager::ipc::{ClientMode, NiriClient};
//!
//! let client = NiriClient::new(ClientMode::Live);
//! let mut entry = Output::new("eDP-1");
//! entry.enabled = Some(true);
//! entry.scale = Some(1.5);
//! client.apply_output("eDP-1", &entry)?;
//! # Ok::<(), kanshi_profile_manager::ipc::IpcError>(())
//! ```

pub mod config;
pub mod core;
pub mod ipc;

// Re-export commonly used types for convenience
pub use crate::core::{Config, Output, Position, Profile};
