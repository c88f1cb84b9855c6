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

//! src/core/mod.rs
//!
//! Core business logic module
//!
//! This module contains the document model and the two pure
//! transformations over it:
//! - Type definitions for profiles, outputs, and directive values
//! - The config parser (text -> document)
//! - The canonical serializer (document -> text)
//!
//! Everything here is synchronous, allocation-only, and free of I/O, so
//! it can be unit tested without a compositor or a real config file.
//! Parser and serializer are inverses up to normalization: a parsed
//! document re-serialises to text that parses back field-wise equal.

pub mod parser;
pub mod serializer;
pub mod types;

pub use parser::{parse, ParseError};
pub use serializer::serialize;
pub use types::*;

#[cfg(test)]
mod tests;
