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

//! src/core/parser.rs
//!
//! kanshi configuration file parser
//!
//! Turns raw config text into a [`Config`] document. It handles:
//! - Profiles with quoted, unquoted, or absent names
//! - Output entries in block (`{ ... }`) or inline (single-line) form
//! - All modeled directives (enable/disable, mode, scale, position,
//!   transform, adaptive_sync)
//! - Comments and arbitrary whitespace
//! - Byte offsets for error reporting
//!
//! # Architecture
//! A single cursor ([`Scanner`]) walks the input once; there is no
//! separate token stream. Directive keywords the model does not represent
//! are consumed and dropped so that configs written for newer kanshi
//! versions (`exec`, `include`, global output defaults) still load.
//!
//! # Security
//! The parser only reads and structures data - it never executes commands
//! or touches the filesystem. Malformed input produces a [`ParseError`],
//! never a panic.

use thiserror::Error;

use crate::core::types::{Config, Output, Position, Profile};

/// Parse errors with byte-offset context
///
/// Every variant records where in the input the problem was detected so
/// the caller can point the user at the offending spot in their file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("expected '{{' at position {offset}")]
    ExpectedBrace { offset: usize },

    #[error("unexpected end of input in profile opened at position {offset}")]
    UnterminatedProfile { offset: usize },

    #[error("unexpected end of input in output block opened at position {offset}")]
    UnterminatedOutput { offset: usize },

    #[error("invalid scale value \"{value}\" at position {offset}")]
    InvalidScale {
        offset: usize,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("invalid position \"{value}\" at position {offset}, expected x,y")]
    InvalidPosition { offset: usize, value: String },
}

impl ParseError {
    /// Byte offset into the input at which the error was detected.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::ExpectedBrace { offset }
            | ParseError::UnterminatedProfile { offset }
            | ParseError::UnterminatedOutput { offset }
            | ParseError::InvalidScale { offset, .. }
            | ParseError::InvalidPosition { offset, .. } => *offset,
        }
    }
}

/// Parse a complete kanshi config file
///
/// # Arguments
/// * `input` - The full config file content as a string
///
/// # Returns
/// The parsed [`Config`], or a [`ParseError`] carrying the byte offset of
/// the first structural problem. No partial document is returned on error.
///
/// # Example
/// ```
/// use kanshi_profile_manager::core::parser::parse;
///
/// let config = parse("profile \"Home\" {\n  output eDP-1 enable\n}\n")?;
/// assert_eq!(config.profiles.len(), 1);
/// # Ok::<(), kanshi_profile_manager::core::parser::ParseError>(())
/// ```
pub fn parse(input: &str) -> Result<Config, ParseError> {
    let mut scanner = Scanner::new(input);
    let mut config = Config::default();

    while !scanner.at_end() {
        scanner.skip_whitespace_and_comments();
        if scanner.at_end() {
            break;
        }

        match scanner.read_word() {
            "profile" => config.profiles.push(parse_profile(&mut scanner)?),
            // A brace where a keyword should be yields an empty word;
            // consume it so the scan always makes progress.
            "" => scanner.bump(),
            // Unknown top-level directives (include, output defaults, ...)
            // are line-scoped and dropped.
            _ => scanner.skip_until_newline(),
        }
    }

    Ok(config)
}

/// Parses one profile, with the `profile` keyword already consumed.
fn parse_profile(scanner: &mut Scanner) -> Result<Profile, ParseError> {
    let mut profile = Profile::default();
    scanner.skip_whitespace_and_comments();

    // Optional profile name (quoted or unquoted)
    if !scanner.at_end() && scanner.peek() != Some('{') {
        let name = scanner.read_string_or_word();
        if !name.is_empty() {
            profile.name = Some(name.to_string());
        }
        scanner.skip_whitespace_and_comments();
    }

    let open = scanner.pos();
    if scanner.peek() != Some('{') {
        return Err(ParseError::ExpectedBrace { offset: open });
    }
    scanner.bump();

    loop {
        scanner.skip_whitespace_and_comments();
        match scanner.peek() {
            None => return Err(ParseError::UnterminatedProfile { offset: open }),
            Some('}') => {
                scanner.bump();
                break;
            }
            _ => {}
        }

        match scanner.read_word() {
            "output" => profile.outputs.push(parse_output(scanner)?),
            "" => scanner.bump(),
            // exec and any other profile-level directive: skip the line.
            _ => scanner.skip_until_newline(),
        }
    }

    Ok(profile)
}

/// Parses one output entry, with the `output` keyword already consumed.
///
/// If the token after the criteria is `{`, directives are scanned until
/// the matching `}` with full multi-line freedom. Otherwise they are
/// scanned on the same physical line only - without this bound a compact
/// one-line entry would absorb directives from the following line.
fn parse_output(scanner: &mut Scanner) -> Result<Output, ParseError> {
    scanner.skip_whitespace_and_comments();
    let mut output = Output::new(scanner.read_string_or_word().to_string());

    // The opening brace may sit on a later line, but inline directives
    // may not: anything past a newline belongs to the profile scan.
    let crossed_newline = scanner.skip_whitespace_tracking_newline();

    if scanner.peek() == Some('{') {
        let open = scanner.pos();
        scanner.bump();
        loop {
            scanner.skip_whitespace_and_comments();
            match scanner.peek() {
                None => return Err(ParseError::UnterminatedOutput { offset: open }),
                Some('}') => {
                    scanner.bump();
                    break;
                }
                _ => parse_directive(scanner, &mut output, false)?,
            }
        }
    } else if !crossed_newline {
        loop {
            scanner.skip_inline_space();
            match scanner.peek() {
                // A comment ends the logical line; the profile loop skips it.
                None | Some('\n') | Some('#') | Some('}') => break,
                _ => parse_directive(scanner, &mut output, true)?,
            }
        }
    }

    Ok(output)
}

/// Parses one directive inside an output entry.
///
/// `inline` bounds value lookup to the current line, matching the scan
/// mode of the caller. Unrecognized keywords are consumed together with
/// their value token (if one follows) and dropped from the document.
fn parse_directive(
    scanner: &mut Scanner,
    output: &mut Output,
    inline: bool,
) -> Result<(), ParseError> {
    match scanner.read_word() {
        "enable" => output.enabled = Some(true),
        "disable" => output.enabled = Some(false),
        "mode" => {
            skip_value_space(scanner, inline);
            let value = scanner.read_string_or_word();
            if !value.is_empty() {
                output.mode = Some(value.to_string());
            }
        }
        "scale" => {
            skip_value_space(scanner, inline);
            let offset = scanner.pos();
            let value = scanner.read_word();
            let scale = value.parse::<f64>().map_err(|source| ParseError::InvalidScale {
                offset,
                value: value.to_string(),
                source,
            })?;
            output.scale = Some(scale);
        }
        "position" => {
            skip_value_space(scanner, inline);
            let offset = scanner.pos();
            let value = scanner.read_word();
            output.position = Some(parse_position(value, offset)?);
        }
        "transform" => {
            skip_value_space(scanner, inline);
            let value = scanner.read_string_or_word();
            if !value.is_empty() {
                output.transform = Some(value.to_string());
            }
        }
        "adaptive_sync" => {
            skip_value_space(scanner, inline);
            let value = scanner.read_word();
            output.adaptive_sync = Some(value == "on");
        }
        // Stray brace in the directive stream: consume and move on.
        "" => scanner.bump(),
        _ => {
            // Unknown directive: consume its value token only if one
            // follows on the same line. Looking past the newline would
            // swallow the next directive's keyword as a value.
            scanner.skip_inline_space();
            if !matches!(scanner.peek(), None | Some('\n') | Some('#') | Some('}')) {
                scanner.read_string_or_word();
            }
        }
    }
    Ok(())
}

/// Skips the space between a directive keyword and its value. Inline
/// entries must not look past the end of their line.
fn skip_value_space(scanner: &mut Scanner, inline: bool) {
    if inline {
        scanner.skip_inline_space();
    } else {
        scanner.skip_whitespace_and_comments();
    }
}

/// Parses an `x,y` position value.
fn parse_position(value: &str, offset: usize) -> Result<Position, ParseError> {
    let invalid = || ParseError::InvalidPosition {
        offset,
        value: value.to_string(),
    };

    let (x, y) = value.split_once(',').ok_or_else(invalid)?;
    let x = x.parse::<i32>().map_err(|_| invalid())?;
    let y = y.parse::<i32>().map_err(|_| invalid())?;
    Ok(Position { x, y })
}

/// Cursor over the raw input.
///
/// `pos` is a byte offset (what error variants report), but token
/// classification is per character, so Unicode whitespace separates
/// tokens the same way ASCII whitespace does.
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn pos(&self) -> usize {
        self.pos
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Advances past the current character.
    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    /// Reads a maximal run of characters excluding whitespace and braces.
    fn read_word(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '{' || c == '}' {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.input[start..self.pos]
    }

    /// Reads a double-quoted string or, failing that, a word.
    ///
    /// Quoted strings have no escape processing; an unterminated quote is
    /// tolerated by reading to the end of the input.
    fn read_string_or_word(&mut self) -> &'a str {
        if self.peek() == Some('"') {
            self.read_quoted_string()
        } else {
            self.read_word()
        }
    }

    fn read_quoted_string(&mut self) -> &'a str {
        self.bump(); // opening quote
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }
            self.pos += c.len_utf8();
        }
        let value = &self.input[start..self.pos];
        self.bump(); // closing quote, if any
        value
    }

    /// Skips whitespace, reporting whether a newline was crossed.
    fn skip_whitespace_tracking_newline(&mut self) -> bool {
        let mut crossed = false;
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            if c == '\n' {
                crossed = true;
            }
            self.pos += c.len_utf8();
        }
        crossed
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some('#') => self.skip_until_newline(),
                Some(c) if c.is_whitespace() => self.pos += c.len_utf8(),
                _ => break,
            }
        }
    }

    /// Skips horizontal whitespace only; newlines terminate inline scans.
    fn skip_inline_space(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() || c == '\n' {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn skip_until_newline(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.pos += c.len_utf8();
        }
    }
}
