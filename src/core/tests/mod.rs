//! Core module tests
//!
//! Contains test suites for core functionality:
//! - Parser tests (grammar, tolerance, structural errors)
//! - Serializer tests (canonical form, round-trip properties)
//! - Document model tests (serde shape)

#[cfg(test)]
mod serializer_tests;
