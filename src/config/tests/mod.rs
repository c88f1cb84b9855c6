//! Config module tests
//!
//! Contains test suites for configuration storage:
//! - ConfigManager tests (paths, backups, load/save)
//! - ConfigTransaction tests (commit, rollback)
