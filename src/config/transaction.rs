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

//! Configuration transaction management with automatic backups
//!
//! Provides atomic write operations with ACID guarantees.

use atomic_write_file::AtomicWriteFile;
use std::{fs, io::Write, path::PathBuf};

use crate::config::{ConfigError, ConfigManager};

/// Atomic configuration transaction with automatic backup.
///
/// - **Atomic**: Changes are all-or-nothing (temp file + rename)
/// - **Consistent**: The config is never in a half-written state
/// - **Isolated**: No race conditions (OS-level atomic rename)
/// - **Durable**: Backup created before any modification
///
/// # Lifecycle
///
/// 1. `begin()` - Creates a timestamped backup immediately
/// 2. Caller prepares new content (in memory)
/// 3. `commit()` - Writes atomically, or `rollback()` - restores original
///
/// # Example
///
/// ```no_run
/// use kanshi_profile_manager::config::{ConfigManager, ConfigTransaction};
/// use std::path::PathBuf;
///
/// let manager = ConfigManager::new(PathBuf::from("/home/user/.config/kanshi/config"))?;
/// let tx = ConfigTransaction::begin(&manager)?;
///
/// let new_content = "profile \"Home\" {\n  output \"eDP-1\" {\n    enable\n  }\n\n}\n";
///
/// match tx.commit(new_content) {
///     Ok(()) => println!("Changes applied successfully"),
///     Err(e) => eprintln!("Commit failed: {}", e),
/// }
/// # Ok::<(), kanshi_profile_manager::config::ConfigError>(())
/// ```
pub struct ConfigTransaction<'a> {
    manager: &'a ConfigManager,
    backup_path: Option<PathBuf>,
}

impl<'a> ConfigTransaction<'a> {
    /// Begins a new transaction by creating a timestamped backup.
    ///
    /// The backup is created immediately, ensuring a rollback point
    /// exists before any modification is attempted.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or the backup
    /// file cannot be written. No changes have been made in that case.
    pub fn begin(manager: &'a ConfigManager) -> Result<Self, ConfigError> {
        // Create backup immediately - this is our rollback point
        let backup_path = manager.create_timestamped_backup()?;

        Ok(Self {
            manager,
            backup_path: Some(backup_path),
        })
    }

    /// Commits the transaction by atomically writing new content.
    ///
    /// The write is atomic at the filesystem level (temp file + rename),
    /// so the config is never partially written. The backup created by
    /// `begin()` remains available for manual rollback afterwards.
    ///
    /// Consumes the transaction, preventing accidental double-commits.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::WriteFailed` if the temp file cannot be
    /// created, written, or renamed into place. The original config is
    /// untouched in every failure case.
    pub fn commit(self, new_content: &str) -> Result<(), ConfigError> {
        let mut file = AtomicWriteFile::options()
            .open(self.manager.config_path())
            .map_err(|e| {
                ConfigError::WriteFailed(format!("Failed to open for atomic write: {}", e))
            })?;

        file.write_all(new_content.as_bytes())
            .map_err(|e| ConfigError::WriteFailed(format!("Failed to write content: {}", e)))?;

        file.commit().map_err(|e| {
            ConfigError::WriteFailed(format!("Failed to commit atomic write: {}", e))
        })?;

        // Backup remains in the backup directory; cleanup is a separate,
        // user-driven concern.
        Ok(())
    }

    /// Rolls back to the backup created during `begin()`.
    ///
    /// Atomically restores the configuration file to its state when the
    /// transaction began. Borrows `self` immutably, so repeated rollback
    /// attempts are possible after transient failures.
    ///
    /// # Errors
    ///
    /// Returns an error if the backup cannot be read or the atomic write
    /// of its content fails.
    pub fn rollback(&self) -> Result<(), ConfigError> {
        if let Some(backup_path) = &self.backup_path {
            let backup_content = fs::read_to_string(backup_path)?;

            let mut file = AtomicWriteFile::options()
                .open(self.manager.config_path())
                .map_err(|e| {
                    ConfigError::WriteFailed(format!("Failed to open for atomic write: {}", e))
                })?;

            file.write_all(backup_content.as_bytes())
                .map_err(|e| ConfigError::WriteFailed(format!("Failed to write content: {}", e)))?;

            file.commit()
                .map_err(|e| ConfigError::WriteFailed(format!("Failed to commit: {}", e)))?;

            Ok(())
        } else {
            // Unreachable in normal usage: begin() always creates a backup.
            Err(ConfigError::BackupFailed(
                "No backup available for rollback".to_string(),
            ))
        }
    }
}
