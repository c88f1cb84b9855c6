//! Configuration file storage with atomic writes and backup support.
//!
//! This module owns every interaction with the kanshi config file on
//! disk. Key features:
//!
//! - **Atomic writes**: Uses temp-file-then-rename to prevent corruption
//! - **Automatic backups**: Every write creates a timestamped backup
//! - **Rollback safety**: Failed transactions leave the original untouched
//! - **Symlink warnings**: Alerts user but allows symlinked configs
//!
//! Parsing and serialization stay in [`crate::core`]; this layer hands
//! text to the parser on load and takes text from the serializer on save.
//!
//! # Example
//!
//! ```no_run
//! use kanshi_profile_manager::config::ConfigManager;
//!
//! let manager = ConfigManager::new("/home/user/.config/kanshi/config".into())?;
//!
//! let mut config = manager.load()?;
//! config.profiles.retain(|p| p.name.as_deref() != Some("Stale"));
//! manager.save(&config)?;
//! # Ok::<(), kanshi_profile_manager::config::ConfigError>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;

use crate::core::parser::{self, ParseError};
use crate::core::serializer;
use crate::core::types::Config;

pub mod transaction;

pub use transaction::ConfigTransaction;

#[cfg(test)]
mod tests;

/// Errors that can occur during configuration storage.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Backup directory cannot be created or written to.
    #[error("Backup directory not writable: {0}")]
    BackupDirNotWritable(PathBuf),

    /// Failed to create backup file.
    #[error("Failed to create backup: {0}")]
    BackupFailed(String),

    /// Atomic write operation failed.
    #[error("Atomic write failed: {0}")]
    WriteFailed(String),

    /// Config text did not parse; nothing was or will be written.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] ParseError),

    /// Generic I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Manages a kanshi configuration file with safe atomic operations.
///
/// Provides reads, parsed loads, and transactional writes with automatic
/// backup creation. All writes go through the transaction API so a crash
/// mid-save can never leave a half-written config for the daemon to trip
/// over.
#[derive(Debug)]
pub struct ConfigManager {
    /// Path to the kanshi configuration file.
    config_path: PathBuf,
    backup_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a new ConfigManager for the given config file.
    ///
    /// Validates that the config file exists and creates the backup
    /// directory next to it (`.../kanshi/backups/`) if missing. If the
    /// config is a symlink, a warning is printed to stderr but the
    /// operation continues.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the config file doesn't exist.
    /// Returns `ConfigError::BackupDirNotWritable` if the backup directory
    /// cannot be created or is read-only.
    pub fn new(config_path: PathBuf) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::NotFound(config_path));
        }

        // Warn if config is a symlink (but allow it per user preference)
        if config_path.read_link().is_ok() {
            eprintln!("⚠ Warning: Config file is a symlink: {}", config_path.display());
            eprintln!("  This is allowed, but be aware of what it points to.");
        }

        let backup_dir = config_path
            .parent()
            .ok_or_else(|| {
                ConfigError::BackupDirNotWritable(PathBuf::from(
                    "Config file has no parent directory",
                ))
            })?
            .join("backups");

        if !backup_dir.exists() {
            fs::create_dir_all(&backup_dir)
                .map_err(|_| ConfigError::BackupDirNotWritable(backup_dir.clone()))?;
        }

        if backup_dir.metadata()?.permissions().readonly() {
            return Err(ConfigError::BackupDirNotWritable(backup_dir));
        }

        Ok(Self {
            config_path,
            backup_dir,
        })
    }

    /// Path of the managed config file.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Reads the current configuration file content as raw text.
    pub fn read_config(&self) -> Result<String, ConfigError> {
        Ok(fs::read_to_string(&self.config_path)?)
    }

    /// Reads and parses the configuration file.
    ///
    /// A parse failure carries the byte offset of the problem and leaves
    /// nothing modified; callers must not save or apply anything derived
    /// from a failed load.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let content = self.read_config()?;
        Ok(parser::parse(&content)?)
    }

    /// Serialises the document and writes it through a transaction.
    ///
    /// The previous file content is preserved as a timestamped backup
    /// before the atomic replace.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let content = serializer::serialize(config);
        let tx = ConfigTransaction::begin(self)?;
        tx.commit(&content)
    }

    /// Lists existing backup files, oldest first.
    ///
    /// Backup filenames embed their timestamp, so lexical order is
    /// chronological order.
    pub fn list_backups(&self) -> Result<Vec<PathBuf>, ConfigError> {
        let mut backups = Vec::new();
        for entry in fs::read_dir(&self.backup_dir)? {
            let path = entry?.path();
            if path.is_file() {
                backups.push(path);
            }
        }
        backups.sort();
        Ok(backups)
    }

    /// Copies the current config into the backup directory, named
    /// `<original>.<YYYY-MM-DD_HHMMSS>`.
    fn create_timestamped_backup(&self) -> Result<PathBuf, ConfigError> {
        let content = fs::read_to_string(&self.config_path)?;

        let timestamp = Local::now().format("%Y-%m-%d_%H%M%S");

        let original_name = self
            .config_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("config");

        let backup_filename = format!("{}.{}", original_name, timestamp);
        let backup_path = self.backup_dir.join(&backup_filename);

        fs::write(&backup_path, &content)
            .map_err(|e| ConfigError::BackupFailed(e.to_string()))?;

        Ok(backup_path)
    }
}
