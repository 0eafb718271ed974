// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration file loading.
//!
//! # Loader Pipeline
//!
//! ```text
//! ConfigLoader::new()
//!   .add_toml_file(req)
//!   .add_toml_file_optional(opt)
//!        |
//!        v
//!    build() --> FileConfig
//! ```

use std::path::{Path, PathBuf};

use super::FileConfig;
use crate::error::{ConfigError, SyncResult};

/// Default config file looked up in the working root.
pub const DEFAULT_CONFIG_FILE: &str = "sync-managed.toml";

/// Builder for loading configuration from multiple sources.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    files: Vec<PathBuf>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            files: Vec::new(),
        }
    }

    /// Adds a TOML configuration file that must exist.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(true));
        self.files.push(p.to_path_buf());
        self
    }

    /// Adds a TOML configuration file that is skipped when absent.
    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(false));
        if p.exists() {
            self.files.push(p.to_path_buf());
        }
        self
    }

    /// Builds the file configuration from all added sources.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::File` if a required file is missing, a file has
    /// invalid TOML syntax, or the keys do not match [`FileConfig`].
    pub fn build(self) -> SyncResult<FileConfig> {
        let cfg = self.builder.build().map_err(ConfigError::from)?;
        let file: FileConfig = cfg.try_deserialize().map_err(ConfigError::from)?;
        Ok(file)
    }

    #[must_use]
    pub fn loaded_files(&self) -> &[PathBuf] {
        &self.files
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Loads the explicit config file, or `sync-managed.toml` in `working_root`
/// when it exists.
///
/// # Errors
///
/// Returns an error if the explicit file is missing or any file fails to parse.
pub fn load_file_config(explicit: Option<&Path>, working_root: &Path) -> SyncResult<FileConfig> {
    let loader = match explicit {
        Some(path) => ConfigLoader::new().add_toml_file(path),
        None => ConfigLoader::new().add_toml_file_optional(working_root.join(DEFAULT_CONFIG_FILE)),
    };

    for file in loader.loaded_files() {
        tracing::debug!(file = %file.display(), "Loading config file");
    }

    loader.build()
}
