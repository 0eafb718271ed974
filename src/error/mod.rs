// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!                 SyncError (~24 bytes)
//!                        |
//!   +--------+--------+--+-----+---------+-------+------+
//!   |        |        |        |         |       |      |
//!   v        v        v        v         v       v      v
//! NotFound Config Registry UnsafeTarget Network  Fs    Io
//!   Box     Box     Box       Box        Box    Box    Box
//!
//! Sub-errors (unboxed internally):
//!   Locate   SteamInstall, AppInstall, Directory
//!   Config   EmptyPackageIds, EmptySources, File
//!   Registry MissingBaseAddress, SourceExhausted, MissingFiles
//!   Unsafe   WorkingRoot, FilesystemRoot
//!   Network  HttpError, Timeout, Reqwest, Json
//!   Fs       IoError
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`SyncError`].
pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A directory or install location could not be found.
    #[error(transparent)]
    NotFound(#[from] Box<LocateError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Package registry lookup or archive error.
    #[error("registry error: {0}")]
    Registry(#[from] Box<RegistryError>),

    /// Destination cleaning was refused.
    #[error("refusing to clean destination: {0}")]
    UnsafeTarget(#[from] Box<UnsafeTargetError>),

    /// Network operation failed.
    #[error("network error: {0}")]
    Network(#[from] Box<NetworkError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

impl SyncError {
    /// Returns true if this is an HTTP 404 response.
    #[must_use]
    pub fn is_http_not_found(&self) -> bool {
        matches!(self, Self::Network(err) if matches!(**err, NetworkError::HttpError { status: 404, .. }))
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for SyncError {
                fn from(err: $error) -> Self {
                    SyncError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    LocateError => NotFound,
    ConfigError => Config,
    RegistryError => Registry,
    UnsafeTargetError => UnsafeTarget,
    NetworkError => Network,
    FsError => Fs,
    std::io::Error => Io,
}

// --- Locate Errors ---

/// Missing install locations and directories.
#[derive(Debug, Error)]
pub enum LocateError {
    /// No Steam install root was configured or detected.
    #[error(
        "Steam install path not found; use --steam-path or set STEAM_PATH, STEAM_DIR or VALHEIM_MANAGED"
    )]
    SteamInstall,

    /// The Steam install root was configured but does not exist.
    #[error("Steam install path does not exist: {}", path.display())]
    SteamInstallMissing { path: PathBuf },

    /// No library root holds the application.
    #[error("could not locate Steam app install dir for app id {app_id}")]
    AppInstall { app_id: u32 },

    /// A required directory does not exist.
    #[error("{label} not found: {}", path.display())]
    Directory { label: String, path: PathBuf },
}

impl LocateError {
    /// Shorthand for a labelled missing directory.
    pub fn directory(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Directory {
            label: label.into(),
            path: path.into(),
        }
    }
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No package ids after resolution.
    #[error("no package ids configured; use the defaults or pass --package-ids")]
    EmptyPackageIds,

    /// No registry entry points after resolution.
    #[error("no package sources configured; use the defaults or pass --sources")]
    EmptySources,

    /// Failed to load or parse the configuration file.
    #[error("failed to load config: {message}")]
    File { message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        Self::File {
            message: err.to_string(),
        }
    }
}

// --- Registry Errors ---

/// Package registry errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Service index has no `PackageBaseAddress/` resource.
    #[error("service index does not contain PackageBaseAddress: {source_url}")]
    MissingBaseAddress { source_url: String },

    /// No configured source has any usable version of the package.
    #[error("package '{package_id}' not found in any configured package source")]
    SourceExhausted { package_id: String },

    /// Required files never showed up in any downloaded package.
    #[error("could not find required file(s) in downloaded packages: {}", files.join(", "))]
    MissingFiles { files: Vec<String> },

    /// Downloaded archive could not be read.
    #[error("invalid package archive {}: {message}", path.display())]
    InvalidArchive { path: PathBuf, message: String },
}

// --- Unsafe Target Errors ---

/// Reasons for refusing to clean an output directory.
#[derive(Debug, Error)]
pub enum UnsafeTargetError {
    /// Output directory is the working root.
    #[error("it equals the working root: {}", path.display())]
    WorkingRoot { path: PathBuf },

    /// Output directory is a filesystem or drive root.
    #[error("it looks like a filesystem root: {}", path.display())]
    FilesystemRoot { path: PathBuf },
}

// --- Network Errors ---

/// Network operation errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Download failed.
    #[error("download failed: {url} - {message}")]
    DownloadFailed { url: String, message: String },

    /// HTTP error response.
    #[error("http error {status}: {url}")]
    HttpError { status: u16, url: String },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Request timed out.
    #[error("request timed out: {url}")]
    Timeout { url: String },

    /// Response body was not the expected JSON.
    #[error("invalid json from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl NetworkError {
    /// Classifies a reqwest failure for `url`, separating out timeouts.
    #[must_use]
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Reqwest(err)
        }
    }
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests;
