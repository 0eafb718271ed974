// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Game managed directory: where it is and what gets copied out of it.
//!
//! ```text
//! --managed-path | VALHEIM_MANAGED | managed_path  --+
//!                                                    +--> normalize casing --> must be a dir
//! SteamLocator::managed_dir(steam path)  ------------+
//! ```

pub mod ignore;


use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Options;
use crate::error::{LocateError, SyncResult};
use crate::steam::{PlatformLocator, SteamLocator, VALHEIM};
use crate::utility::fs::copy::{CopyStats, copy_filtered_files};
use crate::utility::fs::path::normalize_path_casing;

pub use ignore::IgnoreSet;

/// Label used in logs and errors for the game's managed directory.
pub const MANAGED_LABEL: &str = "Managed folder";

/// Resolves the managed directory from options, falling back to Steam.
///
/// # Errors
///
/// Returns `LocateError` if Steam discovery fails or the resolved path is
/// not an existing directory.
pub fn resolve_managed_dir(
    options: &Options,
    platform: &dyn PlatformLocator,
) -> SyncResult<PathBuf> {
    let candidate = match options.managed_path() {
        Some(path) => path.to_path_buf(),
        None => SteamLocator::new(platform, VALHEIM).managed_dir(options.steam_path())?,
    };

    let managed = normalize_path_casing(&candidate);
    if !managed.is_dir() {
        return Err(LocateError::directory(MANAGED_LABEL, managed).into());
    }

    Ok(managed)
}

/// Copies the managed directory's files into `out_dir`, minus `ignore`.
///
/// # Errors
///
/// Returns `FsError` if a file cannot be read or written.
pub async fn sync_managed_files(
    managed_dir: &Path,
    out_dir: &Path,
    ignore: &IgnoreSet,
) -> SyncResult<CopyStats> {
    let stats = copy_filtered_files(managed_dir, out_dir, |name| ignore.is_ignored(name)).await?;

    if stats.skipped > 0 {
        info!(
            copied = stats.copied,
            skipped = stats.skipped,
            "Synced {} files from Valheim Managed, skipped {} by ignore list",
            stats.copied,
            stats.skipped
        );
    } else {
        info!(copied = stats.copied, "Synced {} files from Valheim Managed", stats.copied);
    }

    Ok(stats)
}
