// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The sync run.
//!
//! ```text
//! create out dir --> clean out dir --> resolve Managed --> copy minus ignore list
//!                                                               |
//!                        SyncSummary <-- fetch 0Harmony.dll, BepInEx.dll
//! ```

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use crate::config::Options;
use crate::error::{FsError, Result};
use crate::managed::{IgnoreSet, resolve_managed_dir, sync_managed_files};
use crate::registry::{FetchedFile, REQUIRED_FILES, RegistryClient};
use crate::steam::PlatformLocator;
use crate::utility::fs::clean::clean_destination;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    pub out_dir: PathBuf,
    pub managed_dir: PathBuf,
    pub copied: usize,
    pub skipped: usize,
    pub fetched: Vec<FetchedFile>,
}

/// Runs a full sync with the default registry client.
///
/// # Errors
///
/// Returns the first failing step's error; files already written stay.
pub async fn run_sync(options: &Options, platform: &dyn PlatformLocator) -> Result<SyncSummary> {
    let client = RegistryClient::new(options.include_prerelease()).progress(options.progress());
    run_sync_with(options, platform, &client).await
}

/// Runs a full sync using `client` for package downloads.
///
/// # Errors
///
/// Returns the first failing step's error; files already written stay.
pub async fn run_sync_with(
    options: &Options,
    platform: &dyn PlatformLocator,
    client: &RegistryClient,
) -> Result<SyncSummary> {
    let out_dir = options.out_dir();

    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|e| FsError::io(out_dir, e))
        .context("failed to create output directory")?;
    clean_destination(out_dir, options.working_root()).await?;

    let managed_dir = resolve_managed_dir(options, platform)?;
    info!(path = %managed_dir.display(), "Using managed directory");

    let ignore = IgnoreSet::load(options.ignore_list()).await?;
    let stats = sync_managed_files(&managed_dir, out_dir, &ignore)
        .await
        .context("failed to copy managed assemblies")?;

    let fetched = client
        .sync_required_files(
            options.package_ids(),
            options.sources(),
            REQUIRED_FILES,
            out_dir,
        )
        .await?;

    Ok(SyncSummary {
        out_dir: out_dir.to_path_buf(),
        managed_dir,
        copied: stats.copied,
        skipped: stats.skipped,
        fetched,
    })
}
