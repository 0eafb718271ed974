// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `.nupkg` extraction.
//!
//! ```text
//! archive.nupkg (zip) --spawn_blocking--> dest/
//!   entries escaping dest (../, absolute)  skipped
//!   existing files                         overwritten
//! ```

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zip::ZipArchive;

use crate::error::{FsError, RegistryError, SyncResult};

/// Extracts every entry of `archive` into `dest` on a blocking thread.
///
/// Returns the number of files written.
///
/// # Errors
///
/// Returns `RegistryError::InvalidArchive` if the archive cannot be read
/// and `FsError` if a file cannot be written.
pub async fn extract_archive(archive: &Path, dest: &Path) -> SyncResult<usize> {
    let archive = archive.to_path_buf();
    let dest = dest.to_path_buf();

    tokio::task::spawn_blocking(move || extract_archive_sync(&archive, &dest))
        .await
        .map_err(|e| io::Error::other(format!("extraction task failed: {e}")))?
}

fn invalid_archive(path: &Path, err: impl std::fmt::Display) -> RegistryError {
    RegistryError::InvalidArchive {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn extract_archive_sync(archive_path: &Path, dest: &Path) -> SyncResult<usize> {
    let file = File::open(archive_path).map_err(|e| FsError::io(archive_path, e))?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|e| invalid_archive(archive_path, e))?;

    fs::create_dir_all(dest).map_err(|e| FsError::io(dest, e))?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| invalid_archive(archive_path, e))?;

        let Some(relative) = entry.enclosed_name() else {
            warn!(entry = entry.name(), "Skipping archive entry outside destination");
            continue;
        };
        let out_path: PathBuf = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| FsError::io(&out_path, e))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| FsError::io(parent, e))?;
        }
        let mut out = File::create(&out_path).map_err(|e| FsError::io(&out_path, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| FsError::io(&out_path, e))?;
        written += 1;
    }

    debug!(
        archive = %archive_path.display(),
        files = written,
        "Extracted package"
    );
    Ok(written)
}
