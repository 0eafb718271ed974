// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use tokio::fs;

use super::path::{filesystem_root, lexical_normalize, paths_equal_ignore_case};
use crate::error::{FsError, SyncResult, UnsafeTargetError};

/// Refuses output directories whose cleaning would be catastrophic.
///
/// # Errors
///
/// Returns `UnsafeTargetError::WorkingRoot` if `out_dir` is `working_root`
/// and `UnsafeTargetError::FilesystemRoot` if it is the root of its volume.
pub fn validate_clean_target(out_dir: &Path, working_root: &Path) -> SyncResult<()> {
    let out_dir = lexical_normalize(out_dir);
    let working_root = lexical_normalize(working_root);

    if paths_equal_ignore_case(&out_dir, &working_root) {
        return Err(UnsafeTargetError::WorkingRoot { path: out_dir }.into());
    }

    if paths_equal_ignore_case(&out_dir, &filesystem_root(&out_dir)) {
        return Err(UnsafeTargetError::FilesystemRoot { path: out_dir }.into());
    }

    Ok(())
}

/// Empties `out_dir`, keeping the directory itself.
///
/// Subdirectories are removed recursively, then the remaining files. A
/// missing `out_dir` is left alone.
///
/// # Errors
///
/// Returns an error if the target is refused by [`validate_clean_target`]
/// or an entry cannot be removed.
pub async fn clean_destination(out_dir: &Path, working_root: &Path) -> SyncResult<()> {
    validate_clean_target(out_dir, working_root)?;

    if !fs::try_exists(out_dir).await.unwrap_or(false) {
        return Ok(());
    }

    let mut entries = fs::read_dir(out_dir)
        .await
        .map_err(|e| FsError::io(out_dir, e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| FsError::io(out_dir, e))?
    {
        let path = entry.path();
        let file_type = entry.file_type().await.map_err(|e| FsError::io(&path, e))?;
        if file_type.is_dir() {
            fs::remove_dir_all(&path)
                .await
                .map_err(|e| FsError::io(&path, e))?;
        } else {
            files.push(path);
        }
    }

    for path in files {
        fs::remove_file(&path)
            .await
            .map_err(|e| FsError::io(&path, e))?;
    }

    tracing::info!(dir = %out_dir.display(), "Cleaned destination folder");
    Ok(())
}
