// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{FsError, SyncResult};
use std::path::Path;
use tokio::fs;

/// Outcome of a filtered copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub copied: usize,
    pub skipped: usize,
}

/// Copies the top-level files of `src` into `dst`, skipping any file for
/// which `skip(file_name)` returns true.
///
/// Subdirectories are not descended into. Existing files in `dst` are
/// overwritten.
///
/// # Example
/// ```no_run
/// use sync_managed::utility::fs::copy::copy_filtered_files;
/// use std::path::Path;
///
/// # async fn example() -> sync_managed::error::SyncResult<()> {
/// let stats = copy_filtered_files(Path::new("/game/Managed"), Path::new("lib"), |name| {
///     name.eq_ignore_ascii_case("mscorlib.dll")
/// })
/// .await?;
/// println!("{} copied, {} skipped", stats.copied, stats.skipped);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if `src` cannot be read or a file cannot be copied.
pub async fn copy_filtered_files<F>(src: &Path, dst: &Path, skip: F) -> SyncResult<CopyStats>
where
    F: Fn(&str) -> bool,
{
    let mut stats = CopyStats::default();

    let mut entries = fs::read_dir(src)
        .await
        .map_err(|e| FsError::io(src, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| FsError::io(src, e))?
    {
        let src_path = entry.path();
        if !src_path.is_file() {
            continue;
        }

        let name = entry.file_name();
        if skip(&name.to_string_lossy()) {
            tracing::trace!(file = %name.to_string_lossy(), "Skipped by ignore list");
            stats.skipped += 1;
            continue;
        }

        let dst_path = dst.join(&name);
        fs::copy(&src_path, &dst_path)
            .await
            .map_err(|e| FsError::io(&dst_path, e))?;
        stats.copied += 1;
    }

    Ok(stats)
}
