// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Recursively finds files under `root` whose name is exactly `file_name`.
///
/// Hidden files and ignore files are not filtered: an extracted package is
/// searched as-is. Unreadable entries are logged and skipped.
#[must_use]
pub fn find_files_named(root: &Path, file_name: &str) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .build();

    let mut found = Vec::new();
    for result in walker {
        match result {
            Ok(entry) => {
                let is_file = entry.file_type().is_some_and(|t| t.is_file());
                if is_file && entry.file_name() == file_name {
                    found.push(entry.into_path());
                }
            }
            Err(err) => warn!(error = %err, "Error walking extracted package"),
        }
    }
    found
}
