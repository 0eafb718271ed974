// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Ignore list: file names to leave out of the managed copy.
//!
//! ```text
//! # comment          skipped
//! mscorlib.dll       -> "mscorlib.dll", "mscorlib"
//! System             -> "system"
//! sub/Foo.dll        -> "foo.dll", "foo"      (only the file name counts)
//! Foo/               skipped (no file name)
//! ```

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{FsError, SyncResult};

/// Case-insensitive set of ignored file names and stems.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    entries: HashSet<String>,
}

impl IgnoreSet {
    /// Parses ignore list content.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut entries = HashSet::new();

        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') || line.ends_with(['/', '\\']) {
                continue;
            }

            let path = Path::new(line);
            let Some(name) = path.file_name() else {
                continue;
            };
            entries.insert(name.to_string_lossy().to_lowercase());
            if let Some(stem) = path.file_stem() {
                entries.insert(stem.to_string_lossy().to_lowercase());
            }
        }

        Self { entries }
    }

    /// Reads the ignore list at `path`.
    ///
    /// A missing file, or a path that is not a regular file, yields an empty
    /// set, so everything gets copied.
    ///
    /// # Errors
    ///
    /// Returns `FsError` if the file exists but cannot be read.
    pub async fn load(path: &Path) -> SyncResult<Self> {
        let is_file = tokio::fs::metadata(path)
            .await
            .is_ok_and(|meta| meta.is_file());
        if !is_file {
            warn!(path = %path.display(), "Ignore list file not found, copying all files");
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FsError::io(path, e))?;
        let set = Self::parse(&content);

        info!(
            file = %path.file_name().unwrap_or_default().to_string_lossy(),
            entries = set.len(),
            "Loaded ignore list"
        );
        Ok(set)
    }

    /// True if `file_name` or its stem is listed.
    #[must_use]
    pub fn is_ignored(&self, file_name: &str) -> bool {
        let path = Path::new(file_name);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase());

        self.entries.contains(&file_name.to_lowercase())
            || stem.is_some_and(|s| self.entries.contains(&s))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
