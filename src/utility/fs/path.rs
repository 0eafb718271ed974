// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::ffi::OsStr;
use std::path::{Component, MAIN_SEPARATOR, Path, PathBuf};

/// Case-insensitive comparison of two file names.
#[must_use]
pub fn names_equal_ignore_case(a: &OsStr, b: &OsStr) -> bool {
    a == b || a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
}

/// Removes `.` and resolves `..` without touching the filesystem.
#[must_use]
pub fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Makes `path` absolute against `base` and normalizes it lexically.
#[must_use]
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        lexical_normalize(path)
    } else {
        lexical_normalize(&base.join(path))
    }
}

/// The root of the drive or volume `path` lives on (`/` or `C:\`).
#[must_use]
pub fn filesystem_root(path: &Path) -> PathBuf {
    path.components()
        .take_while(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
        .map(Component::as_os_str)
        .collect()
}

fn trimmed_lowercase(path: &Path) -> String {
    path.to_string_lossy()
        .trim_end_matches(['/', '\\', MAIN_SEPARATOR])
        .to_lowercase()
}

/// Compares paths ignoring case and trailing separators.
#[must_use]
pub fn paths_equal_ignore_case(a: &Path, b: &Path) -> bool {
    trimmed_lowercase(a) == trimmed_lowercase(b)
}

/// Finds a direct child directory of `parent` named `name`, ignoring case.
///
/// Falls back to `parent/name` when nothing matches so the caller's
/// existence check reports the expected path.
#[must_use]
pub fn find_child_dir_ignore_case(parent: &Path, name: &str) -> PathBuf {
    let wanted = OsStr::new(name);
    std::fs::read_dir(parent)
        .ok()
        .and_then(|entries| {
            entries
                .flatten()
                .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
                .find(|entry| names_equal_ignore_case(&entry.file_name(), wanted))
                .map(|entry| entry.path())
        })
        .unwrap_or_else(|| parent.join(name))
}

/// Returns `path` as-is when it exists; otherwise, on case-sensitive
/// platforms, tries to find the on-disk spelling segment by segment.
///
/// If any segment has no case-insensitive match the input is returned
/// unchanged.
#[must_use]
pub fn normalize_path_casing(path: &Path) -> PathBuf {
    if path.exists() || cfg!(windows) {
        return path.to_path_buf();
    }

    resolve_existing_path_ignore_case(path).unwrap_or_else(|| path.to_path_buf())
}

/// Walks `path` from its root, substituting each segment with the matching
/// directory entry. An exact match wins over a case-insensitive one.
#[must_use]
pub fn resolve_existing_path_ignore_case(path: &Path) -> Option<PathBuf> {
    let mut current = filesystem_root(path);
    if current.as_os_str().is_empty() {
        return None;
    }

    let segments = path.components().filter_map(|c| match c {
        Component::Normal(part) => Some(part),
        _ => None,
    });

    for segment in segments {
        if !current.is_dir() {
            return None;
        }

        let exact = current.join(segment);
        if exact.exists() {
            current = exact;
            continue;
        }

        let matched = std::fs::read_dir(&current)
            .ok()?
            .flatten()
            .find(|entry| names_equal_ignore_case(&entry.file_name(), segment))?;
        current = matched.path();
    }

    Some(current)
}
