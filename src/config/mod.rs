// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Run options, resolved once at startup.
//!
//! # Precedence
//!
//! ```text
//! scalars  CLI flag > environment > sync-managed.toml > default
//! lists    (repeated flag + CSV flag + env CSV) > toml list > defaults
//!          trimmed, blanks dropped, de-duplicated ignoring case
//! ```
//!
//! # Defaults
//!
//! ```text
//! ignore list   <working root>/ignore-managed.md
//! output        <working root>/lib/net46
//! packages      HarmonyX, BepInEx.BaseLib
//! sources       api.nuget.org, nuget.bepinex.dev
//! ```

pub mod env;
pub mod loader;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::error::{ConfigError, SyncResult};
use crate::net::ProgressDisplay;
use crate::utility::fs::path::{absolutize, lexical_normalize};

pub use env::EnvSnapshot;

pub const DEFAULT_IGNORE_LIST: &str = "ignore-managed.md";
pub const DEFAULT_PACKAGE_IDS: &[&str] = &["HarmonyX", "BepInEx.BaseLib"];
pub const DEFAULT_SOURCES: &[&str] = &[
    "https://api.nuget.org/v3/index.json",
    "https://nuget.bepinex.dev/v3/index.json",
];

/// Default output directory, relative to the working root.
#[must_use]
pub fn default_out_dir(working_root: &Path) -> PathBuf {
    working_root.join("lib").join("net46")
}

/// Optional settings from `sync-managed.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steam_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub package_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_prerelease: Option<bool>,
}

/// Fully resolved run options. Read-only once built.
#[derive(Debug, Clone)]
pub struct Options {
    working_root: PathBuf,
    managed_path: Option<PathBuf>,
    steam_path: Option<PathBuf>,
    ignore_list: PathBuf,
    out_dir: PathBuf,
    package_ids: Vec<String>,
    sources: Vec<String>,
    include_prerelease: bool,
    progress: ProgressDisplay,
}

impl Options {
    /// Merges CLI arguments, the environment snapshot and the config file.
    ///
    /// Relative paths are anchored at `working_root`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyPackageIds` or `ConfigError::EmptySources`
    /// if a list ends up empty.
    pub fn resolve(
        cli: &Cli,
        env: &EnvSnapshot,
        file: &FileConfig,
        working_root: &Path,
    ) -> SyncResult<Self> {
        let managed_path = first_path([
            cli.managed_path.clone(),
            env.valheim_managed.as_deref().map(PathBuf::from),
            file.managed_path.clone(),
        ])
        .map(|p| absolutize(&p, working_root));

        let steam_path = first_path([
            cli.steam_path.clone(),
            env.steam_path.as_deref().map(PathBuf::from),
            env.steam_dir.as_deref().map(PathBuf::from),
            file.steam_path.clone(),
        ])
        .map(|p| absolutize(&p, working_root));

        let ignore_list = first_path([cli.ignore_list().cloned(), file.ignore_path.clone()])
            .map_or_else(
                || working_root.join(DEFAULT_IGNORE_LIST),
                |p| absolutize(&p, working_root),
            );

        let out_dir = first_path([cli.out_dir.clone(), file.out_dir.clone()]).map_or_else(
            || default_out_dir(working_root),
            |p| absolutize(&p, working_root),
        );

        let package_ids = resolve_distinct_values(
            &cli.package_ids,
            cli.package_ids_csv.as_deref(),
            env.package_ids.as_deref(),
            &file.package_ids,
            DEFAULT_PACKAGE_IDS,
        );
        if package_ids.is_empty() {
            return Err(ConfigError::EmptyPackageIds.into());
        }

        let sources = resolve_distinct_values(
            &cli.sources,
            cli.sources_csv.as_deref(),
            env.service_indexes.as_deref(),
            &file.sources,
            DEFAULT_SOURCES,
        );
        if sources.is_empty() {
            return Err(ConfigError::EmptySources.into());
        }

        let include_prerelease = cli.include_prerelease
            || env.include_prerelease()
            || file.include_prerelease.unwrap_or(false);

        let progress = if cli.no_progress {
            ProgressDisplay::Silent
        } else {
            ProgressDisplay::Bar
        };

        Ok(Self {
            working_root: lexical_normalize(working_root),
            managed_path,
            steam_path,
            ignore_list,
            out_dir,
            package_ids,
            sources,
            include_prerelease,
            progress,
        })
    }

    /// Directory the run was started from; never cleaned.
    #[must_use]
    pub fn working_root(&self) -> &Path {
        &self.working_root
    }

    /// Explicit managed directory (CLI, `VALHEIM_MANAGED` or config file).
    #[must_use]
    pub fn managed_path(&self) -> Option<&Path> {
        self.managed_path.as_deref()
    }

    /// Explicit Steam install root (CLI, `STEAM_PATH`, `STEAM_DIR` or config file).
    #[must_use]
    pub fn steam_path(&self) -> Option<&Path> {
        self.steam_path.as_deref()
    }

    #[must_use]
    pub fn ignore_list(&self) -> &Path {
        &self.ignore_list
    }

    #[must_use]
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    #[must_use]
    pub fn package_ids(&self) -> &[String] {
        &self.package_ids
    }

    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    #[must_use]
    pub const fn include_prerelease(&self) -> bool {
        self.include_prerelease
    }

    #[must_use]
    pub const fn progress(&self) -> ProgressDisplay {
        self.progress
    }
}

fn first_path<const N: usize>(candidates: [Option<PathBuf>; N]) -> Option<PathBuf> {
    candidates
        .into_iter()
        .flatten()
        .find(|p| !p.as_os_str().to_string_lossy().trim().is_empty())
}

fn split_csv(s: &str) -> impl Iterator<Item = &str> {
    s.split(',').map(str::trim).filter(|v| !v.is_empty())
}

/// Concatenates repeated values, the CSV flag and the env CSV; falls back to
/// the config file list and then `defaults` when nothing was given.
pub(crate) fn resolve_distinct_values(
    repeated: &[String],
    csv: Option<&str>,
    env_csv: Option<&str>,
    file_values: &[String],
    defaults: &[&str],
) -> Vec<String> {
    let mut values: Vec<&str> = repeated.iter().map(String::as_str).collect();
    values.extend(csv.into_iter().flat_map(split_csv));
    values.extend(env_csv.into_iter().flat_map(split_csv));

    if values.is_empty() {
        values.extend(file_values.iter().map(String::as_str));
    }
    if values.is_empty() {
        values.extend_from_slice(defaults);
    }

    let mut distinct: Vec<String> = Vec::with_capacity(values.len());
    for value in values.into_iter().map(str::trim).filter(|v| !v.is_empty()) {
        if !distinct.iter().any(|d| d.eq_ignore_ascii_case(value)) {
            distinct.push(value.to_string());
        }
    }
    distinct
}
