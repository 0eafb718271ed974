// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Environment variables, read once at startup.
//!
//! ```text
//! VALHEIM_MANAGED             -> managed_path
//! STEAM_PATH, STEAM_DIR       -> steam_path (first non-blank)
//! BEPINEX_PACKAGE_IDS         -> package ids (CSV, appended)
//! BEPINEX_INCLUDE_PRERELEASE  -> "true" enables prereleases
//! NUGET_SERVICE_INDEXES       -> sources (CSV, appended)
//! ```

pub const VALHEIM_MANAGED: &str = "VALHEIM_MANAGED";
pub const STEAM_PATH: &str = "STEAM_PATH";
pub const STEAM_DIR: &str = "STEAM_DIR";
pub const BEPINEX_PACKAGE_IDS: &str = "BEPINEX_PACKAGE_IDS";
pub const BEPINEX_INCLUDE_PRERELEASE: &str = "BEPINEX_INCLUDE_PRERELEASE";
pub const NUGET_SERVICE_INDEXES: &str = "NUGET_SERVICE_INDEXES";

/// Snapshot of the environment variables the tool understands.
///
/// Captured once in `main` and handed to option resolution, so nothing
/// below the entry point reads the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    pub valheim_managed: Option<String>,
    pub steam_path: Option<String>,
    pub steam_dir: Option<String>,
    pub package_ids: Option<String>,
    pub include_prerelease: Option<String>,
    pub service_indexes: Option<String>,
}

impl EnvSnapshot {
    /// Reads the variables from the current process.
    #[must_use]
    pub fn from_process() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a snapshot from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            valheim_managed: lookup(VALHEIM_MANAGED),
            steam_path: lookup(STEAM_PATH),
            steam_dir: lookup(STEAM_DIR),
            package_ids: lookup(BEPINEX_PACKAGE_IDS),
            include_prerelease: lookup(BEPINEX_INCLUDE_PRERELEASE),
            service_indexes: lookup(NUGET_SERVICE_INDEXES),
        }
    }

    /// True if `BEPINEX_INCLUDE_PRERELEASE` is `true`, ignoring case.
    #[must_use]
    pub fn include_prerelease(&self) -> bool {
        self.include_prerelease
            .as_deref()
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }
}
