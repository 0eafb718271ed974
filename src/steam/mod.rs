// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Steam library discovery.
//!
//! ```text
//! install root   override | PlatformLocator::steam_install_dir()
//!      |
//!      v
//! library roots  install root + steamapps/libraryfolders.vdf "path" entries
//!      |
//!      v
//! app dir        steamapps/appmanifest_<id>.acf "installdir"
//!                  -> steamapps/common/<installdir>
//!                  -> steamapps/common/<fallback>
//!      |
//!      v
//! managed dir    <app dir>/<data dir>/<managed dir>   (case-insensitive)
//! ```

pub mod platform;


use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use crate::error::{LocateError, SyncResult};
use crate::utility::fs::path::{find_child_dir_ignore_case, paths_equal_ignore_case};

pub use platform::{LinuxLocator, PlatformLocator, UnsupportedLocator, WindowsLocator, platform_locator};

/// Where a Steam game keeps its managed assemblies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameLayout {
    pub app_id: u32,
    /// Install dir tried when the manifest's `installdir` is missing on disk.
    pub fallback_install_dir: &'static str,
    pub data_dir: &'static str,
    pub managed_dir: &'static str,
}

pub const VALHEIM: GameLayout = GameLayout {
    app_id: 892_970,
    fallback_install_dir: "Valheim",
    data_dir: "valheim_data",
    managed_dir: "managed",
};

/// Resolves a game's directories from a Steam installation.
pub struct SteamLocator<'a> {
    platform: &'a dyn PlatformLocator,
    game: GameLayout,
}

impl<'a> SteamLocator<'a> {
    #[must_use]
    pub fn new(platform: &'a dyn PlatformLocator, game: GameLayout) -> Self {
        Self { platform, game }
    }

    /// Returns the Steam install root: `explicit` if given, otherwise the
    /// platform's auto-detected location.
    ///
    /// # Errors
    ///
    /// Returns `LocateError::SteamInstall` if nothing was found and
    /// `LocateError::SteamInstallMissing` if the root does not exist.
    pub fn install_root(&self, explicit: Option<&Path>) -> SyncResult<PathBuf> {
        let root = explicit
            .map(Path::to_path_buf)
            .or_else(|| self.platform.steam_install_dir())
            .ok_or(LocateError::SteamInstall)?;

        if !root.is_dir() {
            return Err(LocateError::SteamInstallMissing { path: root }.into());
        }

        debug!(path = %root.display(), "Steam install root");
        Ok(root)
    }

    /// Lists the install root followed by every existing library folder
    /// declared in `steamapps/libraryfolders.vdf`, without duplicates.
    #[must_use]
    pub fn library_roots(&self, install_root: &Path) -> Vec<PathBuf> {
        let mut roots = vec![install_root.to_path_buf()];

        let vdf = install_root.join("steamapps").join("libraryfolders.vdf");
        let Ok(content) = std::fs::read_to_string(&vdf) else {
            return roots;
        };
        let Ok(path_re) = Regex::new(r#""path"\s+"([^"]+)""#) else {
            return roots;
        };

        for line in content.lines() {
            let Some(value) = path_re.captures(line).and_then(|c| c.get(1)) else {
                continue;
            };

            let library = self.platform.normalize_library_path(value.as_str().trim());
            if library.is_dir() && !roots.iter().any(|r| paths_equal_ignore_case(r, &library)) {
                roots.push(library);
            }
        }

        debug!(count = roots.len(), "Steam library roots");
        roots
    }

    /// Finds the game's install directory in the first library that has it.
    ///
    /// # Errors
    ///
    /// Returns `LocateError::AppInstall` if no library holds the game.
    pub fn app_install_dir(&self, libraries: &[PathBuf]) -> SyncResult<PathBuf> {
        for library in libraries {
            let steamapps = library.join("steamapps");
            if !steamapps.is_dir() {
                continue;
            }

            let common = steamapps.join("common");
            let manifest = steamapps.join(format!("appmanifest_{}.acf", self.game.app_id));

            if let Some(install_dir) = read_manifest_install_dir(&manifest) {
                let candidate = common.join(install_dir);
                if candidate.is_dir() {
                    return Ok(candidate);
                }
            }

            let fallback = common.join(self.game.fallback_install_dir);
            if fallback.is_dir() {
                return Ok(fallback);
            }
        }

        Err(LocateError::AppInstall {
            app_id: self.game.app_id,
        }
        .into())
    }

    /// Resolves `<install dir>/<data dir>/<managed dir>`.
    ///
    /// The returned path is not checked for existence.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`Self::install_root`] and
    /// [`Self::app_install_dir`].
    pub fn managed_dir(&self, explicit_steam: Option<&Path>) -> SyncResult<PathBuf> {
        let install_root = self.install_root(explicit_steam)?;
        let libraries = self.library_roots(&install_root);
        let app_dir = self.app_install_dir(&libraries)?;

        let data_dir = find_child_dir_ignore_case(&app_dir, self.game.data_dir);
        Ok(find_child_dir_ignore_case(&data_dir, self.game.managed_dir))
    }
}

/// Reads the first `"installdir"` value from an app manifest.
#[must_use]
pub fn read_manifest_install_dir(manifest: &Path) -> Option<String> {
    let content = std::fs::read_to_string(manifest).ok()?;
    let installdir_re = Regex::new(r#""installdir"\s+"([^"]+)""#).ok()?;

    content
        .lines()
        .find_map(|line| installdir_re.captures(line)?.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|dir| !dir.is_empty())
}
