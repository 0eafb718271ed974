// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-OS Steam discovery.
//!
//! ```text
//! platform_locator()
//!   windows  -> WindowsLocator      HKLM registry, 64-bit then 32-bit view
//!   linux    -> LinuxLocator        ~/.local/share/Steam, ~/.steam/..., flatpak
//!   other    -> UnsupportedLocator  never finds anything
//! ```

use std::path::{Path, PathBuf};

/// OS-specific parts of Steam discovery.
pub trait PlatformLocator: Send + Sync {
    /// Detects the Steam install root, if this platform knows how.
    fn steam_install_dir(&self) -> Option<PathBuf>;

    /// Converts a path read from `libraryfolders.vdf` into a native path.
    ///
    /// VDF files escape backslashes, so `\\` collapses to `\`.
    fn normalize_library_path(&self, raw: &str) -> PathBuf {
        PathBuf::from(raw.replace("\\\\", "\\"))
    }
}

/// Linux: well-known Steam directories under the home directory.
#[derive(Debug, Clone)]
pub struct LinuxLocator {
    home: Option<PathBuf>,
}

impl LinuxLocator {
    /// Uses the current user's home directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            home: dirs::home_dir(),
        }
    }

    /// Uses `home` instead of the real home directory.
    #[must_use]
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: Some(home.into()),
        }
    }

    /// Candidate install roots, in lookup order.
    #[must_use]
    pub fn candidates(home: &Path) -> [PathBuf; 4] {
        [
            home.join(".local").join("share").join("Steam"),
            home.join(".steam").join("steam"),
            home.join(".steam").join("root"),
            home.join(".var")
                .join("app")
                .join("com.valvesoftware.Steam")
                .join(".local")
                .join("share")
                .join("Steam"),
        ]
    }
}

impl Default for LinuxLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformLocator for LinuxLocator {
    fn steam_install_dir(&self) -> Option<PathBuf> {
        let home = self.home.as_deref()?;
        Self::candidates(home)
            .into_iter()
            .find(|candidate| candidate.join("steamapps").is_dir())
    }

    fn normalize_library_path(&self, raw: &str) -> PathBuf {
        PathBuf::from(raw.replace("\\\\", "\\").replace('\\', "/"))
    }
}

/// Windows: `InstallPath` under the Valve Steam registry keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsLocator;

#[cfg(windows)]
impl PlatformLocator for WindowsLocator {
    fn steam_install_dir(&self) -> Option<PathBuf> {
        use windows::Win32::System::Registry::{RRF_SUBKEY_WOW6432KEY, RRF_SUBKEY_WOW6464KEY};

        const SUBKEYS: [&str; 2] = [r"SOFTWARE\WOW6432Node\Valve\Steam", r"SOFTWARE\Valve\Steam"];

        [RRF_SUBKEY_WOW6464KEY, RRF_SUBKEY_WOW6432KEY]
            .into_iter()
            .flat_map(|view| SUBKEYS.iter().map(move |subkey| (view, *subkey)))
            .filter_map(|(view, subkey)| registry::read_install_path(subkey, view))
            .find(|path| path.is_dir())
    }
}

#[cfg(not(windows))]
impl PlatformLocator for WindowsLocator {
    fn steam_install_dir(&self) -> Option<PathBuf> {
        None
    }
}

#[cfg(windows)]
mod registry {
    use std::ffi::c_void;
    use std::path::PathBuf;

    use windows::Win32::Foundation::ERROR_SUCCESS;
    use windows::Win32::System::Registry::{
        HKEY_LOCAL_MACHINE, REG_ROUTINE_FLAGS, RRF_RT_REG_SZ, RegGetValueW,
    };
    use windows::core::{HSTRING, w};

    /// Reads `HKLM\<subkey>\InstallPath` through the given registry view.
    pub(super) fn read_install_path(subkey: &str, view: REG_ROUTINE_FLAGS) -> Option<PathBuf> {
        let subkey = HSTRING::from(subkey);
        let flags = RRF_RT_REG_SZ | view;

        // First call sizes the buffer, second call fills it
        let mut size = 0u32;
        let status = unsafe {
            RegGetValueW(
                HKEY_LOCAL_MACHINE,
                &subkey,
                w!("InstallPath"),
                flags,
                None,
                None,
                Some(&raw mut size),
            )
        };
        if status != ERROR_SUCCESS || size == 0 {
            return None;
        }

        let mut buffer = vec![0u16; (size as usize).div_ceil(2)];
        let status = unsafe {
            RegGetValueW(
                HKEY_LOCAL_MACHINE,
                &subkey,
                w!("InstallPath"),
                flags,
                None,
                Some(buffer.as_mut_ptr().cast::<c_void>()),
                Some(&raw mut size),
            )
        };
        if status != ERROR_SUCCESS {
            return None;
        }

        let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
        let value = String::from_utf16_lossy(&buffer[..len]);
        let value = value.trim();
        (!value.is_empty()).then(|| PathBuf::from(value))
    }
}

/// Platforms without Steam auto-detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedLocator;

impl PlatformLocator for UnsupportedLocator {
    fn steam_install_dir(&self) -> Option<PathBuf> {
        None
    }
}

/// Returns the locator for the OS this binary was built for.
#[must_use]
pub fn platform_locator() -> Box<dyn PlatformLocator> {
    if cfg!(windows) {
        Box::new(WindowsLocator)
    } else if cfg!(target_os = "linux") {
        Box::new(LinuxLocator::new())
    } else {
        Box::new(UnsupportedLocator)
    }
}
