// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use super::{LocateError, NetworkError, RegistryError, SyncError, SyncResult, UnsafeTargetError};

#[test]
fn test_missing_files_display() {
    let err = SyncError::from(RegistryError::MissingFiles {
        files: vec!["0Harmony.dll".to_string(), "BepInEx.dll".to_string()],
    });
    insta::assert_snapshot!(
        err.to_string(),
        @"registry error: could not find required file(s) in downloaded packages: 0Harmony.dll, BepInEx.dll"
    );
}

#[test]
fn test_source_exhausted_names_package() {
    let err = SyncError::from(RegistryError::SourceExhausted {
        package_id: "HarmonyX".to_string(),
    });
    insta::assert_snapshot!(
        err.to_string(),
        @"registry error: package 'HarmonyX' not found in any configured package source"
    );
}

#[test]
fn test_not_found_is_transparent() {
    let err = SyncError::from(LocateError::AppInstall { app_id: 892_970 });
    insta::assert_snapshot!(
        err.to_string(),
        @"could not locate Steam app install dir for app id 892970"
    );
}

#[test]
fn test_unsafe_target_display() {
    let err = SyncError::from(UnsafeTargetError::FilesystemRoot {
        path: PathBuf::from("/"),
    });
    insta::assert_snapshot!(
        err.to_string(),
        @"refusing to clean destination: it looks like a filesystem root: /"
    );
}

#[test]
fn test_is_http_not_found() {
    let not_found = SyncError::from(NetworkError::HttpError {
        status: 404,
        url: "https://example.invalid/x".to_string(),
    });
    let server_error = SyncError::from(NetworkError::HttpError {
        status: 500,
        url: "https://example.invalid/x".to_string(),
    });

    assert!(not_found.is_http_not_found());
    assert!(!server_error.is_http_not_found());
    assert!(!SyncError::from(LocateError::SteamInstall).is_http_not_found());
}

#[test]
fn test_sync_error_size() {
    // Every variant is boxed, so the enum is a discriminant plus one pointer
    let size = std::mem::size_of::<SyncError>();
    assert!(size <= 24, "SyncError is {size} bytes, expected <= 24");
}

#[test]
fn test_sync_result_size() {
    let size = std::mem::size_of::<SyncResult<()>>();
    assert!(size <= 24, "SyncResult<()> is {size} bytes, expected <= 24");
}
