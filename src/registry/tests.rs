// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::archive::extract_archive;
use super::candidate::{best_candidate, score_candidate};
use super::version::{PackageVersion, select_latest};
use super::*;
use crate::error::SyncError;
use std::io::{Cursor, Write};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn v(raw: &str) -> PackageVersion {
    PackageVersion::parse(raw)
}

fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

// =============================================================================
// Versions
// =============================================================================

#[test]
fn test_version_ordering() {
    assert!(v("1.0.0") > v("1.0.0-beta"));
    assert!(v("1.0.0-beta") > v("0.9.9"));
    assert!(v("1.0.0-alpha") < v("1.0.0-beta"));
    assert!(v("1.0.0-ALPHA") < v("1.0.0-beta"));
    assert!(v("2.10.0") > v("2.9.3"));
    assert!(v("1.0") < v("1.0.0"));
    assert!(v("1.0.0") < v("1.0.0.1"));
    assert_eq!(v("1.0.0-RC"), v("1.0.0-rc"));
}

#[test]
fn test_version_unparseable_is_zero() {
    assert_eq!(v("latest"), v("0.0.0.0"));
    assert_eq!(v("1"), v("0.0.0.0"));
    assert_eq!(v("1.2.3.4.5"), v("0.0.0.0"));
    assert_eq!(v("1.x.3"), v("0.0.0.0"));
    assert!(v("garbage") < v("0.0.1"));
}

#[test]
fn test_version_prerelease_label() {
    assert_eq!(v("5.4.21-be.1").prerelease(), Some("be.1"));
    assert!(v("1.0.0-beta-2").is_prerelease());
    assert_eq!(v("1.0.0-beta-2").prerelease(), Some("beta-2"));
    // A dangling dash carries no label
    assert!(!v("1.0.0-").is_prerelease());
    assert!(!v("1.0.0").is_prerelease());
}

#[test]
fn test_select_latest_filters_prerelease() {
    let versions = ["5.4.19", "5.4.21", "6.0.0-be.674", "5.4.20", ""];

    assert_eq!(select_latest(versions, false), Some("5.4.21"));
    assert_eq!(select_latest(versions, true), Some("6.0.0-be.674"));
    assert_eq!(select_latest(["1.0.0-rc1"], false), None);
    assert_eq!(select_latest(Vec::<&str>::new(), true), None);
}

#[test]
fn test_select_latest_ties_pick_last() {
    assert_eq!(select_latest(["1.0.0-RC", "1.0.0-rc"], true), Some("1.0.0-rc"));
}

// =============================================================================
// Candidate ranking
// =============================================================================

#[test]
fn test_score_candidate() {
    assert_eq!(score_candidate(Path::new("x/lib/net46/A.dll")), 1000 - 200 - 20 + 3);
    // "/net462" also contains "/net46"
    assert_eq!(score_candidate(Path::new("x/lib/net462/A.dll")), 1000 - 200 - 30 - 20 + 3);
    assert_eq!(score_candidate(Path::new(r"x\REF\Net48\A.dll")), 1000 - 150 - 40 + 3);
}

#[test]
fn test_best_candidate_prefers_lib_netstandard() {
    let candidates = vec![
        PathBuf::from("/tmp/x/ref/net48/0Harmony.dll"),
        PathBuf::from("/tmp/x/lib/netstandard2.0/0Harmony.dll"),
        PathBuf::from("/tmp/x/0Harmony.dll"),
    ];
    assert_eq!(best_candidate(&candidates), Some(&candidates[1]));
}

#[test]
fn test_best_candidate_prefers_shallower() {
    let candidates = vec![
        PathBuf::from("/tmp/x/lib/core/deep/A.dll"),
        PathBuf::from("/tmp/x/lib/core/A.dll"),
    ];
    assert_eq!(best_candidate(&candidates), Some(&candidates[1]));
}

#[test]
fn test_best_candidate_tie_breaks_on_path() {
    let candidates = vec![
        PathBuf::from("/tmp/x/lib/b/A.dll"),
        PathBuf::from("/tmp/x/lib/A/A.dll"),
    ];
    assert_eq!(best_candidate(&candidates), Some(&candidates[1]));
    assert_eq!(best_candidate(&[]), None);
}

// =============================================================================
// Feed documents and URLs
// =============================================================================

#[test]
fn test_service_index_base_address() {
    let index: ServiceIndex = serde_json::from_str(
        r#"{
            "version": "3.0.0",
            "resources": [
                { "@id": "https://example.test/query", "@type": "SearchQueryService" },
                { "@type": "PackageBaseAddress/3.0.0" },
                { "@id": "https://example.test/flat", "@type": "packagebaseaddress/3.0.0" },
                { "@id": "https://example.test/other/", "@type": "PackageBaseAddress/3.0.0" }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(
        index.package_base_address().as_deref(),
        Some("https://example.test/flat/")
    );

    let empty: ServiceIndex = serde_json::from_str(r#"{"resources": []}"#).unwrap();
    assert_eq!(empty.package_base_address(), None);
}

#[test]
fn test_feed_urls() {
    assert_eq!(
        version_index_url("https://example.test/flat/", "BepInEx.BaseLib"),
        "https://example.test/flat/bepinex.baselib/index.json"
    );
    assert_eq!(
        package_archive_url("https://example.test/flat", "HarmonyX", "2.10.0-RC1"),
        "https://example.test/flat/harmonyx/2.10.0-rc1/harmonyx.2.10.0-rc1.nupkg"
    );
}

// =============================================================================
// Archive extraction
// =============================================================================

#[tokio::test]
async fn test_extract_archive_writes_entries() {
    let temp = temp_dir();
    let archive = temp.path().join("pkg.nupkg");
    std::fs::write(
        &archive,
        zip_bytes(&[
            ("lib/net46/0Harmony.dll", &b"harmony"[..]),
            ("pkg.nuspec", &b"<package/>"[..]),
        ]),
    )
    .unwrap();

    let dest = temp.path().join("out").join("extracted");
    std::fs::create_dir_all(&dest).unwrap();
    std::fs::write(dest.join("pkg.nuspec"), b"stale").unwrap();

    let written = extract_archive(&archive, &dest).await.unwrap();

    assert_eq!(written, 2);
    assert_eq!(
        std::fs::read(dest.join("lib/net46/0Harmony.dll")).unwrap(),
        b"harmony"
    );
    assert_eq!(std::fs::read(dest.join("pkg.nuspec")).unwrap(), b"<package/>");
}

#[tokio::test]
async fn test_extract_archive_rejects_garbage() {
    let temp = temp_dir();
    let archive = temp.path().join("broken.nupkg");
    std::fs::write(&archive, b"not a zip").unwrap();

    let err = extract_archive(&archive, &temp.path().join("x"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, SyncError::Registry(ref e) if matches!(**e, RegistryError::InvalidArchive { .. }))
    );
}
