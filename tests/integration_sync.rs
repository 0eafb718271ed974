// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! End-to-end tests for a full sync run against a fake game install and a
//! mocked package feed.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use clap::Parser;
use serde_json::json;
use sync_managed::cli::Cli;
use sync_managed::cmd::sync::run_sync_with;
use sync_managed::config::{EnvSnapshot, FileConfig, Options};
use sync_managed::error::{SyncError, UnsafeTargetError};
use sync_managed::net::ProgressDisplay;
use sync_managed::registry::RegistryClient;
use sync_managed::steam::{PlatformLocator, UnsupportedLocator};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::SimpleFileOptions;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn options(args: &[&str], root: &Path) -> Options {
    let cli = Cli::try_parse_from(std::iter::once("sync-managed").chain(args.iter().copied()))
        .unwrap();
    Options::resolve(&cli, &EnvSnapshot::default(), &FileConfig::default(), root).unwrap()
}

fn client(temp: &TempDir) -> RegistryClient {
    RegistryClient::new(false)
        .progress(ProgressDisplay::Silent)
        .temp_root(temp.path())
}

async fn mock_feed() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": [
                { "@id": format!("{}/flat/", server.uri()), "@type": "PackageBaseAddress/3.0.0" }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flat/harmonyx/index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "versions": ["2.10.0"] })))
        .mount(&server)
        .await;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for name in ["lib/net45/0Harmony.dll", "lib/net45/BepInEx.dll"] {
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(name.as_bytes()).unwrap();
    }
    let body = writer.finish().unwrap().into_inner();

    Mock::given(method("GET"))
        .and(path("/flat/harmonyx/2.10.0/harmonyx.2.10.0.nupkg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(&server)
        .await;

    server
}

fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_full_sync_with_explicit_managed_path() {
    let server = mock_feed().await;
    let root = temp_dir();
    let scratch = temp_dir();

    let managed = root.path().join("game/Valheim_Data/Managed");
    fs::create_dir_all(&managed).unwrap();
    for name in ["A.dll", "B.dll", "C.dll"] {
        fs::write(managed.join(name), name).unwrap();
    }
    fs::write(root.path().join("ignore-managed.md"), "# runtime only\nB\n").unwrap();

    let out = root.path().join("lib/net46");
    fs::create_dir_all(out.join("stale-dir")).unwrap();
    fs::write(out.join("stale.dll"), "old").unwrap();

    let source = format!("{}/v3/index.json", server.uri());
    let opts = options(
        &[
            "--managed-path",
            "game/valheim_data/Managed",
            "--package-ids",
            "HarmonyX",
            "--sources",
            &source,
        ],
        root.path(),
    );

    let summary = run_sync_with(&opts, &UnsupportedLocator, &client(&scratch))
        .await
        .unwrap();

    assert_eq!(summary.out_dir, out);
    assert_eq!((summary.copied, summary.skipped), (2, 1));
    assert_eq!(summary.fetched.len(), 2);
    assert_eq!(summary.fetched[0].source, source);
    assert_eq!(
        list_dir(&out),
        ["0Harmony.dll", "A.dll", "BepInEx.dll", "C.dll"]
    );
}

/// Platform whose Steam install is a temp directory.
struct FakeSteam(std::path::PathBuf);

impl PlatformLocator for FakeSteam {
    fn steam_install_dir(&self) -> Option<std::path::PathBuf> {
        Some(self.0.clone())
    }
}

#[tokio::test]
async fn test_full_sync_discovers_steam_install() {
    let server = mock_feed().await;
    let root = temp_dir();
    let scratch = temp_dir();

    let steam = root.path().join("Steam");
    let managed = steam.join("steamapps/common/Valheim/valheim_Data/Managed");
    fs::create_dir_all(&managed).unwrap();
    fs::write(managed.join("assembly_valheim.dll"), "game").unwrap();

    let source = format!("{}/v3/index.json", server.uri());
    let opts = options(&["--package-id", "HarmonyX", "--source", &source], root.path());

    let summary = run_sync_with(&opts, &FakeSteam(steam), &client(&scratch))
        .await
        .unwrap();

    assert_eq!(summary.managed_dir, managed);
    assert_eq!(summary.copied, 1);
    assert!(root.path().join("lib/net46/assembly_valheim.dll").is_file());
}

#[tokio::test]
async fn test_refuses_to_clean_working_root() {
    let root = temp_dir();
    let scratch = temp_dir();
    let keep = root.path().join("keep.txt");
    fs::write(&keep, "important").unwrap();

    let opts = options(&["-o", "."], root.path());
    let err = run_sync_with(&opts, &UnsupportedLocator, &client(&scratch))
        .await
        .unwrap_err();

    let sync_err = err.downcast_ref::<SyncError>().unwrap();
    assert!(
        matches!(sync_err, SyncError::UnsafeTarget(e) if matches!(**e, UnsafeTargetError::WorkingRoot { .. }))
    );
    assert!(keep.is_file());
}

#[tokio::test]
async fn test_missing_managed_dir_fails_after_cleaning() {
    let root = temp_dir();
    let scratch = temp_dir();
    let out = root.path().join("lib/net46");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("stale.dll"), "old").unwrap();

    let opts = options(&["-m", "no/such/Managed"], root.path());
    let err = run_sync_with(&opts, &UnsupportedLocator, &client(&scratch))
        .await
        .unwrap_err();

    assert!(format!("{err:#}").starts_with("Managed folder not found: "));
    assert!(list_dir(&out).is_empty());
}
