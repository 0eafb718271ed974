// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::Parser;

use super::loader::{ConfigLoader, load_file_config};
use super::{
    DEFAULT_PACKAGE_IDS, DEFAULT_SOURCES, EnvSnapshot, FileConfig, Options,
    resolve_distinct_values,
};
use crate::cli::Cli;
use crate::error::{ConfigError, SyncError};
use crate::net::ProgressDisplay;

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("sync-managed").chain(args.iter().copied())).unwrap()
}

fn env(pairs: &[(&str, &str)]) -> EnvSnapshot {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    EnvSnapshot::from_lookup(|key| map.get(key).cloned())
}

fn root() -> PathBuf {
    PathBuf::from("/work/mod")
}

#[test]
fn test_defaults() {
    let options = Options::resolve(&cli(&[]), &env(&[]), &FileConfig::default(), &root()).unwrap();

    assert_eq!(options.ignore_list(), Path::new("/work/mod/ignore-managed.md"));
    assert_eq!(options.out_dir(), Path::new("/work/mod/lib/net46"));
    assert_eq!(options.package_ids(), DEFAULT_PACKAGE_IDS);
    assert_eq!(options.sources(), DEFAULT_SOURCES);
    assert!(!options.include_prerelease());
    assert!(options.managed_path().is_none());
    assert!(options.steam_path().is_none());
    assert_eq!(options.progress(), ProgressDisplay::Bar);
}

#[test]
fn test_relative_paths_anchor_at_working_root() {
    let options = Options::resolve(
        &cli(&["-o", "../out/./dlls", "-i", "lists/ignore.md", "-m", "game/Managed"]),
        &env(&[]),
        &FileConfig::default(),
        &root(),
    )
    .unwrap();

    assert_eq!(options.out_dir(), Path::new("/work/out/dlls"));
    assert_eq!(options.ignore_list(), Path::new("/work/mod/lists/ignore.md"));
    assert_eq!(options.managed_path(), Some(Path::new("/work/mod/game/Managed")));
}

#[test]
fn test_cli_beats_env_for_managed_path() {
    let options = Options::resolve(
        &cli(&["-m", "/cli/Managed"]),
        &env(&[("VALHEIM_MANAGED", "/env/Managed")]),
        &FileConfig::default(),
        &root(),
    )
    .unwrap();
    assert_eq!(options.managed_path(), Some(Path::new("/cli/Managed")));

    let options = Options::resolve(
        &cli(&[]),
        &env(&[("VALHEIM_MANAGED", "/env/Managed")]),
        &FileConfig::default(),
        &root(),
    )
    .unwrap();
    assert_eq!(options.managed_path(), Some(Path::new("/env/Managed")));
}

#[test]
fn test_steam_path_env_order() {
    let options = Options::resolve(
        &cli(&[]),
        &env(&[("STEAM_PATH", "  "), ("STEAM_DIR", "/opt/steam-dir")]),
        &FileConfig::default(),
        &root(),
    )
    .unwrap();
    assert_eq!(options.steam_path(), Some(Path::new("/opt/steam-dir")));

    let options = Options::resolve(
        &cli(&[]),
        &env(&[("STEAM_PATH", "/opt/steam"), ("STEAM_DIR", "/opt/steam-dir")]),
        &FileConfig::default(),
        &root(),
    )
    .unwrap();
    assert_eq!(options.steam_path(), Some(Path::new("/opt/steam")));
}

#[test]
fn test_list_sources_are_concatenated_and_deduplicated() {
    let options = Options::resolve(
        &cli(&[
            "--package-id",
            "HarmonyX",
            "--package-ids",
            " BepInEx.Core , harmonyx,,",
        ]),
        &env(&[("BEPINEX_PACKAGE_IDS", "BepInEx.BaseLib,BEPINEX.CORE")]),
        &FileConfig::default(),
        &root(),
    )
    .unwrap();

    assert_eq!(
        options.package_ids(),
        ["HarmonyX", "BepInEx.Core", "BepInEx.BaseLib"]
    );
}

#[test]
fn test_env_list_alone_replaces_defaults() {
    let options = Options::resolve(
        &cli(&[]),
        &env(&[("NUGET_SERVICE_INDEXES", "https://feed.example/v3/index.json")]),
        &FileConfig::default(),
        &root(),
    )
    .unwrap();
    assert_eq!(options.sources(), ["https://feed.example/v3/index.json"]);
}

#[test]
fn test_file_config_used_when_cli_and_env_silent() {
    let file = FileConfig {
        out_dir: Some(PathBuf::from("refs")),
        package_ids: vec!["BepInEx.Core".to_string()],
        include_prerelease: Some(true),
        ..FileConfig::default()
    };
    let options = Options::resolve(&cli(&[]), &env(&[]), &file, &root()).unwrap();

    assert_eq!(options.out_dir(), Path::new("/work/mod/refs"));
    assert_eq!(options.package_ids(), ["BepInEx.Core"]);
    assert_eq!(options.sources(), DEFAULT_SOURCES);
    assert!(options.include_prerelease());
}

#[test]
fn test_blank_values_yield_configuration_error() {
    let err = Options::resolve(
        &cli(&["--package-id", " "]),
        &env(&[]),
        &FileConfig::default(),
        &root(),
    )
    .unwrap_err();
    // A blank repeated value counts as "given", so the defaults do not kick in
    assert!(matches!(err, SyncError::Config(ref e) if matches!(**e, ConfigError::EmptyPackageIds)));

    let err = Options::resolve(
        &cli(&["--source", " "]),
        &env(&[]),
        &FileConfig::default(),
        &root(),
    )
    .unwrap_err();
    assert!(matches!(err, SyncError::Config(ref e) if matches!(**e, ConfigError::EmptySources)));
}

#[test]
fn test_blank_csv_falls_back_to_defaults() {
    let options = Options::resolve(
        &cli(&["--package-ids", " , "]),
        &env(&[]),
        &FileConfig::default(),
        &root(),
    )
    .unwrap();
    assert_eq!(options.package_ids(), DEFAULT_PACKAGE_IDS);
}

#[test]
fn test_include_prerelease_env_is_case_insensitive() {
    for (value, expected) in [("TRUE", true), ("true", true), ("1", false), ("no", false)] {
        let options = Options::resolve(
            &cli(&[]),
            &env(&[("BEPINEX_INCLUDE_PRERELEASE", value)]),
            &FileConfig::default(),
            &root(),
        )
        .unwrap();
        assert_eq!(options.include_prerelease(), expected, "value {value:?}");
    }
}

#[test]
fn test_no_progress_flag() {
    let options = Options::resolve(
        &cli(&["--no-progress"]),
        &env(&[]),
        &FileConfig::default(),
        &root(),
    )
    .unwrap();
    assert_eq!(options.progress(), ProgressDisplay::Silent);
}

#[test]
fn test_resolve_distinct_values_keeps_first_spelling() {
    let values = resolve_distinct_values(
        &["A".to_string(), "b".to_string()],
        Some("a,B,c"),
        None,
        &[],
        &["default"],
    );
    assert_eq!(values, ["A", "b", "c"]);
}

#[test]
fn test_loader_from_toml_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("sync-managed.toml");
    std::fs::write(
        &path,
        r#"
        out_dir = "lib/net46"
        package_ids = ["HarmonyX"]
        sources = ["https://feed.example/v3/index.json"]
        include_prerelease = false
        "#,
    )
    .unwrap();

    let file = ConfigLoader::new().add_toml_file(&path).build().unwrap();

    assert_eq!(file.out_dir, Some(PathBuf::from("lib/net46")));
    assert_eq!(file.package_ids, ["HarmonyX"]);
    assert_eq!(file.sources, ["https://feed.example/v3/index.json"]);
    assert_eq!(file.include_prerelease, Some(false));
}

#[test]
fn test_loader_rejects_unknown_keys() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("sync-managed.toml");
    std::fs::write(&path, "no_such_key = 1\n").unwrap();

    let result = ConfigLoader::new().add_toml_file_optional(&path).build();
    assert!(matches!(result, Err(SyncError::Config(_))));
}

#[test]
fn test_load_file_config_optional_default() {
    let temp = tempfile::tempdir().unwrap();

    let file = load_file_config(None, temp.path()).unwrap();
    assert_eq!(file, FileConfig::default());

    std::fs::write(
        temp.path().join("sync-managed.toml"),
        "managed_path = \"/games/Managed\"\n",
    )
    .unwrap();
    let file = load_file_config(None, temp.path()).unwrap();
    assert_eq!(file.managed_path, Some(PathBuf::from("/games/Managed")));
}

#[test]
fn test_load_file_config_explicit_must_exist() {
    let temp = tempfile::tempdir().unwrap();
    let missing = temp.path().join("nope.toml");
    assert!(load_file_config(Some(&missing), temp.path()).is_err());
}
