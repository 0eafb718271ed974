// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module using clap derive.
//!
//! ```text
//! sync-managed [options]
//!   paths     -m managed, -s steam, -i ignore list, -o output
//!   packages  --package-id (repeat) | --package-ids CSV
//!   sources   --source (repeat)     | --sources CSV
//!   misc      --include-prerelease, --config, --log-level, --log-file
//! ```
//!
//! The camelCase spellings of the original script (`--managedPath`,
//! `--bepInExPackageId`, `--nugetServiceIndexes`, ...) are accepted as hidden
//! aliases so existing build scripts keep working.


use clap::Parser;
use std::path::PathBuf;

/// Synchronizes Valheim managed assemblies for mod builds.
#[derive(Debug, Parser)]
#[command(
    name = "sync-managed",
    author,
    version,
    about = "Synchronizes Valheim managed assemblies and BepInEx DLLs",
    long_about = "Copies the game's managed assemblies (minus an ignore list) into a\n\
                  local output directory, then fetches the latest 0Harmony.dll and\n\
                  BepInEx.dll from NuGet v3 package sources into the same directory.\n\n\
                  The output directory is emptied before every run.",
    after_help = "ENVIRONMENT:\n\n  \
                  VALHEIM_MANAGED              Path to .../Valheim/valheim_Data/Managed\n  \
                  STEAM_PATH / STEAM_DIR       Steam install folder\n  \
                  BEPINEX_PACKAGE_IDS          CSV list of package ids\n  \
                  BEPINEX_INCLUDE_PRERELEASE   true/false\n  \
                  NUGET_SERVICE_INDEXES        CSV list of v3 index.json sources\n\n\
                  IGNORE LIST FORMAT (ignore-managed.md):\n\n  \
                  # Lines starting with '#' are comments\n  \
                  # List file names (with or without extension), one per line\n  \
                  mscorlib.dll\n  \
                  System"
)]
pub struct Cli {
    /// Explicit path to .../Valheim/valheim_Data/Managed.
    #[arg(short = 'm', long = "managed-path", alias = "managedPath", value_name = "PATH")]
    pub managed_path: Option<PathBuf>,

    /// Explicit Steam install folder.
    #[arg(short = 's', long = "steam-path", alias = "steamPath", value_name = "PATH")]
    pub steam_path: Option<PathBuf>,

    /// Ignore list file [default: ./ignore-managed.md].
    #[arg(
        short = 'i',
        long = "ignore-path",
        alias = "ignorePath",
        value_name = "PATH",
        conflicts_with = "list_path"
    )]
    pub ignore_path: Option<PathBuf>,

    /// Deprecated alias of --ignore-path.
    #[arg(
        short = 'l',
        long = "list-path",
        alias = "listPath",
        value_name = "PATH",
        hide = true
    )]
    pub list_path: Option<PathBuf>,

    /// Package id to search for the required DLLs (repeatable, replaces the defaults).
    #[arg(
        long = "package-id",
        alias = "bepInExPackageId",
        value_name = "ID",
        action = clap::ArgAction::Append
    )]
    pub package_ids: Vec<String>,

    /// Package ids as CSV.
    #[arg(long = "package-ids", alias = "bepInExPackageIds", value_name = "CSV")]
    pub package_ids_csv: Option<String>,

    /// NuGet v3 service index URL (repeatable, replaces the defaults).
    #[arg(
        long = "source",
        alias = "nugetServiceIndex",
        value_name = "URL",
        action = clap::ArgAction::Append
    )]
    pub sources: Vec<String>,

    /// NuGet v3 service index URLs as CSV.
    #[arg(long = "sources", alias = "nugetServiceIndexes", value_name = "CSV")]
    pub sources_csv: Option<String>,

    /// Allow prerelease versions when picking the latest package version.
    #[arg(long = "include-prerelease", alias = "includePrerelease")]
    pub include_prerelease: bool,

    /// Output directory [default: ./lib/net46].
    #[arg(short = 'o', long = "out-dir", alias = "outDir", value_name = "PATH")]
    pub out_dir: Option<PathBuf>,

    /// TOML configuration file [default: ./sync-managed.toml if present].
    #[arg(long = "config", env = "SYNC_MANAGED_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6))]
    pub log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Do not draw a progress bar while downloading packages.
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

impl Cli {
    /// The ignore list path, honouring the deprecated `--list-path` spelling.
    #[must_use]
    pub fn ignore_list(&self) -> Option<&PathBuf> {
        self.ignore_path.as_ref().or(self.list_path.as_ref())
    }

    /// True if the ignore list was given through the deprecated alias.
    #[must_use]
    pub const fn uses_deprecated_list_path(&self) -> bool {
        self.list_path.is_some()
    }
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
