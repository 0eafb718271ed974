// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> EnvSnapshot + sync-managed.toml --> Options
//!   --> cmd::sync::run_sync() --> "Done. Output: <dir>"
//! ```

use std::process::ExitCode;

use anyhow::Context;
use sync_managed::cli::{self, Cli};
use sync_managed::cmd::sync::run_sync;
use sync_managed::config::loader::load_file_config;
use sync_managed::config::{EnvSnapshot, Options};
use sync_managed::logging::init_logging;
use sync_managed::logging::{LogConfig, LogLevel};
use sync_managed::steam::platform_locator;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let log_config = build_log_config(&cli);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.uses_deprecated_list_path() {
        tracing::warn!("-l/--list-path is deprecated, use -i/--ignore-path instead");
    }

    match run(&cli).await {
        Ok(out_dir) => {
            println!("Done. Output: {out_dir}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn build_log_config(cli: &Cli) -> LogConfig {
    let console_level = cli
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO);

    LogConfig::builder()
        .with_console_level(console_level)
        .maybe_with_log_file(cli.log_file.as_ref().map(|p| p.display().to_string()))
        .build()
}

async fn run(cli: &Cli) -> sync_managed::error::Result<String> {
    let working_root = std::env::current_dir().context("failed to read current directory")?;
    let env = EnvSnapshot::from_process();
    let file_config = load_file_config(cli.config.as_deref(), &working_root)?;
    let options = Options::resolve(cli, &env, &file_config, &working_root)?;

    let platform = platform_locator();
    let summary = run_sync(&options, platform.as_ref()).await?;

    Ok(summary.out_dir.display().to_string())
}
