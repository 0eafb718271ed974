// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! Options + PlatformLocator --> cmd::sync::run_sync() --> SyncSummary
//! ```

pub mod sync;
