// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)         cmd::sync (run)
//!                |                     |
//!                v                     |
//!   ,---------------------------,      |
//!   |          config           | <----+
//!   |  CLI > env > TOML > dflt  |
//!   '---------------------------'
//!                |
//!     +----------+-----------+
//!     v          v           v
//!   steam     managed     registry
//!  locator   ignore+copy  NuGet v3, zip
//!     |                      |
//!     +----------+-----------+
//!                v
//!   +-----------------------------------------+
//!   |  foundation   error, logging, net,      |
//!   |               utility (fs)              |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod logging;
pub mod managed;
pub mod net;
pub mod registry;
pub mod steam;
pub mod utility;
