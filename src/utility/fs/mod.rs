// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem utilities.
//!
//! ```text
//! path:  absolutize()             lexical, no symlink resolution
//!        normalize_path_casing()  case-insensitive walk from the root
//!        paths_equal_ignore_case(), filesystem_root()
//! copy:  copy_filtered_files()    top-level files minus an ignore set
//! clean: clean_destination()      empty a dir, refusing dangerous targets
//! walk:  find_files_named()       recursive exact-name search
//! ```

pub mod clean;
pub mod copy;
pub mod path;
pub mod walk;
