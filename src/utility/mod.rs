// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Utility modules.
//!
//! ```text
//! fs
//!   path:  absolutize(), normalize_path_casing(), find_child_dir_ignore_case()
//!   copy:  copy_filtered_files()
//!   clean: clean_destination()
//!   walk:  find_files_named()
//! ```

pub mod fs;
