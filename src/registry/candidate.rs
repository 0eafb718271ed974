// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Ranking of same-named files inside an extracted package. Lower is better.
//!
//! ```text
//! base                        1000
//! /lib/  /ref/  /runtimes/    -200  -150  -50
//! /netstandard2.0  /net48     -40   -40
//! /net462  /net46  /net452    -30   -20   -10   (substring match)
//! each '/'                    +1
//! ```

use std::path::{Path, PathBuf};

const BASE_SCORE: i32 = 1000;

const SEGMENT_WEIGHTS: &[(&str, i32)] = &[("/lib/", 200), ("/ref/", 150), ("/runtimes/", 50)];

const FRAMEWORK_WEIGHTS: &[(&str, i32)] = &[
    ("/netstandard2.0", 40),
    ("/net48", 40),
    ("/net462", 30),
    ("/net46", 20),
    ("/net452", 10),
];

fn normalized(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/").to_lowercase()
}

/// Scores a candidate path.
#[must_use]
pub fn score_candidate(path: &Path) -> i32 {
    let norm = normalized(path);

    let bonus: i32 = SEGMENT_WEIGHTS
        .iter()
        .chain(FRAMEWORK_WEIGHTS)
        .filter(|(needle, _)| norm.contains(needle))
        .map(|(_, weight)| weight)
        .sum();

    let depth = i32::try_from(norm.matches('/').count()).unwrap_or(i32::MAX / 2);
    BASE_SCORE - bonus + depth
}

/// Picks the best-scoring candidate; ties go to the smaller path, ignoring case.
#[must_use]
pub fn best_candidate(candidates: &[PathBuf]) -> Option<&PathBuf> {
    candidates.iter().min_by(|a, b| {
        score_candidate(a)
            .cmp(&score_candidate(b))
            .then_with(|| normalized_case(a).cmp(&normalized_case(b)))
    })
}

fn normalized_case(path: &Path) -> String {
    path.to_string_lossy().to_uppercase()
}
