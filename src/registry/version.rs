// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Package version ordering.
//!
//! ```text
//! "1.2.3-beta.1"  ->  numeric [1, 2, 3, -]  label "beta.1"
//! "1.2"           ->  numeric [1, 2, -, -]
//! "latest"        ->  numeric [0, 0, 0, 0]
//!
//! order: numeric parts (missing < 0), then stable > prerelease,
//!        then labels compared ignoring case
//! ```

use std::cmp::Ordering;

/// A parsed version string. Compares the way package feeds order releases.
#[derive(Debug, Clone)]
pub struct PackageVersion {
    numeric: [Option<u32>; 4],
    prerelease: Option<String>,
}

impl PackageVersion {
    /// Parses `raw`; an unparseable numeric part becomes `0.0.0.0`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let (core, label) = match raw.split_once('-') {
            Some((core, label)) => (core.trim(), Some(label.trim())),
            None => (raw.trim(), None),
        };

        Self {
            numeric: parse_numeric(core).unwrap_or([Some(0); 4]),
            prerelease: label.filter(|l| !l.is_empty()).map(str::to_string),
        }
    }

    #[must_use]
    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    #[must_use]
    pub fn prerelease(&self) -> Option<&str> {
        self.prerelease.as_deref()
    }
}

/// Two to four dot-separated non-negative integers.
fn parse_numeric(core: &str) -> Option<[Option<u32>; 4]> {
    let parts: Vec<&str> = core.split('.').collect();
    if !(2..=4).contains(&parts.len()) {
        return None;
    }

    let mut numeric = [None; 4];
    for (slot, part) in numeric.iter_mut().zip(parts) {
        let part = part.trim();
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value: u32 = part.parse().ok()?;
        if i32::try_from(value).is_err() {
            return None;
        }
        *slot = Some(value);
    }
    Some(numeric)
}

fn compare_labels(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_uppercase)
        .cmp(b.chars().flat_map(char::to_uppercase))
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.numeric
            .cmp(&other.numeric)
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => compare_labels(a, b),
            })
    }
}

impl PartialEq for PackageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PackageVersion {}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Picks the highest version from a feed's version list.
///
/// Blank entries are ignored. Unless `include_prerelease` is set, any
/// version containing `-` is dropped before comparing. Among equal
/// versions the later entry wins.
#[must_use]
pub fn select_latest<'a, I>(versions: I, include_prerelease: bool) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    versions
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .filter(|v| include_prerelease || !v.contains('-'))
        .map(|v| (PackageVersion::parse(v), v))
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, raw)| raw)
}
