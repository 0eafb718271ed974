// sync-managed: Valheim managed assembly sync tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! NuGet v3 package feeds.
//!
//! ```text
//! for package id:                         (stop once nothing is pending)
//!   for source:
//!     index.json ----> PackageBaseAddress/  (cached per source)
//!     <base><id>/index.json ----> versions   404 -> next source
//!   latest version
//!   <base><id>/<ver>/<id>.<ver>.nupkg --> temp/sync-managed/nuget/<id>/<ver>/<rand>/
//!   extracted/ --> best match per pending file --> out dir
//! ```

pub mod archive;
pub mod candidate;
pub mod version;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tempfile::TempDir;
use tracing::{debug, info};

use crate::error::{FsError, RegistryError, SyncResult};
use crate::net::{DOWNLOAD_TIMEOUT, Downloader, METADATA_TIMEOUT, ProgressDisplay};
use crate::utility::fs::walk::find_files_named;

use archive::extract_archive;
use candidate::best_candidate;
use version::select_latest;

/// Files every sync must obtain from the package feeds.
pub const REQUIRED_FILES: &[&str] = &["0Harmony.dll", "BepInEx.dll"];

/// Resource type prefix for the flat-container base address.
pub const PACKAGE_BASE_ADDRESS_TYPE: &str = "PackageBaseAddress/";

/// Service index entry point (`index.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceIndex {
    #[serde(default)]
    pub resources: Vec<ServiceResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceResource {
    #[serde(rename = "@id", default)]
    pub id: Option<String>,
    #[serde(rename = "@type", default)]
    pub resource_type: Option<String>,
}

impl ServiceIndex {
    /// Address of the first `PackageBaseAddress/*` resource, with a trailing slash.
    #[must_use]
    pub fn package_base_address(&self) -> Option<String> {
        self.resources.iter().find_map(|resource| {
            let kind = resource.resource_type.as_deref()?.trim();
            let id = resource.id.as_deref()?.trim();
            if kind.is_empty() || id.is_empty() {
                return None;
            }
            kind.get(..PACKAGE_BASE_ADDRESS_TYPE.len())
                .is_some_and(|p| p.eq_ignore_ascii_case(PACKAGE_BASE_ADDRESS_TYPE))
                .then(|| ensure_trailing_slash(id))
        })
    }
}

/// Package version list (`<base><id>/index.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct VersionIndex {
    #[serde(default)]
    pub versions: Vec<serde_json::Value>,
}

impl VersionIndex {
    /// Non-blank string entries; nulls and other JSON types are dropped.
    pub fn version_strings(&self) -> impl Iterator<Item = &str> {
        self.versions
            .iter()
            .filter_map(serde_json::Value::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

/// Where a package version was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    pub source: String,
    pub base_address: String,
    pub version: String,
}

/// A required file copied out of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    pub file_name: String,
    pub package_id: String,
    pub version: String,
    pub source: String,
}

/// Source URL -> package base address, for the duration of one run.
pub type BaseAddressCache = HashMap<String, String>;

fn ensure_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

/// `<base><id>/<version>/<id>.<version>.nupkg`, lowercased.
#[must_use]
pub fn package_archive_url(base_address: &str, package_id: &str, version: &str) -> String {
    let id = package_id.to_lowercase();
    let ver = version.to_lowercase();
    format!("{}{id}/{ver}/{id}.{ver}.nupkg", ensure_trailing_slash(base_address))
}

/// `<base><id>/index.json`, lowercased id.
#[must_use]
pub fn version_index_url(base_address: &str, package_id: &str) -> String {
    format!(
        "{}/{}/index.json",
        base_address.trim_end_matches('/'),
        package_id.to_lowercase()
    )
}

/// Extracted package contents, removed when dropped.
#[derive(Debug)]
pub struct ExtractedPackage {
    work_dir: TempDir,
}

impl ExtractedPackage {
    #[must_use]
    pub fn root(&self) -> PathBuf {
        self.work_dir.path().join("extracted")
    }
}

/// Client for one run against a list of NuGet v3 sources.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    include_prerelease: bool,
    progress: ProgressDisplay,
    temp_root: PathBuf,
}

impl RegistryClient {
    #[must_use]
    pub fn new(include_prerelease: bool) -> Self {
        Self {
            include_prerelease,
            progress: ProgressDisplay::default(),
            temp_root: std::env::temp_dir(),
        }
    }

    #[must_use]
    pub const fn progress(mut self, progress: ProgressDisplay) -> Self {
        self.progress = progress;
        self
    }

    /// Sets the directory under which `sync-managed/nuget/...` work dirs are made.
    #[must_use]
    pub fn temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = root.into();
        self
    }

    /// Resolves a source's package base address, consulting `cache` first.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if the service index cannot be fetched and
    /// `RegistryError::MissingBaseAddress` if it has no base address.
    pub async fn package_base_address(
        &self,
        source: &str,
        cache: &mut BaseAddressCache,
    ) -> SyncResult<String> {
        if let Some(cached) = cache.get(source) {
            return Ok(cached.clone());
        }

        let index: ServiceIndex = Downloader::new()
            .url(source)
            .timeout(METADATA_TIMEOUT)
            .download_json()
            .await?;

        let base = index
            .package_base_address()
            .ok_or_else(|| RegistryError::MissingBaseAddress {
                source_url: source.to_string(),
            })?;

        debug!(source, base = %base, "Resolved package base address");
        cache.insert(source.to_string(), base.clone());
        Ok(base)
    }

    /// Latest applicable version of `package_id` under `base_address`.
    ///
    /// Returns `None` if the feed answers 404 or lists no usable version.
    ///
    /// # Errors
    ///
    /// Any network failure other than 404 is returned.
    pub async fn latest_version(
        &self,
        base_address: &str,
        package_id: &str,
    ) -> SyncResult<Option<String>> {
        let url = version_index_url(base_address, package_id);

        let index: VersionIndex = match Downloader::new()
            .url(&url)
            .timeout(METADATA_TIMEOUT)
            .download_json()
            .await
        {
            Ok(index) => index,
            Err(err) if err.is_http_not_found() => {
                debug!(url, "Package not present in source");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        Ok(select_latest(
            index.version_strings(),
            self.include_prerelease,
        )
        .map(str::to_string))
    }

    /// Tries each source in order until one has a version of `package_id`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::SourceExhausted` if no source has the
    /// package, or the first non-404 failure.
    pub async fn resolve_latest(
        &self,
        sources: &[String],
        package_id: &str,
        cache: &mut BaseAddressCache,
    ) -> SyncResult<ResolvedPackage> {
        for source in sources {
            let base_address = self.package_base_address(source, cache).await?;
            if let Some(version) = self.latest_version(&base_address, package_id).await? {
                return Ok(ResolvedPackage {
                    source: source.clone(),
                    base_address,
                    version,
                });
            }
        }

        Err(RegistryError::SourceExhausted {
            package_id: package_id.to_string(),
        }
        .into())
    }

    /// Downloads a package archive into a fresh work directory and extracts it.
    ///
    /// # Errors
    ///
    /// Returns an error if the work directory cannot be created, the
    /// download fails or the archive is malformed.
    pub async fn download_and_extract(
        &self,
        package_id: &str,
        resolved: &ResolvedPackage,
    ) -> SyncResult<ExtractedPackage> {
        let id = package_id.to_lowercase();
        let ver = resolved.version.to_lowercase();

        let parent = self
            .temp_root
            .join("sync-managed")
            .join("nuget")
            .join(&id)
            .join(&ver);
        tokio::fs::create_dir_all(&parent)
            .await
            .map_err(|e| FsError::io(&parent, e))?;
        let work_dir = tempfile::Builder::new()
            .tempdir_in(&parent)
            .map_err(|e| FsError::io(&parent, e))?;

        let archive = work_dir.path().join(format!("{id}.{ver}.nupkg"));
        Downloader::new()
            .url(package_archive_url(
                &resolved.base_address,
                package_id,
                &resolved.version,
            ))
            .file(&archive)
            .timeout(DOWNLOAD_TIMEOUT)
            .progress(self.progress)
            .download()
            .await?;

        let package = ExtractedPackage { work_dir };
        extract_archive(&archive, &package.root()).await?;
        Ok(package)
    }

    /// Fetches every file in `required` into `out_dir`, trying packages in
    /// order and stopping as soon as nothing is pending.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::MissingFiles` listing what was never found,
    /// or the first lookup, download or copy failure.
    pub async fn sync_required_files(
        &self,
        package_ids: &[String],
        sources: &[String],
        required: &[&str],
        out_dir: &Path,
    ) -> SyncResult<Vec<FetchedFile>> {
        let mut pending: Vec<String> = Vec::new();
        for name in required {
            if !pending.iter().any(|p| p.eq_ignore_ascii_case(name)) {
                pending.push((*name).to_string());
            }
        }

        let mut cache = BaseAddressCache::new();
        let mut fetched = Vec::new();

        for package_id in package_ids {
            if pending.is_empty() {
                break;
            }

            let resolved = self.resolve_latest(sources, package_id, &mut cache).await?;
            let package = self.download_and_extract(package_id, &resolved).await?;
            let root = package.root();

            let mut still_pending = Vec::with_capacity(pending.len());
            for file_name in pending {
                if copy_best_match(&root, &file_name, out_dir).await? {
                    fetched.push(FetchedFile {
                        file_name,
                        package_id: package_id.clone(),
                        version: resolved.version.clone(),
                        source: resolved.source.clone(),
                    });
                } else {
                    still_pending.push(file_name);
                }
            }
            pending = still_pending;

            info!(
                package = %package_id,
                version = %resolved.version,
                source = %resolved.source,
                "Processed {}/{} from {}",
                package_id,
                resolved.version,
                resolved.source
            );
        }

        if pending.is_empty() {
            Ok(fetched)
        } else {
            Err(RegistryError::MissingFiles { files: pending }.into())
        }
    }
}

/// Copies the best-ranked `file_name` under `root` into `out_dir`.
///
/// Returns false if the package has no file with that exact name.
async fn copy_best_match(root: &Path, file_name: &str, out_dir: &Path) -> SyncResult<bool> {
    let matches = find_files_named(root, file_name);
    let Some(chosen) = best_candidate(&matches) else {
        return Ok(false);
    };

    let dest = out_dir.join(file_name);
    tokio::fs::copy(chosen, &dest)
        .await
        .map_err(|e| FsError::io(&dest, e))?;

    let relative = chosen.strip_prefix(root).unwrap_or(chosen);
    info!(
        file = file_name,
        from = %relative.display(),
        "Synced {} from {}",
        file_name,
        relative.display()
    );
    Ok(true)
}
