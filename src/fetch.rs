// src/fetch.rs

//! Archive download and extraction
//!
//! This module provides functionality for:
//! - Filtering out packages whose archive was already fetched
//! - Downloading GitHub source archives over HTTPS
//! - Extracting tar.gz archives into the vendor tree

use crate::error::{Error, Result};
use crate::manifest::PackageRef;
use crate::resolver;
use flate2::read::GzDecoder;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path};
use std::time::Duration;
use tar::Archive;
use tracing::{debug, info};

/// Default timeout for HTTP requests (30 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variables for authenticated GitHub downloads
const AUTH_USER_VAR: &str = "GITHUB_ELM_AUTH_USER";
const AUTH_TOKEN_VAR: &str = "GITHUB_ELM_AUTH_TOKEN";

/// HTTP client wrapper carrying optional GitHub credentials
pub struct ArchiveClient {
    client: Client,
    credentials: Option<(String, String)>,
}

impl ArchiveClient {
    /// Create a new archive client, picking up credentials from the environment
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::Download(format!("Failed to create HTTP client: {}", e)))?;

        let credentials = match (std::env::var(AUTH_USER_VAR), std::env::var(AUTH_TOKEN_VAR)) {
            (Ok(user), Ok(token)) => Some((user, token)),
            _ => None,
        };

        Ok(Self {
            client,
            credentials,
        })
    }

    /// Download a single archive to the given path
    ///
    /// Writes to a temporary file and renames into place so an interrupted
    /// download never leaves a valid-looking archive marker behind.
    pub fn download(&self, url: &str, dest_path: &Path) -> Result<()> {
        debug!("Downloading {} to {}", url, dest_path.display());

        let mut request = self.client.get(url);
        if let Some((user, token)) = &self.credentials {
            request = request.basic_auth(user, Some(token));
        }

        let mut response = request
            .send()
            .map_err(|e| Error::Download(format!("Failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            let mut message = format!("HTTP {} from {}", response.status(), url);
            if response.status() == StatusCode::NOT_FOUND && self.credentials.is_none() {
                message.push_str(&format!(
                    "; if this is a private repository, set {} and {}",
                    AUTH_USER_VAR, AUTH_TOKEN_VAR
                ));
            }
            return Err(Error::Download(message));
        }

        let temp_path = dest_path.with_extension("tmp");
        let mut file = File::create(&temp_path)?;
        io::copy(&mut response, &mut file)
            .map_err(|e| Error::Download(format!("Failed to write downloaded data: {}", e)))?;
        fs::rename(&temp_path, dest_path)?;

        Ok(())
    }
}

/// Reject archive entries that would land outside the extraction root
fn check_entry_path(entry_path: &Path) -> Result<()> {
    if entry_path.is_absolute()
        || entry_path
            .components()
            .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(Error::Archive(format!(
            "Archive entry escapes extraction root: {}",
            entry_path.display()
        )));
    }
    Ok(())
}

/// Extract every entry of a gzipped tarball into `dest`
///
/// GitHub archives carry a single `{name}-{version}` top-level directory,
/// which becomes the package dir under the namespace directory.
pub fn extract_archive(archive_path: &Path, dest: &Path) -> Result<()> {
    debug!(
        "Extracting {} into {}",
        archive_path.display(),
        dest.display()
    );

    let file = File::open(archive_path)?;
    let mut archive = Archive::new(GzDecoder::new(file));

    let entries = archive.entries().map_err(|e| {
        Error::Archive(format!(
            "Failed to read archive {}: {}",
            archive_path.display(),
            e
        ))
    })?;

    for entry in entries {
        let mut entry =
            entry.map_err(|e| Error::Archive(format!("Failed to read archive entry: {}", e)))?;
        let entry_path = entry
            .path()
            .map_err(|e| Error::Archive(format!("Failed to get entry path: {}", e)))?
            .into_owned();

        check_entry_path(&entry_path)?;

        let unpacked = entry.unpack_in(dest).map_err(|e| {
            Error::Archive(format!("Failed to unpack {}: {}", entry_path.display(), e))
        })?;
        if !unpacked {
            return Err(Error::Archive(format!(
                "Refused to unpack {}",
                entry_path.display()
            )));
        }
    }

    Ok(())
}

/// Drop packages whose archive file already exists on disk
///
/// The archive is the fetch marker: a skipped package takes no part in any
/// later stage of the run.
pub fn filter_fetched(base: &str, packages: Vec<PackageRef>) -> Vec<PackageRef> {
    packages
        .into_iter()
        .filter(|pkg| {
            let marker = resolver::archive_path(base, pkg);
            if marker.is_file() {
                info!(
                    "Skipping {}/{} {}: archive already present",
                    pkg.namespace, pkg.name, pkg.version
                );
                false
            } else {
                true
            }
        })
        .collect()
}

/// Download and extract every package, one at a time
pub fn fetch_packages(base: &str, packages: &[PackageRef]) -> Result<()> {
    if packages.is_empty() {
        return Ok(());
    }

    let client = ArchiveClient::new()?;

    for pkg in packages {
        let namespace_dir = resolver::vendor_dir(base, &pkg.namespace);
        // create_dir_all tolerates existing directories; permission and I/O
        // failures still propagate
        fs::create_dir_all(&namespace_dir)?;

        println!("Downloading {}/{} {}", pkg.namespace, pkg.name, pkg.version);

        let archive = resolver::archive_path(base, pkg);
        client.download(&resolver::download_url(pkg), &archive)?;
        extract_archive(&archive, &namespace_dir)?;
    }

    Ok(())
}
