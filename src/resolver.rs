// src/resolver.rs

//! Deterministic package-to-path and package-to-URL derivations
//!
//! Everything here is a pure function of the package triple (or the config's
//! repository string); directory creation is left to the fetch stage so
//! filesystem failures surface where the write happens.

use crate::error::{Error, Result};
use crate::manifest::PackageRef;
use std::path::{Path, PathBuf};

/// Namespace directory under the vendor root: `{base}/{namespace}`
pub fn vendor_dir(base: &str, namespace: &str) -> PathBuf {
    Path::new(base).join(namespace)
}

/// Extraction directory for a package: `{base}/{namespace}/{name}-{version}`
pub fn package_dir(base: &str, pkg: &PackageRef) -> PathBuf {
    vendor_dir(base, &pkg.namespace).join(format!("{}-{}", pkg.name, pkg.version))
}

/// Downloaded archive path, the package dir plus a literal `-tar.gz`
///
/// The archive sits next to the extraction directory, not inside it, and its
/// presence is the "already fetched" marker.
pub fn archive_path(base: &str, pkg: &PackageRef) -> PathBuf {
    vendor_dir(base, &pkg.namespace).join(format!("{}-{}-tar.gz", pkg.name, pkg.version))
}

/// GitHub source archive URL for a package
pub fn download_url(pkg: &PackageRef) -> String {
    format!(
        "https://github.com/{}/{}/archive/{}.tar.gz",
        pkg.namespace, pkg.name, pkg.version
    )
}

/// Identifier prefix embedded in native code: `_{namespace}${name}`, with
/// every dash underscored
pub fn native_prefix(namespace: &str, name: &str) -> String {
    format!(
        "_{}${}",
        namespace.replace('-', "_"),
        name.replace('-', "_")
    )
}

/// Owner and repo name from a config's repository field
///
/// Accepts `https://github.com/owner/repo.git` as well as bare `owner/repo`.
pub fn repo_identity(repository: &str) -> Result<(String, String)> {
    let trimmed = repository
        .strip_prefix("https://github.com/")
        .unwrap_or(repository);
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    let mut parts = trimmed.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(Error::RepositoryFormat(repository.to_string())),
    }
}
