// src/manifest.rs

//! Native package manifest parsing
//!
//! The manifest (elm-native-package.json) is a single JSON object mapping
//! "namespace/name" keys to version strings.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use tracing::debug;

/// A vendored package identity: namespace, name, version
///
/// Immutable once parsed; the triple alone determines the package's vendor
/// directory and archive URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRef {
    pub namespace: String,
    pub name: String,
    pub version: String,
}

impl PackageRef {
    /// Split a "namespace/name" manifest key; the version is the entry's value
    pub fn parse(key: &str, version: &str) -> Result<Self> {
        let mut parts = key.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(namespace), Some(name), None) if !namespace.is_empty() && !name.is_empty() => {
                Ok(Self {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                    version: version.to_string(),
                })
            }
            _ => Err(Error::ManifestKey(key.to_string())),
        }
    }
}

/// Read a manifest file and expand every entry into a PackageRef
///
/// The manifest order is irrelevant; entries come back sorted by key so runs
/// are deterministic.
pub fn load(path: &str) -> Result<Vec<PackageRef>> {
    debug!("Reading package manifest: {}", path);

    let raw = fs::read_to_string(path)
        .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", path, e)))?;
    let entries: BTreeMap<String, String> = serde_json::from_str(&raw)?;

    let mut packages = Vec::with_capacity(entries.len());
    for (key, version) in &entries {
        packages.push(PackageRef::parse(key, version)?);
    }

    debug!("Manifest lists {} package(s)", packages.len());
    Ok(packages)
}
