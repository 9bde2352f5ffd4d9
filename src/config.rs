// src/config.rs

//! Project config rewriting
//!
//! Merges the vendored packages' declared source directories into each
//! project config's `source-directories` list, then writes the config back
//! pretty-printed with key order intact.

use crate::error::{Error, Result};
use crate::manifest::PackageRef;
use crate::resolver;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io;
use tracing::info;

/// Metadata file each vendored package ships at its extraction root
const PACKAGE_METADATA: &str = "elm-package.json";

/// The slice of package metadata we read: the source dirs it declares
#[derive(Debug, Deserialize)]
struct PackageMetadata {
    #[serde(rename = "source-directories")]
    source_directories: Vec<String>,
}

/// Read the source-directories a vendored package declares for itself
fn package_source_dirs(base: &str, pkg: &PackageRef) -> Result<Vec<String>> {
    let path = resolver::package_dir(base, pkg).join(PACKAGE_METADATA);
    let raw = fs::read_to_string(&path)
        .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))?;
    let metadata: PackageMetadata = serde_json::from_str(&raw)?;
    Ok(metadata.source_directories)
}

/// `../` ascents prefixed to every vendored path, one per `/` in the config
/// path as given on the command line
fn ascent_prefix(config_path: &str) -> String {
    "../".repeat(config_path.matches('/').count())
}

/// Merge vendored source directories into every config file
///
/// Returns the repository all configs agree on, or None when no configs were
/// given. Appending is idempotent: already-present paths are left alone.
pub fn update_configs(
    base: &str,
    config_paths: &[String],
    packages: &[PackageRef],
) -> Result<Option<String>> {
    let mut repository: Option<String> = None;

    for config_path in config_paths {
        let raw = fs::read_to_string(config_path)
            .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", config_path, e)))?;
        let mut doc: Value = serde_json::from_str(&raw)?;

        let repo = doc
            .get("repository")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::ConfigField {
                path: config_path.clone(),
                field: "repository".to_string(),
            })?
            .to_string();

        match &repository {
            Some(seen) if *seen != repo => {
                return Err(Error::RepositoryMismatch(seen.clone(), repo));
            }
            _ => repository = Some(repo),
        }

        let ascent = ascent_prefix(config_path);
        let dirs = doc
            .get_mut("source-directories")
            .and_then(|v| v.as_array_mut())
            .ok_or_else(|| Error::ConfigField {
                path: config_path.clone(),
                field: "source-directories".to_string(),
            })?;

        let mut added = 0;
        for pkg in packages {
            let pkg_dir = resolver::package_dir(base, pkg);
            for sub_dir in package_source_dirs(base, pkg)? {
                let relative = format!("{}{}/{}", ascent, pkg_dir.display(), sub_dir);
                let present = dirs
                    .iter()
                    .any(|existing| existing.as_str() == Some(relative.as_str()));
                if !present {
                    dirs.push(Value::String(relative));
                    added += 1;
                }
            }
        }

        write_pretty(config_path, &doc)?;
        info!("Updated {}: {} vendored path(s) added", config_path, added);
    }

    Ok(repository)
}

/// Write a JSON document with 4-space indentation, key order preserved
fn write_pretty(path: &str, doc: &Value) -> Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut serializer)?;
    fs::write(path, buf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascent_matches_config_depth() {
        assert_eq!(ascent_prefix("elm-package.json"), "");
        assert_eq!(ascent_prefix("app/elm-package.json"), "../");
        assert_eq!(ascent_prefix("app/assets/elm-package.json"), "../../");
    }

    #[test]
    fn test_write_pretty_uses_four_space_indent() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let path = temp.path().to_str().unwrap();

        let doc: Value =
            serde_json::from_str(r#"{"repository": "acme/app", "source-directories": ["src"]}"#)
                .unwrap();
        write_pretty(path, &doc).unwrap();

        let written = fs::read_to_string(path).unwrap();
        assert!(written.contains("\n    \"repository\""));
        assert!(written.contains("\n        \"src\""));
    }

    #[test]
    fn test_write_pretty_preserves_key_order() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let path = temp.path().to_str().unwrap();

        let doc: Value = serde_json::from_str(
            r#"{"zeta": 1, "repository": "acme/app", "alpha": 2, "source-directories": []}"#,
        )
        .unwrap();
        write_pretty(path, &doc).unwrap();

        let written = fs::read_to_string(path).unwrap();
        let zeta = written.find("zeta").unwrap();
        let repo = written.find("repository").unwrap();
        let alpha = written.find("alpha").unwrap();
        assert!(zeta < repo && repo < alpha);
    }

    #[test]
    fn test_missing_repository_field() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        fs::write(temp.path(), r#"{"source-directories": []}"#).unwrap();

        let result = update_configs(
            "vendor",
            &[temp.path().to_str().unwrap().to_string()],
            &[],
        );
        assert!(matches!(result, Err(Error::ConfigField { field, .. }) if field == "repository"));
    }

    #[test]
    fn test_missing_source_directories_field() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        fs::write(temp.path(), r#"{"repository": "acme/app"}"#).unwrap();

        let result = update_configs(
            "vendor",
            &[temp.path().to_str().unwrap().to_string()],
            &[],
        );
        assert!(
            matches!(result, Err(Error::ConfigField { field, .. }) if field == "source-directories")
        );
    }

    #[test]
    fn test_disagreeing_repositories_rejected() {
        let first = tempfile::NamedTempFile::new().unwrap();
        fs::write(
            first.path(),
            r#"{"repository": "acme/app", "source-directories": []}"#,
        )
        .unwrap();
        let second = tempfile::NamedTempFile::new().unwrap();
        fs::write(
            second.path(),
            r#"{"repository": "acme/other", "source-directories": []}"#,
        )
        .unwrap();

        let configs = vec![
            first.path().to_str().unwrap().to_string(),
            second.path().to_str().unwrap().to_string(),
        ];
        let result = update_configs("vendor", &configs, &[]);
        assert!(matches!(result, Err(Error::RepositoryMismatch(_, _))));
    }

    #[test]
    fn test_no_configs_yields_no_repository() {
        let repository = update_configs("vendor", &[], &[]).unwrap();
        assert!(repository.is_none());
    }
}
