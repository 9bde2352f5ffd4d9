// src/munge.rs

//! Identifier rewriting across vendored sources
//!
//! Vendored native code embeds a `_{namespace}${name}` prefix in its symbol
//! names. After vendoring, every occurrence is rewritten to the consuming
//! project's own prefix so the code behaves as if it were first-party.

use crate::error::Result;
use crate::manifest::PackageRef;
use crate::resolver;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Rewrite one package tree in place, returning how many files changed
///
/// Files that are not valid UTF-8 are left untouched; this is a literal text
/// substitution and must never corrupt binaries shipped inside a package.
fn rewrite_tree(root: &Path, from: &str, to: &str) -> Result<usize> {
    let mut changed = 0;

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let bytes = fs::read(entry.path())?;
        let Ok(text) = std::str::from_utf8(&bytes) else {
            debug!("Skipping non-text file {}", entry.path().display());
            continue;
        };

        if text.contains(from) {
            fs::write(entry.path(), text.replace(from, to))?;
            changed += 1;
        }
    }

    Ok(changed)
}

/// Rebrand every fetched package to the project's identifier prefix
pub fn munge_packages(base: &str, repository: &str, packages: &[PackageRef]) -> Result<()> {
    let (owner, name) = resolver::repo_identity(repository)?;
    let project_prefix = resolver::native_prefix(&owner, &name);

    for pkg in packages {
        let package_prefix = resolver::native_prefix(&pkg.namespace, &pkg.name);
        let root = resolver::package_dir(base, pkg);
        let changed = rewrite_tree(&root, &package_prefix, &project_prefix)?;
        debug!(
            "Replaced {} with {} in {} file(s) under {}",
            package_prefix,
            project_prefix,
            changed,
            root.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_replaces_every_occurrence() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("src/Native");
        fs::create_dir_all(&nested).unwrap();

        let target = nested.join("Navigation.js");
        fs::write(
            &target,
            "var _elm_lang$navigation$go = _elm_lang$navigation$back;\n",
        )
        .unwrap();

        let changed =
            rewrite_tree(temp.path(), "_elm_lang$navigation", "_acme$app").unwrap();
        assert_eq!(changed, 1);

        let rewritten = fs::read_to_string(&target).unwrap();
        assert_eq!(rewritten, "var _acme$app$go = _acme$app$back;\n");
    }

    #[test]
    fn test_rewrite_leaves_unrelated_files_alone() {
        let temp = tempfile::tempdir().unwrap();
        let target = temp.path().join("README.md");
        fs::write(&target, "nothing to see here\n").unwrap();

        let changed = rewrite_tree(temp.path(), "_elm_lang$navigation", "_acme$app").unwrap();
        assert_eq!(changed, 0);
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "nothing to see here\n"
        );
    }

    #[test]
    fn test_rewrite_skips_binary_files() {
        let temp = tempfile::tempdir().unwrap();
        let binary = temp.path().join("asset.png");
        let bytes = [0x89u8, 0x50, 0x4E, 0x47, 0xFF, 0xFE, 0x00, 0x1A];
        fs::write(&binary, bytes).unwrap();

        let changed = rewrite_tree(temp.path(), "_elm_lang$navigation", "_acme$app").unwrap();
        assert_eq!(changed, 0);
        assert_eq!(fs::read(&binary).unwrap(), bytes);
    }

    #[test]
    fn test_munge_fails_on_bad_repository() {
        let pkg = PackageRef::parse("elm-lang/navigation", "2.0.0").unwrap();
        assert!(munge_packages("vendor", "not a repo url", &[pkg]).is_err());
    }
}
