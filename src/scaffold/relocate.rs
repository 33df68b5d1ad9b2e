use crate::error::ScaffoldError;
use std::fs;
use std::path::{Path, PathBuf};

/// Move the archive's root folder out of `staging_dir` to `target`.
///
/// `expected_folder` is tried first. Archives whose root is named
/// differently still work as long as it is the only directory present.
pub fn relocate(
    staging_dir: &Path,
    expected_folder: &str,
    target: &Path,
) -> Result<(), ScaffoldError> {
    let source = find_root(staging_dir, expected_folder)?;
    tracing::debug!(from = %source.display(), to = %target.display(), "relocating template");

    fs::rename(&source, target).map_err(|e| {
        ScaffoldError::Filesystem(format!(
            "could not move {} to {}: {}",
            source.display(),
            target.display(),
            e
        ))
    })
}

fn find_root(staging_dir: &Path, expected_folder: &str) -> Result<PathBuf, ScaffoldError> {
    let expected = staging_dir.join(expected_folder);
    if expected.is_dir() {
        return Ok(expected);
    }

    let entries = fs::read_dir(staging_dir).map_err(|e| {
        ScaffoldError::Filesystem(format!("{}: {}", staging_dir.display(), e))
    })?;
    let dirs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();

    match dirs.as_slice() {
        [only] => {
            tracing::warn!(
                expected = expected_folder,
                found = %only.display(),
                "archive root differs from configured folder"
            );
            Ok(only.clone())
        }
        _ => Err(ScaffoldError::Filesystem(format!(
            "expected folder '{}' not found in extracted archive",
            expected_folder
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_expected_folder() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("staging");
        fs::create_dir_all(staging.join("BackPack-Installer-master/src")).unwrap();

        let target = dir.path().join("demo");
        relocate(&staging, "BackPack-Installer-master", &target).unwrap();

        assert!(target.join("src").is_dir());
        assert!(!staging.join("BackPack-Installer-master").exists());
    }

    #[test]
    fn test_single_unexpected_root_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("staging");
        fs::create_dir_all(staging.join("skeleton-main")).unwrap();
        fs::write(staging.join("pax_global_header"), "").unwrap();

        let target = dir.path().join("demo");
        relocate(&staging, "BackPack-Installer-master", &target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_ambiguous_roots_fail() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("staging");
        fs::create_dir_all(staging.join("one")).unwrap();
        fs::create_dir_all(staging.join("two")).unwrap();

        let target = dir.path().join("demo");
        let err = relocate(&staging, "BackPack-Installer-master", &target).unwrap_err();
        assert!(matches!(err, ScaffoldError::Filesystem(_)));
        assert!(!target.exists());
    }
}
