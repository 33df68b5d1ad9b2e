use crate::ui;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

/// Best-effort removal of the temp archive and staging directory.
///
/// Never fails: each path left behind is reported once as a user warning.
/// Returns how many paths could not be removed.
pub fn remove_temporaries(archive_path: &Path, staging_dir: &Path) -> usize {
    let results = [
        (archive_path, remove_archive(archive_path)),
        (staging_dir, remove_staging(staging_dir)),
    ];

    let mut left_behind = 0;
    for (path, result) in results {
        if let Err(e) = result {
            tracing::debug!(path = %path.display(), error = %e, "temporary not removed");
            ui::warn(&format!("Could not remove {}: {}", path.display(), e));
            left_behind += 1;
        }
    }
    left_behind
}

/// Delete the temp archive, clearing a read-only flag first. A missing file is fine.
pub fn remove_archive(archive_path: &Path) -> io::Result<()> {
    if let Ok(metadata) = fs::metadata(archive_path) {
        let mut perms = metadata.permissions();
        if perms.readonly() {
            #[allow(clippy::permissions_set_readonly_false)]
            perms.set_readonly(false);
            let _ = fs::set_permissions(archive_path, perms);
        }
    }

    match fs::remove_file(archive_path) {
        Ok(()) => {
            tracing::debug!(path = %archive_path.display(), "removed temp archive");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

pub fn remove_staging(staging_dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(staging_dir) {
        Ok(()) => {
            tracing::debug!(path = %staging_dir.display(), "removed staging directory");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
