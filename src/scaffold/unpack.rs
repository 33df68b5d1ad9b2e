use crate::error::ScaffoldError;
use std::fs::{self, File};
use std::path::Path;

/// Extract every entry of the zip at `archive_path` below `target_dir`.
pub fn extract(archive_path: &Path, target_dir: &Path) -> Result<(), ScaffoldError> {
    let io_err =
        |e: std::io::Error| ScaffoldError::Archive(format!("{}: {}", archive_path.display(), e));

    let file = File::open(archive_path).map_err(io_err)?;
    let mut archive = zip::ZipArchive::new(file)?;
    tracing::debug!(entries = archive.len(), dest = %target_dir.display(), "extracting archive");

    fs::create_dir_all(target_dir).map_err(io_err)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let outpath = match entry.enclosed_name() {
            Some(path) => target_dir.join(path),
            None => {
                tracing::warn!(name = entry.name(), "skipping archive entry outside target");
                continue;
            }
        };

        if entry.is_dir() {
            fs::create_dir_all(&outpath).map_err(io_err)?;
        } else {
            if let Some(p) = outpath.parent()
                && !p.exists()
            {
                fs::create_dir_all(p).map_err(io_err)?;
            }
            let mut outfile = File::create(&outpath).map_err(io_err)?;
            std::io::copy(&mut entry, &mut outfile).map_err(io_err)?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    fs::set_permissions(&outpath, fs::Permissions::from_mode(mode & 0o7777))
                        .map_err(io_err)?;
                }
            }
        }
    }
    Ok(())
}
