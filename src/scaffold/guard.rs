use crate::error::ScaffoldError;
use std::path::Path;

/// Fail if anything (directory, file or dangling symlink) sits at `target`.
pub fn ensure_absent(target: &Path) -> Result<(), ScaffoldError> {
    if target.symlink_metadata().is_ok() {
        tracing::debug!(target = %target.display(), "target already present");
        return Err(ScaffoldError::TargetExists(target.to_path_buf()));
    }
    Ok(())
}
