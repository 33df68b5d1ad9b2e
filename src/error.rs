use std::path::PathBuf;

/// Failures that stop the scaffolding pipeline.
///
/// Cleanup and installer problems are not represented here; they are
/// reported as warnings and never abort a run.
#[derive(Debug)]
pub enum ScaffoldError {
    /// Package name or namespace rejected before anything ran
    InvalidInput(String),
    /// Target directory is already present
    TargetExists(PathBuf),
    /// Download of the template archive failed
    Transport(String),
    /// Archive could not be opened or extracted
    Archive(String),
    /// Relocation or other filesystem error
    Filesystem(String),
    /// Manifest missing, unparsable or unwritable
    Manifest(String),
}

impl ScaffoldError {
    /// Process exit code reported by the `backpack` binary.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScaffoldError::TargetExists(_) => 1,
            ScaffoldError::InvalidInput(_) => 2,
            ScaffoldError::Transport(_) => 3,
            ScaffoldError::Archive(_) => 4,
            ScaffoldError::Filesystem(_) => 5,
            ScaffoldError::Manifest(_) => 6,
        }
    }
}

impl std::fmt::Display for ScaffoldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaffoldError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ScaffoldError::TargetExists(_) => write!(f, "Package already exists!"),
            ScaffoldError::Transport(msg) => write!(f, "Download failed: {}", msg),
            ScaffoldError::Archive(msg) => write!(f, "Archive error: {}", msg),
            ScaffoldError::Filesystem(msg) => write!(f, "Filesystem error: {}", msg),
            ScaffoldError::Manifest(msg) => write!(f, "Manifest error: {}", msg),
        }
    }
}

impl std::error::Error for ScaffoldError {}

impl From<zip::result::ZipError> for ScaffoldError {
    fn from(e: zip::result::ZipError) -> Self {
        ScaffoldError::Archive(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_and_non_zero() {
        let errors = [
            ScaffoldError::TargetExists(PathBuf::from("demo")),
            ScaffoldError::InvalidInput("x".into()),
            ScaffoldError::Transport("x".into()),
            ScaffoldError::Archive("x".into()),
            ScaffoldError::Filesystem("x".into()),
            ScaffoldError::Manifest("x".into()),
        ];
        let mut codes: Vec<i32> = errors.iter().map(|e| e.exit_code()).collect();
        assert!(codes.iter().all(|c| *c != 0));
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_target_exists_is_exit_code_one() {
        let err = ScaffoldError::TargetExists(PathBuf::from("demo"));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "Package already exists!");
    }
}
