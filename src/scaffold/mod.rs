//! The `backpack new` pipeline.
//!
//! A run is a fixed sequence of stages over one immutable [`Context`]:
//!
//! 1. [`guard`] - refuse to touch an existing target directory
//! 2. [`fetch`] - download the template archive to a temp file
//! 3. [`unpack`] - extract it into a per-run staging directory
//! 4. [`relocate`] - move the extracted root to `<base>/<name>`
//! 5. [`manifest`] - rewrite the autoload namespace in `composer.json`
//! 6. [`cleanup`] - drop the temp archive and staging directory (best effort,
//!    also after stages 2 to 5 fail)
//! 7. [`install`] - hand over to composer (failures are warnings)
//!
//! The first failing stage stops the run. A project directory that was already
//! relocated stays where it is.

pub mod cleanup;
pub mod fetch;
pub mod guard;
pub mod install;
pub mod manifest;
pub mod relocate;
pub mod unpack;

use crate::config::InstallerConfig;
use crate::error::ScaffoldError;
use crate::ui;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub use fetch::{Fetcher, HttpFetcher};
pub use install::{InstallOutcome, Invocation, ProcessRunner, RunStatus, SystemRunner};

static PACKAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("valid regex"));

static NAMESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\\[A-Za-z_][A-Za-z0-9_]*)*$").expect("valid regex")
});

static RUN_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Paths and options shared by every stage of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    pub base_dir: PathBuf,
    pub name: String,
    /// Namespace without trailing separator, e.g. `Acme\Blog`
    pub namespace: String,
    pub target_dir: PathBuf,
    pub archive_path: PathBuf,
    pub staging_dir: PathBuf,
}

impl Context {
    pub fn new(base_dir: &Path, name: &str, namespace: &str) -> Result<Self, ScaffoldError> {
        validate_name(name)?;
        let namespace = normalize_namespace(namespace)?;
        let token = unique_token();

        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            name: name.to_string(),
            namespace,
            target_dir: base_dir.join(name),
            archive_path: base_dir.join(format!("backpack_{}.zip", token)),
            staging_dir: base_dir.join(format!(".backpack_{}", token)),
        })
    }
}

/// Knobs the CLI passes through to [`run`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub skip_install: bool,
}

pub fn validate_name(name: &str) -> Result<(), ScaffoldError> {
    if name == "." || name == ".." || !PACKAGE_NAME.is_match(name) {
        return Err(ScaffoldError::InvalidInput(format!(
            "'{}' is not a valid package name (use letters, digits, '.', '_' or '-')",
            name
        )));
    }
    Ok(())
}

/// Strip trailing separators and check the result is a PHP namespace.
pub fn normalize_namespace(raw: &str) -> Result<String, ScaffoldError> {
    let trimmed = raw.trim().trim_end_matches('\\');
    if !NAMESPACE.is_match(trimmed) {
        return Err(ScaffoldError::InvalidInput(format!(
            "'{}' is not a valid namespace (e.g. Acme or Acme\\Blog)",
            raw
        )));
    }
    Ok(trimmed.to_string())
}

/// 32 hex chars that differ between runs, even concurrent ones in one directory.
pub fn unique_token() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let count = RUN_COUNTER.fetch_add(1, Ordering::Relaxed);
    let noise = RandomState::new().hash_one((nanos, count));

    let mut hasher = Sha256::new();
    hasher.update(nanos.to_le_bytes());
    hasher.update(std::process::id().to_le_bytes());
    hasher.update(count.to_le_bytes());
    hasher.update(noise.to_le_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..32].to_string()
}

/// Run every stage for `ctx`. Returns the installer outcome on success.
pub fn run(
    ctx: &Context,
    config: &InstallerConfig,
    fetcher: &dyn Fetcher,
    runner: &dyn ProcessRunner,
    options: RunOptions,
) -> Result<InstallOutcome, ScaffoldError> {
    tracing::debug!(?ctx, "starting scaffold run");

    guard::ensure_absent(&ctx.target_dir)?;

    ui::step("📦", "Preparing package...");
    let prepared = prepare(ctx, config, fetcher);
    // Temporaries go either way; the target directory is left as it is.
    cleanup::remove_temporaries(&ctx.archive_path, &ctx.staging_dir);
    prepared?;

    let outcome = if options.skip_install {
        InstallOutcome::Skipped
    } else {
        ui::step("🔧", "Installing dependencies...");
        install::install(ctx, &config.installer, runner)
    };

    Ok(outcome)
}

/// Stages 2 to 5: download, extract, relocate, edit the manifest.
fn prepare(
    ctx: &Context,
    config: &InstallerConfig,
    fetcher: &dyn Fetcher,
) -> Result<(), ScaffoldError> {
    ui::step("⬇", "Downloading template...");
    fetcher.fetch(&config.template.url, &ctx.archive_path)?;

    ui::step("📦", "Extracting template...");
    unpack::extract(&ctx.archive_path, &ctx.staging_dir)?;
    relocate::relocate(&ctx.staging_dir, &config.template.folder, &ctx.target_dir)?;

    ui::step("📝", &format!("Setting namespace to {}...", ctx.namespace));
    manifest::rewrite(
        &ctx.target_dir.join(&config.manifest.file),
        &ctx.namespace,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_paths_live_in_base_dir() {
        let ctx = Context::new(Path::new("/work"), "demo", "Acme").unwrap();
        assert_eq!(ctx.target_dir, PathBuf::from("/work/demo"));
        assert_eq!(ctx.archive_path.parent(), Some(Path::new("/work")));
        assert_eq!(ctx.staging_dir.parent(), Some(Path::new("/work")));

        let archive_name = ctx.archive_path.file_name().unwrap().to_string_lossy();
        assert!(archive_name.starts_with("backpack_"));
        assert!(archive_name.ends_with(".zip"));
    }

    #[test]
    fn test_unique_token_shape_and_uniqueness() {
        let a = unique_token();
        let b = unique_token();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_contexts_never_share_temp_paths() {
        let a = Context::new(Path::new("."), "demo", "BackPack").unwrap();
        let b = Context::new(Path::new("."), "demo", "BackPack").unwrap();
        assert_ne!(a.archive_path, b.archive_path);
        assert_ne!(a.staging_dir, b.staging_dir);
    }

    #[test]
    fn test_rejects_path_like_names() {
        for bad in ["", ".", "..", "../escape", "a/b", "a\\b", "-flag"] {
            assert!(validate_name(bad).is_err(), "accepted {:?}", bad);
        }
        for good in ["demo", "my-package", "blog_2", "v1.0"] {
            assert!(validate_name(good).is_ok(), "rejected {:?}", good);
        }
    }

    #[test]
    fn test_namespace_normalization() {
        assert_eq!(normalize_namespace("Acme").unwrap(), "Acme");
        assert_eq!(normalize_namespace("Acme\\").unwrap(), "Acme");
        assert_eq!(normalize_namespace("Acme\\Blog\\\\").unwrap(), "Acme\\Blog");
        assert!(normalize_namespace("").is_err());
        assert!(normalize_namespace("1Acme").is_err());
        assert!(normalize_namespace("Acme/Blog").is_err());
        assert!(normalize_namespace("Acme\\\\Blog").is_err());
    }
}
