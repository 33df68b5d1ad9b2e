//! Installer configuration (`backpack.toml`).
//!
//! Every field has a default matching the upstream BackPack template, so the
//! file is optional. Lookup order:
//!
//! 1. `./backpack.toml`
//! 2. `~/.backpack/config.toml`
//!
//! ```toml
//! [template]
//! url = "https://github.com/foxted/BackPack-Installer/archive/master.zip"
//! folder = "BackPack-Installer-master"
//!
//! [manifest]
//! file = "composer.json"
//! namespace = "BackPack"
//!
//! [installer]
//! program = "composer"
//! wrapper = "composer.phar"
//! interpreter = "php"
//! commands = [["install"], ["run-script", "post-create-project-cmd"]]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "backpack.toml";

pub const DEFAULT_TEMPLATE_URL: &str =
    "https://github.com/foxted/BackPack-Installer/archive/master.zip";
/// Top-level folder GitHub puts inside the archive (`<repo>-<branch>`).
pub const DEFAULT_TEMPLATE_FOLDER: &str = "BackPack-Installer-master";
pub const DEFAULT_MANIFEST_FILE: &str = "composer.json";
pub const DEFAULT_NAMESPACE: &str = "BackPack";

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerConfig {
    pub template: TemplateConfig,
    pub manifest: ManifestConfig,
    pub installer: DependencyManagerConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateConfig {
    pub url: String,
    pub folder: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_TEMPLATE_URL.to_string(),
            folder: DEFAULT_TEMPLATE_FOLDER.to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestConfig {
    pub file: String,
    pub namespace: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            file: DEFAULT_MANIFEST_FILE.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DependencyManagerConfig {
    /// Global command used when no wrapper is found
    pub program: String,
    /// Project-local wrapper script, run through `interpreter`
    pub wrapper: String,
    pub interpreter: String,
    /// Argument lists, run in order until one fails
    pub commands: Vec<Vec<String>>,
}

impl Default for DependencyManagerConfig {
    fn default() -> Self {
        Self {
            program: "composer".to_string(),
            wrapper: "composer.phar".to_string(),
            interpreter: "php".to_string(),
            commands: vec![
                vec!["install".to_string()],
                vec![
                    "run-script".to_string(),
                    "post-create-project-cmd".to_string(),
                ],
            ],
        }
    }
}

impl InstallerConfig {
    /// Load configuration for a run started in `base_dir`.
    pub fn load(base_dir: &Path) -> Result<Self> {
        match Self::locate(base_dir) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: InstallerConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded installer configuration");
        Ok(config)
    }

    fn locate(base_dir: &Path) -> Option<PathBuf> {
        let local = base_dir.join(CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }
        let global = dirs::home_dir()?.join(".backpack").join("config.toml");
        global.is_file().then_some(global)
    }
}
