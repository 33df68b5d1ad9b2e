//! # backpack-installer
//!
//! Scaffolds a new BackPack PHP package from the upstream template.
//!
//! ## Quick Start
//!
//! ```bash
//! # Create ./blog with the default BackPack namespace
//! backpack new blog
//!
//! # Pick your own namespace
//! backpack new blog --namespace Acme
//! ```
//!
//! ## Module Organization
//!
//! - [`scaffold`] - The download, extract, relocate, edit, install pipeline
//! - [`config`] - Optional `backpack.toml` overrides
//! - [`commands`] - CLI command handlers

/// CLI command handlers extracted from main.
pub mod commands;

/// Configuration file parsing (`backpack.toml`).
pub mod config;

/// Pipeline error taxonomy and exit codes.
pub mod error;

/// Package scaffolding stages.
pub mod scaffold;

/// Terminal status output.
pub mod ui;
