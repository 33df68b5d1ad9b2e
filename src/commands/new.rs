//! New command handler
//!
//! Handles `backpack new <name> [--namespace <ns>] [--no-install]`.

use anyhow::{Context as _, Result};
use colored::*;
use inquire::Text;

use crate::config::InstallerConfig;
use crate::error::ScaffoldError;
use crate::scaffold::{self, Context, HttpFetcher, InstallOutcome, RunOptions, SystemRunner};
use crate::ui;

/// Options collected from the command line
#[derive(Clone, Debug, Default)]
pub struct NewArgs {
    /// Package name; prompted for when omitted on a terminal
    pub name: Option<String>,
    /// Overrides the configured default namespace
    pub namespace: Option<String>,
    pub no_install: bool,
    pub quiet: bool,
}

/// Handle the `backpack new` command in the current directory
pub fn handle_new(args: &NewArgs) -> Result<()> {
    let base_dir = std::env::current_dir().context("Failed to read current directory")?;
    let config = InstallerConfig::load(&base_dir)?;

    let name = match &args.name {
        Some(name) => name.clone(),
        None => prompt_name()?,
    };
    let namespace = args
        .namespace
        .clone()
        .unwrap_or_else(|| config.manifest.namespace.clone());

    let ctx = Context::new(&base_dir, &name, &namespace)?;
    let fetcher = HttpFetcher::new(!args.quiet && console::Term::stdout().is_term());
    let options = RunOptions {
        skip_install: args.no_install,
    };

    let outcome = scaffold::run(&ctx, &config, &fetcher, &SystemRunner, options)?;
    report(&ctx, &outcome);
    Ok(())
}

fn prompt_name() -> Result<String> {
    if !console::Term::stdout().is_term() {
        return Err(ScaffoldError::InvalidInput("a package name is required".to_string()).into());
    }
    let name = Text::new("What is your package name?")
        .prompt()
        .context("Failed to read package name")?;
    Ok(name.trim().to_string())
}

fn report(ctx: &Context, outcome: &InstallOutcome) {
    match outcome {
        InstallOutcome::Completed => {}
        InstallOutcome::Skipped => {
            ui::detail("Dependency installation skipped (--no-install).");
        }
        InstallOutcome::Failed { .. } | InstallOutcome::Unavailable { .. } => {
            ui::warn("Dependencies were not installed; run composer install inside the package.");
        }
    }

    ui::success(&format!(
        "Package ready! {} (namespace: {})",
        ctx.name.bold(),
        ctx.namespace.cyan()
    ));
    if !ui::is_quiet() {
        println!("  cd {}", ctx.name);
    }
}
