//! Terminal status lines.
//!
//! Every pipeline stage announces itself with a tagged, colored line so the
//! user can follow the run. Diagnostics beyond that go through `tracing`.
//!
//! With `--quiet` only warnings and errors reach the terminal.

use colored::*;
use std::sync::atomic::{AtomicBool, Ordering};

static QUIET: AtomicBool = AtomicBool::new(false);

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Announce a stage that is about to start.
pub fn step(icon: &str, message: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", icon.blue(), message);
}

pub fn success(message: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", "✓".green(), message);
}

pub fn warn(message: &str) {
    eprintln!("{} {}", "!".yellow(), message.yellow());
}

pub fn error(message: &str) {
    eprintln!("{} {}", "x".red(), message.red());
}

/// Indented follow-up line under the previous status.
pub fn detail(message: &str) {
    if is_quiet() {
        return;
    }
    println!("   {}", message.dimmed());
}

pub fn print_splash() {
    if is_quiet() {
        return;
    }
    println!();
    println!("   {}", "BackPack Installer".bold().cyan());
    println!("   {}", format!("v{}", env!("CARGO_PKG_VERSION")).green());
    println!();
    println!(
        "   {} {}",
        "Create a package:".bold(),
        "backpack new <name> [--namespace <ns>]".cyan()
    );
    println!("   Run {} for detailed usage.", "backpack --help".white().bold());
    println!();
}
