//! # backpack CLI Entry Point
//!
//! Parses arguments with clap, sets up logging and routes to the command
//! handlers. Exit codes come from [`ScaffoldError::exit_code`].

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use backpack_installer::commands;
use backpack_installer::error::ScaffoldError;
use backpack_installer::ui;

#[derive(Parser)]
#[command(name = "backpack")]
#[command(about = "Create a new BackPack package template", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// More diagnostic output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new BackPack package template
    New {
        /// Name of the package (prompted for if omitted)
        name: Option<String>,
        /// Root namespace for the package autoloader [default: BackPack]
        #[arg(long)]
        namespace: Option<String>,
        /// Skip running composer in the new package
        #[arg(long)]
        no_install: bool,
    },
    /// Generate shell completion scripts
    Completion { shell: Shell },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    ui::set_quiet(cli.quiet);

    let result = match &cli.command {
        Some(Commands::New {
            name,
            namespace,
            no_install,
        }) => commands::new::handle_new(&commands::new::NewArgs {
            name: name.clone(),
            namespace: namespace.clone(),
            no_install: *no_install,
            quiet: cli.quiet,
        }),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, bin_name, &mut std::io::stdout());
            Ok(())
        }
        None => {
            ui::print_splash();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = match err.downcast_ref::<ScaffoldError>() {
                Some(scaffold_err) => {
                    ui::error(&scaffold_err.to_string());
                    scaffold_err.exit_code()
                }
                None => {
                    ui::error(&format!("{:#}", err));
                    1
                }
            };
            ExitCode::from(code as u8)
        }
    }
}

/// Initialize tracing on stderr; status lines stay on stdout.
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
