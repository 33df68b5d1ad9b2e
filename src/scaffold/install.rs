//! Dependency installation through composer.
//!
//! A `composer.phar` next to the new project (or in the directory the user
//! ran from) wins over a global `composer` on `PATH`.

use super::Context;
use crate::config::DependencyManagerConfig;
use crate::ui;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// One subprocess to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    pub success: bool,
    /// `None` when the process was killed by a signal
    pub code: Option<i32>,
}

/// Launches subprocesses and relays their output.
pub trait ProcessRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<RunStatus>;
}

/// Runs the real process, echoing stdout line by line as it arrives.
///
/// With `--quiet` the output is still drained but not shown.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<RunStatus> {
        if ui::is_quiet() {
            run_relaying(invocation, &mut io::sink())
        } else {
            run_relaying(invocation, &mut io::stdout())
        }
    }
}

/// Spawn `invocation` and copy its stdout to `out` one line at a time.
///
/// The child is always reaped. If `out` fails, the child is killed first and
/// the write error is returned.
pub fn run_relaying<W: Write>(invocation: &Invocation, out: &mut W) -> io::Result<RunStatus> {
    tracing::debug!(command = %invocation.display(), cwd = %invocation.cwd.display(), "spawning");

    let mut child = Command::new(&invocation.program)
        .args(&invocation.args)
        .current_dir(&invocation.cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()?;

    if let Some(stdout) = child.stdout.take()
        && let Err(e) = relay_lines(stdout, out)
    {
        let _ = child.kill();
        let _ = child.wait();
        return Err(e);
    }

    let status = child.wait()?;
    Ok(RunStatus {
        success: status.success(),
        code: status.code(),
    })
}

fn relay_lines<R: Read, W: Write>(source: R, out: &mut W) -> io::Result<()> {
    let mut reader = BufReader::new(source);
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(());
        }
        out.write_all(&line)?;
        out.flush()?;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Completed,
    /// `--no-install` was given
    Skipped,
    /// The package manager ran but exited unsuccessfully
    Failed { command: String, code: Option<i32> },
    /// The package manager could not be started at all
    Unavailable { command: String, reason: String },
}

/// Program plus leading arguments used to reach the package manager.
pub fn locate(
    project_dir: &Path,
    base_dir: &Path,
    config: &DependencyManagerConfig,
) -> (String, Vec<String>) {
    if project_dir.join(&config.wrapper).is_file() {
        return (config.interpreter.clone(), vec![config.wrapper.clone()]);
    }

    let shared = base_dir.join(&config.wrapper);
    if shared.is_file() {
        let path = shared.canonicalize().unwrap_or(shared);
        return (
            config.interpreter.clone(),
            vec![path.to_string_lossy().into_owned()],
        );
    }

    (config.program.clone(), Vec::new())
}

pub fn plan(ctx: &Context, config: &DependencyManagerConfig) -> Vec<Invocation> {
    let (program, leading) = locate(&ctx.target_dir, &ctx.base_dir, config);
    config
        .commands
        .iter()
        .map(|command| {
            let mut args = leading.clone();
            args.extend(command.iter().cloned());
            Invocation {
                program: program.clone(),
                args,
                cwd: ctx.target_dir.clone(),
            }
        })
        .collect()
}

/// Run every configured command in order, stopping at the first failure.
///
/// Problems are reported to the user but never abort the scaffold: the
/// package is usable, just not installed.
pub fn install(
    ctx: &Context,
    config: &DependencyManagerConfig,
    runner: &dyn ProcessRunner,
) -> InstallOutcome {
    for invocation in plan(ctx, config) {
        let command = invocation.display();
        ui::detail(&format!("$ {}", command));

        match runner.run(&invocation) {
            Ok(status) if status.success => continue,
            Ok(status) => {
                let code = status
                    .code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string());
                ui::warn(&format!("'{}' failed (exit {})", command, code));
                return InstallOutcome::Failed {
                    command,
                    code: status.code,
                };
            }
            Err(e) => {
                ui::warn(&format!("Could not run '{}': {}", command, e));
                return InstallOutcome::Unavailable {
                    command,
                    reason: e.to_string(),
                };
            }
        }
    }
    InstallOutcome::Completed
}
