//! Infrastructure implementation of the `TerminalLauncher` port.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

use crate::application::ports::TerminalLauncher;

/// Windows Terminal executable, looked up on the search path.
const WINDOWS_TERMINAL: &str = "wt.exe";

/// Opens a new console window on the host.
///
/// Prefers Windows Terminal; falls back to `cmd.exe /c start`, which opens a
/// classic console window.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostTerminal;

/// How a program is launched into a new window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl LaunchPlan {
    /// Build the launch for `program args...`, given the resolved Windows
    /// Terminal path (if any).
    ///
    /// Windows Terminal splits its command line on `;`, so literal semicolons
    /// are passed as `\;`.
    #[must_use]
    pub fn new(wt: Option<PathBuf>, program: &str, args: &[String]) -> Self {
        match wt {
            Some(wt) => Self {
                program: wt,
                args: std::iter::once("--".to_string())
                    .chain(std::iter::once(escape_wt_arg(program)))
                    .chain(args.iter().map(|arg| escape_wt_arg(arg)))
                    .collect(),
            },
            None => Self {
                program: PathBuf::from("cmd.exe"),
                // The empty string is the window title `start` expects first.
                args: ["/c", "start", ""]
                    .into_iter()
                    .map(String::from)
                    .chain(std::iter::once(program.to_string()))
                    .chain(args.iter().cloned())
                    .collect(),
            },
        }
    }
}

fn escape_wt_arg(arg: &str) -> String {
    arg.replace(';', "\\;")
}

impl TerminalLauncher for HostTerminal {
    fn launch(&self, program: &str, args: &[String]) -> Result<()> {
        let plan = LaunchPlan::new(which::which(WINDOWS_TERMINAL).ok(), program, args);
        tracing::debug!(host = %plan.program.display(), args = ?plan.args, "opening terminal");
        Command::new(&plan.program)
            .args(&plan.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to open a terminal via {}", plan.program.display()))?;
        Ok(())
    }
}
