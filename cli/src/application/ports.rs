//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::domain::{DistroInfo, ExecError};

// ── Process Executor Port ─────────────────────────────────────────────────────

/// Runs an external program and streams its output line by line.
#[allow(async_fn_in_trait)]
pub trait ProcessExecutor {
    /// Launch `program` with `args` (no shell interpretation) and invoke
    /// `on_stdout` / `on_stderr` once per complete line as it is produced.
    ///
    /// Returns the program's exit code (`-1` when it was terminated by a signal).
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Spawn`] if the program cannot be started,
    /// [`ExecError::Wait`] if its status cannot be collected, and
    /// [`ExecError::Cancelled`] once `cancel` fires. On cancellation, lines
    /// already read are delivered before returning; the child process is left
    /// running and simply no longer awaited.
    async fn execute(
        &self,
        program: &str,
        args: &[&str],
        on_stdout: &mut dyn FnMut(&str),
        on_stderr: &mut dyn FnMut(&str),
        cancel: &CancellationToken,
    ) -> Result<i32, ExecError>;
}

// ── Metadata Port ─────────────────────────────────────────────────────────────

/// Read-only view of the host's per-environment metadata store.
#[allow(async_fn_in_trait)]
pub trait DistroRegistry {
    /// Look up an environment by name (case-insensitive).
    ///
    /// Returns `None` when the environment is unknown or has no storage path.
    async fn lookup(&self, name: &str, cancel: &CancellationToken) -> Result<Option<DistroInfo>>;
}

// ── Terminal Port ─────────────────────────────────────────────────────────────

/// Opens a new interactive terminal window running a program.
pub trait TerminalLauncher {
    /// Start `program args...` in a new terminal without waiting for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal host cannot be started.
    fn launch(&self, program: &str, args: &[String]) -> Result<()>;
}
