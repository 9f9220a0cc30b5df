//! Command values, progress events and terminal results.
//!
//! A [`Command`] is an immutable request; its parameters are validated when it
//! executes, not when it is built.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::domain::error::{CommandError, ErrorKind};

/// Parameters for creating an environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateParams {
    /// Environment name as supplied by the user (cleaned on execution).
    pub name: String,
    /// Host directory that receives `<install_dir>/<name>`; defaults to the
    /// instance root when `None`.
    pub install_dir: Option<String>,
    /// Bind-mount `<instance>/wkdir` into the guest.
    pub mount_workdir: bool,
}

impl CreateParams {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            install_dir: None,
            mount_workdir: true,
        }
    }
}

/// Parameters for entering an environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnterParams {
    pub name: String,
    /// Host directory to start the shell in.
    pub start_dir: Option<String>,
}

/// Parameters for deleting an environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteParams {
    pub name: String,
    /// Unregister only; leave the backing storage on disk.
    pub keep_files: bool,
}

/// A lifecycle operation and its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create(CreateParams),
    Enter(EnterParams),
    Delete(DeleteParams),
    List,
}

impl Command {
    /// Short verb used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Enter(_) => "enter",
            Self::Delete(_) => "delete",
            Self::List => "list",
        }
    }
}

/// A timestamped progress message emitted while a command runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandEvent {
    pub at: DateTime<Local>,
    pub message: String,
}

impl CommandEvent {
    #[must_use]
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            at: Local::now(),
            message: message.into(),
        }
    }
}

/// Why a command failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    pub kind: ErrorKind,
    /// Exit status of the subprocess the failure originated in.
    pub exit_code: Option<i32>,
    pub message: String,
}

impl From<CommandError> for CommandFailure {
    fn from(err: CommandError) -> Self {
        Self {
            kind: err.kind(),
            exit_code: err.exit_code(),
            message: err.to_string(),
        }
    }
}

/// Terminal outcome of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Success,
    Failure(CommandFailure),
}

impl CommandResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The failure details, if the command failed.
    #[must_use]
    pub fn failure(&self) -> Option<&CommandFailure> {
        match self {
            Self::Success => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    /// Process exit status a front end should terminate with.
    ///
    /// `0` on success; the captured subprocess code on failure, or `1` when
    /// none was captured.
    #[must_use]
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure(failure) => failure.exit_code.unwrap_or(1),
        }
    }
}

impl From<Result<(), CommandError>> for CommandResult {
    fn from(outcome: Result<(), CommandError>) -> Self {
        match outcome {
            Ok(()) => Self::Success,
            Err(err) => Self::Failure(err.into()),
        }
    }
}

/// Resolve the host directory a new instance lives in.
#[must_use]
pub fn instance_dir_for(install_dir: Option<&str>, default_dir: PathBuf, name: &str) -> PathBuf {
    match install_dir {
        Some(dir) => PathBuf::from(dir).join(name),
        None => default_dir,
    }
}
