//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! Every pipeline failure is expressed as a [`CommandError`] and converted into
//! a [`crate::domain::command::CommandResult`] at the command boundary.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

// ── Path errors ───────────────────────────────────────────────────────────────

/// Errors raised by host/guest path translation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Expected a Windows drive path like C:\\Users\\...\\Project, got '{0}'")]
    InvalidPath(String),
}

// ── Process errors ────────────────────────────────────────────────────────────

/// Errors raised while running an external program.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("operation cancelled")]
    Cancelled,
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid default user '{0}': must match ^[a-z_][a-z0-9_-]{{0,31}}$")]
    InvalidUser(String),

    #[error("Invalid appear_tries {0}: must be at least 1")]
    InvalidTries(u32),

    #[error("Invalid seed distro: must not be empty")]
    EmptySeedDistro,
}

// ── Command errors ────────────────────────────────────────────────────────────

/// Classification of a failed command, independent of its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    InvalidPath,
    AlreadyExists,
    NotFound,
    DirectoryNotEmpty,
    PreconditionFailed,
    ImportFailed,
    ExportFailed,
    UnregisterFailed,
    UserProvisioningFailed,
    ConfigWriteFailed,
    MountWriteFailed,
    ProfileWriteFailed,
    ListFailed,
    Cancelled,
    Unexpected,
}

/// Failure of one lifecycle command step.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    InvalidPath(#[from] PathError),

    #[error("WSL distro '{0}' already exists")]
    AlreadyExists(String),

    #[error("WSL distro '{0}' not found")]
    NotFound(String),

    #[error("Instance dir not empty: {}", .0.display())]
    DirectoryNotEmpty(PathBuf),

    #[error("{0}")]
    PreconditionFailed(String),

    #[error("wsl --import failed{}", detail(.stderr))]
    ImportFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to export base image{}", detail(.stderr))]
    ExportFailed { exit_code: i32, stderr: String },

    #[error("wsl --unregister failed{}", detail(.stderr))]
    UnregisterFailed { exit_code: i32, stderr: String },

    #[error("Failed to create default user{}", detail(.stderr))]
    UserProvisioningFailed { exit_code: i32, stderr: String },

    #[error("Failed to write /etc/wsl.conf{}", detail(.stderr))]
    ConfigWriteFailed { exit_code: i32, stderr: String },

    #[error("Failed to write /etc/fstab mount entry{}", detail(.stderr))]
    MountWriteFailed { exit_code: i32, stderr: String },

    #[error("Failed to write profile script{}", detail(.stderr))]
    ProfileWriteFailed { exit_code: i32, stderr: String },

    #[error("wsl -l -q failed{}", detail(.stderr))]
    ListFailed { exit_code: i32, stderr: String },

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl CommandError {
    /// The classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::InvalidPath(_) => ErrorKind::InvalidPath,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::DirectoryNotEmpty(_) => ErrorKind::DirectoryNotEmpty,
            Self::PreconditionFailed(_) => ErrorKind::PreconditionFailed,
            Self::ImportFailed { .. } => ErrorKind::ImportFailed,
            Self::ExportFailed { .. } => ErrorKind::ExportFailed,
            Self::UnregisterFailed { .. } => ErrorKind::UnregisterFailed,
            Self::UserProvisioningFailed { .. } => ErrorKind::UserProvisioningFailed,
            Self::ConfigWriteFailed { .. } => ErrorKind::ConfigWriteFailed,
            Self::MountWriteFailed { .. } => ErrorKind::MountWriteFailed,
            Self::ProfileWriteFailed { .. } => ErrorKind::ProfileWriteFailed,
            Self::ListFailed { .. } => ErrorKind::ListFailed,
            Self::Exec(ExecError::Cancelled) => ErrorKind::Cancelled,
            Self::Exec(_) | Self::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// Exit code of the subprocess this failure originated in, if any.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ImportFailed { exit_code, .. } => *exit_code,
            Self::ExportFailed { exit_code, .. }
            | Self::UnregisterFailed { exit_code, .. }
            | Self::UserProvisioningFailed { exit_code, .. }
            | Self::ConfigWriteFailed { exit_code, .. }
            | Self::MountWriteFailed { exit_code, .. }
            | Self::ProfileWriteFailed { exit_code, .. }
            | Self::ListFailed { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }
}

fn detail(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(":\n{trimmed}")
    }
}
