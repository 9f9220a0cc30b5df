//! Application layer: port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain`, never on `crate::infra`,
//! `crate::commands`, or `crate::output`.

pub mod backend;
pub mod context;
pub mod dispatcher;
pub mod ports;
pub mod services;

pub use backend::{CapturedOutput, WslBackend};
pub use context::CommandContext;
pub use dispatcher::CommandDispatcher;
pub use ports::{DistroRegistry, ProcessExecutor, TerminalLauncher};
