//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod command;
pub mod config;
pub mod environment;
pub mod error;
pub mod layout;
pub mod paths;
pub mod provision;

pub use command::{
    Command, CommandEvent, CommandFailure, CommandResult, CreateParams, DeleteParams, EnterParams,
};
pub use config::{ApxConfig, ProvisionSettings};
pub use environment::DistroInfo;
pub use error::{CommandError, ConfigError, ErrorKind, ExecError, PathError};
pub use layout::InstanceLayout;
