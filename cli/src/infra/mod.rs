//! Infrastructure layer: concrete implementations of application port traits.
//!
//! All I/O-performing code lives here: process execution, the distro
//! metadata store, terminal windows and the config file.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod config;
pub mod process;
pub mod registry;
pub mod terminal;
