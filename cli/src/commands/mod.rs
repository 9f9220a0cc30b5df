//! Command implementations

pub mod create;
pub mod delete;
pub mod enter;
pub mod list;
