//! Application services, one pipeline per lifecycle command.

pub mod create;
pub mod delete;
pub mod enter;
pub mod list;
