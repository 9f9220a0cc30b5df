//! Unit tests for the apx CLI
//!
//! These tests drive the command pipelines against an in-memory fake of the
//! virtualization CLI and run fast without touching WSL.

mod architecture;
mod backend;
mod config_store;
