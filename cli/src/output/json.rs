//! JSON output helpers.
//!
//! In `--json` mode every event is one compact JSON object per line, followed
//! by exactly one result object:
//!
//! ```json
//! {"type":"event","at":"2026-01-02T03:04:05+01:00","message":"..."}
//! {"type":"result","command":"create","success":false,"error":{"kind":"not_found","message":"...","exit_code":null}}
//! ```

use anyhow::{Context, Result};

use crate::domain::{CommandEvent, CommandResult};

/// Serialize one progress event.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_event(event: &CommandEvent) -> Result<String> {
    let obj = serde_json::json!({
        "type": "event",
        "at": event.at.to_rfc3339(),
        "message": event.message,
    });
    serde_json::to_string(&obj).context("JSON serialization failed")
}

/// Serialize the outcome of `command`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_result(command: &str, result: &CommandResult) -> Result<String> {
    let obj = match result.failure() {
        None => serde_json::json!({
            "type": "result",
            "command": command,
            "success": true,
        }),
        Some(failure) => serde_json::json!({
            "type": "result",
            "command": command,
            "success": false,
            "error": {
                "kind": failure.kind,
                "message": failure.message,
                "exit_code": failure.exit_code,
            },
        }),
    };
    serde_json::to_string(&obj).context("JSON serialization failed")
}

/// Format an error raised before any command ran (bad config, no data dir).
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "type": "result",
        "success": false,
        "error": {
            "kind": code,
            "message": message,
            "exit_code": null,
        },
    });
    serde_json::to_string(&obj).context("JSON serialization failed")
}
