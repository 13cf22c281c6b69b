//! Error types for the capture-normalize library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`CaptureError`]: **Surfaced**: the invocation cannot produce content
//!   (tool missing, process crashed, empty output, tool reported failure).
//!   At the public API it becomes [`crate::output::NormalizedResult::Failure`]
//!   whose `error` text is exactly this error's `Display`.
//!
//! * [`PayloadError`]: **Recovered**: stdout was not a usable JSON object.
//!   The assembler degrades to treating stdout as raw markup, so this error
//!   is logged and never reaches the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that end an invocation with a failure result.
#[derive(Debug, Error)]
pub enum CaptureError {
    // ── Environment errors ────────────────────────────────────────────────
    /// The capture executable could not be found.
    #[error("capture tool not found: {}", display_probed(probed))]
    ToolNotFound { probed: Vec<PathBuf> },

    /// The executable exists but the OS refused to start it.
    #[error("failed to start capture tool '{}': {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Process errors ────────────────────────────────────────────────────
    /// The tool exited with a nonzero status; `stderr` is already trimmed.
    #[error("{}", process_failure_message(*exit_code, stderr))]
    ProcessFailed { exit_code: i32, stderr: String },

    /// The tool exited cleanly but printed nothing (or only whitespace).
    #[error("no output received")]
    EmptyOutput,

    /// The tool's own JSON said `success: false`; its message is passed through.
    #[error("{0}")]
    PayloadReportsFailure(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Non-fatal: stdout could not be read as a JSON object payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// Neither the strict nor the salvage parse yielded a JSON object.
    #[error("malformed capture payload: {reason}")]
    Malformed { reason: String },
}

fn display_probed(probed: &[PathBuf]) -> String {
    if probed.is_empty() {
        return "no executable configured".to_string();
    }
    let list: Vec<String> = probed.iter().map(|p| p.display().to_string()).collect();
    format!("probed {}", list.join(", "))
}

fn process_failure_message(exit_code: i32, stderr: &str) -> String {
    if stderr.is_empty() {
        format!("capture tool exited with status {exit_code}")
    } else {
        stderr.to_string()
    }
}

impl From<capture_locate::LocateError> for CaptureError {
    fn from(e: capture_locate::LocateError) -> Self {
        CaptureError::ToolNotFound {
            probed: e.probed().to_vec(),
        }
    }
}
