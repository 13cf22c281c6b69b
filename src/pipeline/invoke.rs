//! Capture invocation: run the external tool for one URL.
//!
//! The tool runs in its own directory so it can resolve relative resources
//! such as its `screenshots/` folder. A relative tool path is made absolute
//! against the caller's working directory first; otherwise it would be
//! resolved a second time from inside the tool's directory. This layer imposes no timeout; the
//! child is spawned with kill-on-drop so a caller that wraps the future in
//! `tokio::time::timeout` does not leak the process.

use crate::config::CaptureTool;
use crate::error::CaptureError;
use crate::output::{CaptureOutcome, CaptureRequest};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

/// Exit code reported when the process ended without one (killed by a signal).
pub const SIGNAL_EXIT_CODE: i32 = -1;

/// Launch `tool` for `request.url` and wait for it to exit.
///
/// # Errors
/// - [`CaptureError::ToolNotFound`] if the executable does not exist
/// - [`CaptureError::Spawn`] if the OS refuses to start it
///
/// A nonzero exit is *not* an error here; it is reported in the outcome.
#[instrument(level = "debug", skip(request, tool), fields(url = %request.url, tool = %tool.path.display()))]
pub async fn run_capture(
    request: &CaptureRequest,
    tool: &CaptureTool,
) -> Result<CaptureOutcome, CaptureError> {
    let program = std::path::absolute(&tool.path).map_err(|e| CaptureError::Spawn {
        path: tool.path.clone(),
        source: e,
    })?;
    if !program.is_file() {
        return Err(CaptureError::ToolNotFound {
            probed: vec![program],
        });
    }

    let args = tool.mode.args(&request.url);
    debug!(?args, mode = ?tool.mode, program = %program.display(), "Executing capture tool");

    let mut cmd = Command::new(&program);
    cmd.args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = program.parent() {
        cmd.current_dir(dir);
    }

    let output = cmd.output().await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CaptureError::ToolNotFound {
                probed: vec![program.clone()],
            }
        } else {
            CaptureError::Spawn {
                path: program.clone(),
                source: e,
            }
        }
    })?;

    let exit_code = output.status.code().unwrap_or(SIGNAL_EXIT_CODE);
    if exit_code != 0 {
        warn!(exit_code, stderr_bytes = output.stderr.len(), "Capture tool exited with failure");
    } else {
        debug!(
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "Capture tool finished"
        );
    }

    Ok(CaptureOutcome {
        exit_code,
        stdout: output.stdout,
        stderr: output.stderr,
    })
}
