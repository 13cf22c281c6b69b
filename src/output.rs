//! Data model flowing through the capture pipeline.
//!
//! ```text
//! CaptureRequest ─▶ CaptureOutcome ─▶ DecodedStreams ─▶ CapturePayload
//!                                                          │
//!                               ExtractedDocument ◀────────┘
//!                                      │
//!                               NormalizedResult
//! ```

use serde::{Deserialize, Serialize};

/// A single page to capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    pub url: String,
}

impl CaptureRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Raw result of running the capture tool to completion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CaptureOutcome {
    /// Process exit code; `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Both output streams as text. Never fails to construct.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedStreams {
    pub stdout: String,
    pub stderr: String,
}

/// The capture tool's own JSON report, with defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CapturePayload {
    pub success: bool,
    pub content: String,
    pub error: String,
    pub screenshot: String,
}

/// Title, headers and grouped body text pulled out of a markup string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub title: String,
    pub headers: Vec<String>,
    pub body_paragraphs: Vec<String>,
}

impl ExtractedDocument {
    /// `true` when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.headers.is_empty() && self.body_paragraphs.is_empty()
    }
}

/// The one outcome every invocation produces.
///
/// Serialises to the flat wire shape printed by the CLI:
/// `{"success":true,"data":"…","screenshot":"…"}` or
/// `{"success":false,"error":"…"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireResult", try_from = "WireResult")]
pub enum NormalizedResult {
    Success {
        data: String,
        screenshot: Option<String>,
    },
    Failure {
        error: String,
    },
}

impl NormalizedResult {
    pub fn failure(error: impl Into<String>) -> Self {
        NormalizedResult::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, NormalizedResult::Success { .. })
    }

    /// Rendered text for a success, `None` for a failure.
    pub fn data(&self) -> Option<&str> {
        match self {
            NormalizedResult::Success { data, .. } => Some(data),
            NormalizedResult::Failure { .. } => None,
        }
    }

    /// Failure reason, `None` for a success.
    pub fn error(&self) -> Option<&str> {
        match self {
            NormalizedResult::Success { .. } => None,
            NormalizedResult::Failure { error } => Some(error),
        }
    }

    /// Single-line JSON, as written to stdout by the CLI.
    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            // Only reachable if serde_json itself is broken; keep the
            // stdout contract by hand-building a failure object.
            format!(
                "{{\"success\":false,\"error\":{}}}",
                serde_json::Value::String(format!("failed to serialise result: {e}"))
            )
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireResult {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    screenshot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<NormalizedResult> for WireResult {
    fn from(r: NormalizedResult) -> Self {
        match r {
            NormalizedResult::Success { data, screenshot } => WireResult {
                success: true,
                data: Some(data),
                screenshot,
                error: None,
            },
            NormalizedResult::Failure { error } => WireResult {
                success: false,
                data: None,
                screenshot: None,
                error: Some(error),
            },
        }
    }
}

impl TryFrom<WireResult> for NormalizedResult {
    type Error = String;

    fn try_from(w: WireResult) -> Result<Self, Self::Error> {
        if w.success {
            Ok(NormalizedResult::Success {
                data: w.data.unwrap_or_default(),
                screenshot: w.screenshot.filter(|s| !s.is_empty()),
            })
        } else {
            Ok(NormalizedResult::Failure {
                error: w.error.unwrap_or_default(),
            })
        }
    }
}

/// One URL's result from the multi-URL APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureItem {
    /// Position of the URL in the caller's input.
    pub index: usize,
    pub url: String,
    pub result: NormalizedResult,
}
