//! Payload recovery: read the capture tool's JSON report from noisy stdout.
//!
//! The tool's stdout is not a clean protocol boundary: diagnostics can be
//! printed ahead of the final JSON object. Parsing therefore runs in two
//! steps:
//!
//! 1. **Strict**: the whole trimmed text must be a JSON object.
//! 2. **Salvage**: only if strict parsing *fails*: starting at the last `{`
//!    and walking back through earlier ones, take the substring from the
//!    brace to the end and accept the first that parses as an object.
//!
//! Trying only the last `{` would miss almost every real report: its
//! `content` field is markup, and any nested object or `{` inside a string
//! puts the last brace somewhere in the middle of the report. Walking back
//! finds the brace that opens the whole trailing object. Every earlier brace
//! costs one more parse attempt, so salvage is quadratic in the worst case.
//!
//! Valid JSON that is not an object (`[1,2,3]`, `"str"`, `42`) is rejected
//! outright rather than coerced; the caller then degrades to treating stdout
//! as markup.

use crate::error::PayloadError;
use crate::output::CapturePayload;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Failure message used when the tool reports `success: false` without
/// saying why.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

/// Parse `text` into a JSON object, salvaging a trailing object if needed.
pub fn parse_payload_object(text: &str) -> Result<Map<String, Value>, PayloadError> {
    let trimmed = text.trim();

    let strict_err = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => return Ok(map),
        Ok(other) => {
            return Err(PayloadError::Malformed {
                reason: format!("expected a JSON object, found {}", json_kind(&other)),
            })
        }
        Err(e) => e,
    };

    if let Some(map) = salvage_trailing_object(trimmed) {
        debug!("Recovered JSON object from trailing output");
        return Ok(map);
    }

    Err(PayloadError::Malformed {
        reason: strict_err.to_string(),
    })
}

/// Try every `{` from the last to the first; return the first suffix that is
/// a complete JSON object.
fn salvage_trailing_object(text: &str) -> Option<Map<String, Value>> {
    text.rmatch_indices('{').find_map(|(idx, _)| {
        match serde_json::from_str::<Value>(&text[idx..]) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    })
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read the payload fields, filling defaults for anything absent or mistyped.
///
/// - `success`: non-boolean or absent → `false`
/// - `content`: absent/null/non-string → the headful tool's `data` field, else `""`
/// - `error`: absent/null/blank → [`UNKNOWN_ERROR_MESSAGE`]
/// - `screenshot`: absent/null → `""`
pub fn read_payload(obj: &Map<String, Value>) -> CapturePayload {
    let str_field = |key: &str| obj.get(key).and_then(Value::as_str);

    let content = str_field("content")
        .or_else(|| str_field("data"))
        .unwrap_or_default()
        .to_string();

    let error = str_field("error")
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .unwrap_or(UNKNOWN_ERROR_MESSAGE)
        .to_string();

    CapturePayload {
        success: obj.get("success").and_then(Value::as_bool).unwrap_or(false),
        content,
        error,
        screenshot: str_field("screenshot").unwrap_or_default().to_string(),
    }
}

/// Parse and read the payload in one step.
pub fn recover_payload(text: &str) -> Result<CapturePayload, PayloadError> {
    match parse_payload_object(text) {
        Ok(obj) => Ok(read_payload(&obj)),
        Err(e) => {
            warn!(error = %e, "Capture output is not a JSON object");
            Err(e)
        }
    }
}
