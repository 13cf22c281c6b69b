//! Result assembly: one [`NormalizedResult`] per invocation.
//!
//! Decision order for a finished process:
//!
//! | Condition                     | Result                                     |
//! |-------------------------------|--------------------------------------------|
//! | nonzero exit                  | `Failure` (trimmed stderr or exit status)  |
//! | blank stdout                  | `Failure` (`no output received`)           |
//! | stdout not a JSON object      | `Success`, whole stdout extracted, no shot |
//! | payload `success: false`      | `Failure` (payload error)                  |
//! | otherwise                     | `Success`, `content` extracted             |

use crate::config::CaptureConfig;
use crate::error::CaptureError;
use crate::output::{CaptureOutcome, NormalizedResult};
use crate::pipeline::{decode, extract, recover, render};
use tracing::{debug, warn};

/// Turn a finished capture into rendered text and an optional screenshot.
///
/// # Errors
/// - [`CaptureError::ProcessFailed`] for a nonzero exit
/// - [`CaptureError::EmptyOutput`] for blank stdout
/// - [`CaptureError::PayloadReportsFailure`] when the tool said `success: false`
pub fn assemble(
    outcome: &CaptureOutcome,
    config: &CaptureConfig,
) -> Result<(String, Option<String>), CaptureError> {
    let streams = decode::decode_streams(outcome);

    if outcome.exit_code != 0 {
        return Err(CaptureError::ProcessFailed {
            exit_code: outcome.exit_code,
            stderr: streams.stderr.trim().to_string(),
        });
    }

    if streams.stdout.trim().is_empty() {
        return Err(CaptureError::EmptyOutput);
    }

    let (markup, screenshot) = match recover::recover_payload(&streams.stdout) {
        Ok(payload) => {
            if !payload.success {
                return Err(CaptureError::PayloadReportsFailure(payload.error));
            }
            let shot = Some(payload.screenshot).filter(|s| !s.is_empty());
            (payload.content, shot)
        }
        Err(_) => {
            warn!("Treating raw capture output as markup");
            (streams.stdout, None)
        }
    };

    let doc = extract::extract_document(&markup, &config.extract);
    debug!(
        title = %doc.title,
        headers = doc.headers.len(),
        paragraphs = doc.body_paragraphs.len(),
        "Extracted document"
    );
    let data = render::render_document(&doc, config.render_style, &config.labels);
    Ok((data, screenshot))
}

/// [`assemble`], with errors folded into [`NormalizedResult::Failure`].
pub fn normalize_outcome(outcome: &CaptureOutcome, config: &CaptureConfig) -> NormalizedResult {
    into_result(assemble(outcome, config))
}

/// Fold any pipeline result into the public result type.
///
/// The failure text is exactly the error's `Display`.
pub fn into_result(result: Result<(String, Option<String>), CaptureError>) -> NormalizedResult {
    match result {
        Ok((data, screenshot)) => NormalizedResult::Success { data, screenshot },
        Err(e) => NormalizedResult::failure(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderStyle;

    fn outcome(exit_code: i32, stdout: &str, stderr: &str) -> CaptureOutcome {
        CaptureOutcome {
            exit_code,
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    fn normalize(o: &CaptureOutcome) -> NormalizedResult {
        normalize_outcome(o, &CaptureConfig::default())
    }

    #[test]
    fn nonzero_exit_uses_trimmed_stderr() {
        let r = normalize(&outcome(1, "", "network error\n"));
        assert_eq!(r, NormalizedResult::failure("network error"));
    }

    #[test]
    fn nonzero_exit_ignores_stdout() {
        let r = normalize(&outcome(2, r#"{"success":true,"content":"x"}"#, "boom"));
        assert_eq!(r.error(), Some("boom"));
    }

    #[test]
    fn nonzero_exit_with_blank_stderr_reports_status() {
        let r = normalize(&outcome(3, "", "  \n"));
        assert_eq!(r.error(), Some("capture tool exited with status 3"));
    }

    #[test]
    fn killed_process_reports_signal_status() {
        let r = normalize(&outcome(-1, "", ""));
        assert_eq!(r.error(), Some("capture tool exited with status -1"));
    }

    #[test]
    fn blank_stdout_is_no_output() {
        assert_eq!(
            normalize(&outcome(0, "", "")),
            NormalizedResult::failure("no output received")
        );
        assert_eq!(
            normalize(&outcome(0, " \r\n\t", "")),
            NormalizedResult::failure("no output received")
        );
    }

    #[test]
    fn malformed_stdout_is_extracted_as_markup() {
        let r = normalize(&outcome(0, "<title>Raw</title><p>Fallback body text.</p>", ""));
        assert_eq!(
            r,
            NormalizedResult::Success {
                data: "Title: Raw\n\nContent:\n  Fallback body text.".into(),
                screenshot: None,
            }
        );
    }

    #[test]
    fn non_object_json_degrades_to_markup() {
        let r = normalize(&outcome(0, "[1,2,3]", ""));
        assert_eq!(r.data(), Some("Content:\n  [1,2,3]"));
    }

    #[test]
    fn payload_failure_passes_error_through() {
        let r = normalize(&outcome(
            0,
            r#"{"success":false,"error":"Navigation timeout","content":"<p>ignored</p>"}"#,
            "",
        ));
        assert_eq!(r, NormalizedResult::failure("Navigation timeout"));
    }

    #[test]
    fn payload_failure_without_error_is_unknown() {
        let r = normalize(&outcome(0, r#"{"success":false}"#, ""));
        assert_eq!(r.error(), Some(recover::UNKNOWN_ERROR_MESSAGE));
    }

    #[test]
    fn success_renders_content_and_keeps_screenshot() {
        let stdout = r#"{"success":true,"content":"<title>Hi</title><h1>Intro</h1><p>Short text here that ends with period.</p>","screenshot":"shot_1.png"}"#;
        let r = normalize(&outcome(0, stdout, ""));
        assert_eq!(
            r,
            NormalizedResult::Success {
                data: "Title: Hi\n\nHeaders:\n  Intro\n\nContent:\n  Short text here that ends with period."
                    .into(),
                screenshot: Some("shot_1.png".into()),
            }
        );
    }

    #[test]
    fn salvaged_payload_after_garbage() {
        let r = normalize(&outcome(0, r#"garbage{"success":true,"content":"<p>ok</p>"}"#, ""));
        assert_eq!(
            r,
            NormalizedResult::Success {
                data: "Content:\n  ok".into(),
                screenshot: None,
            }
        );
    }

    #[test]
    fn empty_screenshot_is_none() {
        let r = normalize(&outcome(0, r#"{"success":true,"content":"x y z","screenshot":""}"#, ""));
        assert!(matches!(r, NormalizedResult::Success { screenshot: None, .. }));
    }

    #[test]
    fn invalid_utf8_in_stdout_is_tolerated() {
        let mut stdout = br#"{"success":true,"content":"<p>caf"#.to_vec();
        stdout.push(0xE9);
        stdout.extend_from_slice(br#" open.</p>"}"#);
        let r = normalize(&CaptureOutcome {
            exit_code: 0,
            stdout,
            stderr: Vec::new(),
        });
        assert_eq!(r.data(), Some("Content:\n  caf\u{FFFD} open."));
    }

    #[test]
    fn render_style_follows_config() {
        let config = CaptureConfig::builder()
            .render_style(RenderStyle::Compact)
            .build()
            .unwrap();
        let o = outcome(0, r#"{"success":true,"content":"<h2>Head</h2><p>Body text.</p>"}"#, "");
        assert_eq!(
            normalize_outcome(&o, &config).data(),
            Some("Content:\nHead\nBody text.")
        );
    }

    #[test]
    fn into_result_uses_display_text() {
        let r = into_result(Err(CaptureError::ToolNotFound { probed: vec![] }));
        assert_eq!(r.error(), Some("capture tool not found: no executable configured"));
    }
}
