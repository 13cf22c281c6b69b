//! Capture entry points.
//!
//! [`capture`] runs the whole pipeline for one URL and always returns a
//! [`NormalizedResult`]: every failure, including a missing tool, becomes
//! `Failure`. [`capture_many`] fans out over several URLs and returns their
//! results in input order; use [`crate::stream::capture_stream`] to consume
//! them as they finish instead.

use crate::config::CaptureConfig;
use crate::error::CaptureError;
use crate::output::{CaptureItem, CaptureRequest, NormalizedResult};
use crate::pipeline::{assemble, invoke};
use crate::stream::capture_stream;
use futures::StreamExt;
use std::time::Instant;
use tracing::{debug, info};

/// Capture `url` with the configured tool and normalise the result.
///
/// # Example
/// ```rust,no_run
/// use capture_normalize::{capture, CaptureConfig, CaptureTool};
///
/// # #[tokio::main]
/// # async fn main() {
/// let config = CaptureConfig::builder()
///     .tool(CaptureTool::plain("./bin/package/cpp_app"))
///     .build()
///     .unwrap();
/// let result = capture("https://example.com", &config).await;
/// println!("{}", result.to_json_line());
/// # }
/// ```
pub async fn capture(url: impl AsRef<str>, config: &CaptureConfig) -> NormalizedResult {
    capture_indexed(0, url.as_ref(), config).await
}

/// Synchronous wrapper around [`capture`].
///
/// Runs the pipeline on a temporary current-thread runtime, so it must not
/// be called from inside an async context.
pub fn capture_sync(url: impl AsRef<str>, config: &CaptureConfig) -> NormalizedResult {
    match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt.block_on(capture(url, config)),
        Err(e) => assemble::into_result(Err(CaptureError::Internal(format!(
            "Failed to create tokio runtime: {e}"
        )))),
    }
}

/// Capture several URLs, at most `config.concurrency` at a time.
///
/// One result per URL, in input order. Batch progress events fire once at
/// the start and once after the last capture.
pub async fn capture_many<I, S>(urls: I, config: &CaptureConfig) -> Vec<CaptureItem>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let start = Instant::now();
    let mut items: Vec<CaptureItem> = capture_stream(urls, config).collect().await;
    items.sort_by_key(|item| item.index);

    info!(
        total = items.len(),
        succeeded = items.iter().filter(|i| i.result.is_success()).count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Batch capture complete"
    );
    items
}

/// One capture, reporting progress under `index`.
pub(crate) async fn capture_indexed(
    index: usize,
    url: &str,
    config: &CaptureConfig,
) -> NormalizedResult {
    info!(index, url, "Starting capture");
    if let Some(ref cb) = config.progress_callback {
        cb.on_capture_start(index, url);
    }

    let start = Instant::now();
    let result = assemble::into_result(run_pipeline(url, config).await);
    debug!(
        index,
        success = result.is_success(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Capture finished"
    );

    if let Some(ref cb) = config.progress_callback {
        match &result {
            NormalizedResult::Success { data, .. } => cb.on_capture_complete(index, url, data.len()),
            NormalizedResult::Failure { error } => cb.on_capture_error(index, url, error),
        }
    }
    result
}

async fn run_pipeline(
    url: &str,
    config: &CaptureConfig,
) -> Result<(String, Option<String>), CaptureError> {
    let tool = config
        .tool
        .as_ref()
        .ok_or(CaptureError::ToolNotFound { probed: Vec::new() })?;
    let outcome = invoke::run_capture(&CaptureRequest::new(url), tool).await?;
    assemble::assemble(&outcome, config)
}
