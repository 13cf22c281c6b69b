//! Streaming capture API: emit results as subprocesses finish.
//!
//! Unlike [`crate::capture::capture_many`], which returns only after every
//! URL is done, [`capture_stream`] yields each [`CaptureItem`] as soon as its
//! capture completes. Items arrive in completion order; sort by `index` if
//! input order matters.

use crate::capture::capture_indexed;
use crate::config::CaptureConfig;
use crate::output::CaptureItem;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_stream::Stream;

/// A boxed stream of capture results.
pub type CaptureStream = Pin<Box<dyn Stream<Item = CaptureItem> + Send>>;

/// Capture `urls`, streaming results as they are ready.
///
/// At most `config.concurrency` capture tools run at once. The stream owns a
/// copy of `config`, so it is `'static`. `on_batch_start` fires immediately;
/// `on_batch_complete` fires when the stream is exhausted.
///
/// # Example
/// ```rust,no_run
/// use capture_normalize::{capture_stream, CaptureConfig, CaptureTool};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let config = CaptureConfig::builder()
///     .tool(CaptureTool::plain("./bin/package/cpp_app"))
///     .build()
///     .unwrap();
/// let mut results = capture_stream(["https://a.example", "https://b.example"], &config);
/// while let Some(item) = results.next().await {
///     println!("{} {}", item.url, item.result.to_json_line());
/// }
/// # }
/// ```
pub fn capture_stream<I, S>(urls: I, config: &CaptureConfig) -> CaptureStream
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let urls: Vec<String> = urls.into_iter().map(Into::into).collect();
    let total = urls.len();
    let concurrency = config.concurrency.max(1);
    let callback = config.progress_callback.clone();
    if let Some(ref cb) = callback {
        cb.on_batch_start(total);
    }

    let config = Arc::new(config.clone());
    let successes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&successes);

    let items = stream::iter(urls.into_iter().enumerate().map(move |(index, url)| {
        let cfg = Arc::clone(&config);
        async move {
            let result = capture_indexed(index, &url, &cfg).await;
            CaptureItem { index, url, result }
        }
    }))
    .buffer_unordered(concurrency)
    .inspect(move |item| {
        if item.result.is_success() {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    });

    let tail = stream::once(async move {
        if let Some(cb) = callback {
            cb.on_batch_complete(total, successes.load(Ordering::Relaxed));
        }
    })
    .filter_map(|()| async { None::<CaptureItem> });

    Box::pin(items.chain(tail))
}
