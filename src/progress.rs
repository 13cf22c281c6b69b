//! Progress-callback trait for per-capture events.
//!
//! Inject an [`Arc<dyn CaptureProgressCallback>`] via
//! [`crate::config::CaptureConfigBuilder::progress_callback`] to hear about
//! each subprocess as it starts and finishes. Callbacks observe the pipeline;
//! nothing they do changes a result.
//!
//! # Example
//!
//! ```rust
//! use capture_normalize::{CaptureProgressCallback, CaptureConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl CaptureProgressCallback for CountingCallback {
//!     fn on_capture_complete(&self, index: usize, url: &str, data_len: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("#{index} {url}: {data_len} bytes");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = CaptureConfig::builder()
//!     .progress_callback(counter as Arc<dyn CaptureProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the pipeline around each capture.
///
/// Implementations must be `Send + Sync`: the multi-URL APIs run several
/// captures at once, so per-capture methods may be called concurrently.
/// All methods default to no-ops.
pub trait CaptureProgressCallback: Send + Sync {
    /// Called once before a multi-URL run starts.
    fn on_batch_start(&self, total: usize) {
        let _ = total;
    }

    /// Called just before the capture tool is launched for a URL.
    ///
    /// `index` is the URL's position in the input (0 for single captures).
    fn on_capture_start(&self, index: usize, url: &str) {
        let _ = (index, url);
    }

    /// Called when a capture produced a success result.
    ///
    /// `data_len` is the byte length of the rendered text.
    fn on_capture_complete(&self, index: usize, url: &str, data_len: usize) {
        let _ = (index, url, data_len);
    }

    /// Called when a capture produced a failure result.
    fn on_capture_error(&self, index: usize, url: &str, error: &str) {
        let _ = (index, url, error);
    }

    /// Called once after every URL of a multi-URL run has a result.
    fn on_batch_complete(&self, total: usize, success_count: usize) {
        let _ = (total, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl CaptureProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::CaptureConfig`].
pub type ProgressCallback = Arc<dyn CaptureProgressCallback>;
