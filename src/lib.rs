//! # capture-normalize
//!
//! Run an external page-capture executable and turn whatever it prints into
//! one clean, structured result.
//!
//! The capture tool is an opaque program: it takes a URL, loads the page,
//! and prints a JSON report (`{success, content, error, screenshot}`) on
//! stdout, sometimes preceded by diagnostics, sometimes not JSON at all.
//! This crate owns everything after the tool exits.
//!
//! ## Pipeline Overview
//!
//! ```text
//! URL
//!  │
//!  ├─ 1. Invoke    spawn the tool in its own directory, collect bytes + exit code
//!  ├─ 2. Decode    lossy UTF-8
//!  ├─ 3. Recover   strict JSON object, else salvage the trailing object
//!  ├─ 4. Extract   title / headers / grouped paragraphs from the markup
//!  ├─ 5. Render    "Title: …" / "Headers:" / "Content:" text
//!  └─ 6. Assemble  exactly one Success or Failure
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use capture_normalize::{capture, CaptureConfig, CaptureTool, NormalizedResult};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CaptureConfig::builder()
//!         .tool(CaptureTool::headful("./bin/cs/CSharpApp.exe"))
//!         .build()?;
//!     match capture("https://example.com", &config).await {
//!         NormalizedResult::Success { data, screenshot } => {
//!             println!("{data}");
//!             if let Some(name) = screenshot {
//!                 eprintln!("screenshot: {name}");
//!             }
//!         }
//!         NormalizedResult::Failure { error } => eprintln!("capture failed: {error}"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `capnorm` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! capture-normalize = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod capture;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use capture::{capture, capture_many, capture_sync};
pub use config::{
    CaptureConfig, CaptureConfigBuilder, CaptureTool, ExtractOptions, InvocationMode, Labels,
    RenderStyle,
};
pub use error::{CaptureError, PayloadError};
pub use output::{
    CaptureItem, CaptureOutcome, CapturePayload, CaptureRequest, DecodedStreams,
    ExtractedDocument, NormalizedResult,
};
pub use pipeline::assemble::normalize_outcome;
pub use pipeline::extract::extract_document;
pub use pipeline::render::render_document;
pub use progress::{CaptureProgressCallback, NoopProgressCallback, ProgressCallback};
pub use stream::{capture_stream, CaptureStream};
