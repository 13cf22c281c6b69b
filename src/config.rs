//! Configuration types for capture normalization.
//!
//! Every knob lives in [`CaptureConfig`], built via its
//! [`CaptureConfigBuilder`]. The capture tool itself is an already-resolved
//! [`CaptureTool`]; finding it is the job of the `capture-locate` crate (or
//! the CLI's `--tool` flag), never of the pipeline.

use crate::error::CaptureError;
use crate::progress::ProgressCallback;
use capture_locate::{LocatedTool, ToolKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Configuration for one or more capture invocations.
///
/// Built via [`CaptureConfig::builder()`] or using
/// [`CaptureConfig::default()`].
///
/// # Example
/// ```rust
/// use capture_normalize::{CaptureConfig, CaptureTool, RenderStyle};
///
/// let config = CaptureConfig::builder()
///     .tool(CaptureTool::plain("/opt/capture/cpp_app"))
///     .render_style(RenderStyle::Compact)
///     .concurrency(2)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct CaptureConfig {
    /// The executable to run. `None` makes every capture fail with
    /// `ToolNotFound`.
    pub tool: Option<CaptureTool>,

    /// Paragraph grouping thresholds for the text extractor.
    pub extract: ExtractOptions,

    /// Layout of the rendered `data` string. Default: [`RenderStyle::Structured`].
    pub render_style: RenderStyle,

    /// Section labels used by the renderer; swap for localized output.
    pub labels: Labels,

    /// Concurrent subprocesses in the multi-URL APIs. Default: 4.
    pub concurrency: usize,

    /// Optional per-capture event sink.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            tool: None,
            extract: ExtractOptions::default(),
            render_style: RenderStyle::default(),
            labels: Labels::default(),
            concurrency: 4,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for CaptureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureConfig")
            .field("tool", &self.tool)
            .field("extract", &self.extract)
            .field("render_style", &self.render_style)
            .field("labels", &self.labels)
            .field("concurrency", &self.concurrency)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn CaptureProgressCallback>"),
            )
            .finish()
    }
}

impl CaptureConfig {
    /// Create a new builder for `CaptureConfig`.
    pub fn builder() -> CaptureConfigBuilder {
        CaptureConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`CaptureConfig`].
#[derive(Debug)]
pub struct CaptureConfigBuilder {
    config: CaptureConfig,
}

impl CaptureConfigBuilder {
    pub fn tool(mut self, tool: CaptureTool) -> Self {
        self.config.tool = Some(tool);
        self
    }

    pub fn min_fragment_chars(mut self, n: usize) -> Self {
        self.config.extract.min_fragment_chars = n;
        self
    }

    pub fn max_fragment_chars(mut self, n: usize) -> Self {
        self.config.extract.max_fragment_chars = n;
        self
    }

    pub fn render_style(mut self, style: RenderStyle) -> Self {
        self.config.render_style = style;
        self
    }

    pub fn labels(mut self, labels: Labels) -> Self {
        self.config.labels = labels;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<CaptureConfig, CaptureError> {
        let c = &self.config;
        if c.concurrency == 0 {
            return Err(CaptureError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        if c.extract.max_fragment_chars == 0 {
            return Err(CaptureError::InvalidConfig(
                "Maximum fragment length must be ≥ 1".into(),
            ));
        }
        if c.extract.min_fragment_chars > c.extract.max_fragment_chars {
            return Err(CaptureError::InvalidConfig(format!(
                "Minimum fragment length {} exceeds maximum {}",
                c.extract.min_fragment_chars, c.extract.max_fragment_chars
            )));
        }
        Ok(self.config)
    }
}

// ── Tool ─────────────────────────────────────────────────────────────────

/// How the URL is handed to the capture tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InvocationMode {
    /// `<exe> <url>` (default)
    #[default]
    Plain,
    /// `<exe> --capture-url <url>`
    Headful,
}

impl InvocationMode {
    /// Command-line arguments for `url` in this mode.
    pub fn args<'a>(&self, url: &'a str) -> Vec<&'a str> {
        match self {
            InvocationMode::Plain => vec![url],
            InvocationMode::Headful => vec!["--capture-url", url],
        }
    }
}

impl From<ToolKind> for InvocationMode {
    fn from(kind: ToolKind) -> Self {
        match kind {
            ToolKind::Headful => InvocationMode::Headful,
            ToolKind::Plain => InvocationMode::Plain,
        }
    }
}

/// An already-resolved capture executable.
///
/// A relative `path` is taken relative to the current directory at the time
/// of the capture, never relative to the tool's own directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureTool {
    pub path: PathBuf,
    pub mode: InvocationMode,
}

impl CaptureTool {
    pub fn new(path: impl Into<PathBuf>, mode: InvocationMode) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }

    pub fn plain(path: impl Into<PathBuf>) -> Self {
        Self::new(path, InvocationMode::Plain)
    }

    pub fn headful(path: impl Into<PathBuf>) -> Self {
        Self::new(path, InvocationMode::Headful)
    }
}

impl From<LocatedTool> for CaptureTool {
    fn from(t: LocatedTool) -> Self {
        CaptureTool::new(t.path, t.kind.into())
    }
}

// ── Extraction & rendering ───────────────────────────────────────────────

/// Paragraph grouping thresholds, measured in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Fragments shorter than this are noise when they come in runs. Default: 3.
    pub min_fragment_chars: usize,
    /// A fragment longer than this closes the current paragraph. Default: 100.
    pub max_fragment_chars: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            min_fragment_chars: 3,
            max_fragment_chars: 100,
        }
    }
}

/// Layout of the rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderStyle {
    /// Title line, indented `Headers:` and `Content:` sections. (default)
    #[default]
    Structured,
    /// Title line, then `Content:` followed by headers and paragraphs
    /// one per line without indentation.
    Compact,
}

/// Section labels printed by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    pub title: String,
    pub headers: String,
    pub content: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            title: "Title:".into(),
            headers: "Headers:".into(),
            content: "Content:".into(),
        }
    }
}
