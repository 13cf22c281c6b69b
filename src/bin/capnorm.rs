//! CLI binary for capture-normalize.
//!
//! A thin shim over the library crate: resolves the capture tool, maps CLI
//! flags to `CaptureConfig`, and prints exactly one JSON line on stdout.
//! Everything else (logs, spinner, usage text) goes to stderr.

use anyhow::{Context, Result};
use capture_normalize::{
    capture, CaptureConfig, CaptureError, CaptureProgressCallback, CaptureTool, InvocationMode,
    NormalizedResult, ProgressCallback, RenderStyle,
};
use clap::error::ErrorKind;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Error text printed when the command line does not carry exactly one URL.
const USAGE_ERROR_MESSAGE: &str = "URL not provided";

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner on stderr while the capture tool runs.
///
/// indicatif hides the bar on its own when stderr is not a terminal, so
/// piping stderr to a file does not fill it with redraws.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Capturing");
        Arc::new(Self { bar })
    }
}

impl CaptureProgressCallback for CliProgressCallback {
    fn on_capture_start(&self, _index: usize, url: &str) {
        self.bar.set_message(url.to_string());
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_capture_complete(&self, _index: usize, _url: &str, _data_len: usize) {
        self.bar.finish_and_clear();
    }

    fn on_capture_error(&self, _index: usize, _url: &str, _error: &str) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Capture with the tool found next to this binary or on PATH
  capnorm https://example.com

  # Use a specific build of the headful tool
  capnorm --tool ./bin/cs/CSharpApp.exe https://example.com

  # Plain one-line-per-paragraph layout
  capnorm --style compact https://example.com

OUTPUT:
  Exactly one JSON line on stdout:
    {"success":true,"data":"Title: …","screenshot":"…"}
    {"success":false,"error":"…"}

TOOL DISCOVERY (first match wins):
  1. --tool / CAPNORM_TOOL
  2. CAPTURE_TOOL_PATH
  3. CSharpApp then cpp_app under the repository root
     (bin/cs, bin, src/cs/bin/Release, bin/package, build/bin/Release, src/cpp)
  4. the current directory
  5. PATH

EXIT STATUS:
  0  success result
  1  failure result
  2  usage error
"#;

/// Run a page-capture tool and print its output as normalized JSON.
#[derive(Parser, Debug)]
#[command(
    name = "capnorm",
    version,
    about = "Run a page-capture tool and print its output as normalized JSON",
    long_about = "Invoke an external page-capture executable for one URL, recover its JSON \
report even when diagnostics precede it, extract title, headers and body text from the \
captured markup, and print a single JSON result line.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Page to capture.
    url: String,

    /// Capture executable to run instead of searching for one.
    #[arg(long, env = "CAPNORM_TOOL")]
    tool: Option<PathBuf>,

    /// Pass the URL as `--capture-url <url>` (implied for CSharpApp).
    #[arg(long, env = "CAPNORM_HEADFUL")]
    headful: bool,

    /// Layout of the `data` text.
    #[arg(long, env = "CAPNORM_STYLE", value_enum, default_value = "structured")]
    style: StyleArg,

    /// Runs of body fragments shorter than this are dropped.
    #[arg(long, env = "CAPNORM_MIN_FRAGMENT_CHARS", default_value_t = 3)]
    min_fragment_chars: usize,

    /// A body fragment longer than this ends its paragraph.
    #[arg(long, env = "CAPNORM_MAX_FRAGMENT_CHARS", default_value_t = 100)]
    max_fragment_chars: usize,

    /// Disable the spinner.
    #[arg(long, env = "CAPNORM_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "CAPNORM_VERBOSE")]
    verbose: bool,

    /// Suppress all diagnostics except errors.
    #[arg(short, long, env = "CAPNORM_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum StyleArg {
    Structured,
    Compact,
}

impl From<StyleArg> for RenderStyle {
    fn from(v: StyleArg) -> Self {
        match v {
            StyleArg::Structured => RenderStyle::Structured,
            StyleArg::Compact => RenderStyle::Compact,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            emit(&NormalizedResult::failure(USAGE_ERROR_MESSAGE))?;
            // Usage text is diagnostics; it never touches stdout.
            eprint!("{}", e.render());
            return Ok(ExitCode::from(2));
        }
    };

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Resolve the capture tool ─────────────────────────────────────────
    let tool = match resolve_tool(&cli) {
        Ok(tool) => tool,
        Err(e) => {
            tracing::error!(error = %e, "No usable capture tool");
            emit(&NormalizedResult::failure(e.to_string()))?;
            return Ok(ExitCode::FAILURE);
        }
    };
    tracing::debug!(path = %tool.path.display(), mode = ?tool.mode, "Using capture tool");

    // ── Build config ─────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress;
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn CaptureProgressCallback>)
    } else {
        None
    };

    let config = match build_config(&cli, tool, progress_cb) {
        Ok(config) => config,
        Err(e) => {
            emit(&NormalizedResult::failure(e.to_string()))?;
            eprintln!("error: {e}");
            return Ok(ExitCode::from(2));
        }
    };

    // ── Run capture ──────────────────────────────────────────────────────
    let result = capture(&cli.url, &config).await;
    emit(&result)?;

    Ok(if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Explicit path first, then the usual search locations.
fn resolve_tool(cli: &Cli) -> Result<CaptureTool, CaptureError> {
    let located = match cli.tool {
        Some(ref path) => capture_locate::resolve_explicit(path)?,
        None => capture_locate::locate_capture_tool()?,
    };
    let mut tool = CaptureTool::from(located);
    if cli.headful {
        tool.mode = InvocationMode::Headful;
    }
    Ok(tool)
}

fn build_config(
    cli: &Cli,
    tool: CaptureTool,
    progress_cb: Option<ProgressCallback>,
) -> Result<CaptureConfig, CaptureError> {
    let mut builder = CaptureConfig::builder()
        .tool(tool)
        .render_style(cli.style.into())
        .min_fragment_chars(cli.min_fragment_chars)
        .max_fragment_chars(cli.max_fragment_chars);

    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }

    builder.build()
}

/// Write the single result line to stdout.
fn emit(result: &NormalizedResult) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", result.to_json_line()).context("Failed to write to stdout")?;
    handle.flush().context("Failed to flush stdout")
}
