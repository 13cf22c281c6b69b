//! # capture-locate
//!
//! Find the external page-capture executable so that callers of
//! `capture-normalize` never hard-code where the tool was built or installed.
//!
//! ## How it works
//!
//! [`Locator::locate`] walks an ordered candidate list and returns the first
//! existing file:
//!
//! 1. `CAPTURE_TOOL_PATH`: explicit override from the environment.
//! 2. Headful tool (`CSharpApp`) under the repository root:
//!    `bin/cs/`, `bin/`, `src/cs/bin/Release/`.
//! 3. Headful tool in the current directory and `<root>/bin/package/`.
//! 4. Plain tool (`cpp_app`) under the repository root:
//!    `bin/package/`, `build/bin/Release/`, `src/cpp/`.
//! 5. Plain tool in the current directory and `<root>/bin/package/`.
//! 6. Both names along `PATH`.
//!
//! The repository root is found by walking up from the running executable's
//! directory until a directory contains `src/` or a `*.sln` file. Without
//! either marker the top-most directory reached stands in for the root.
//! A located path is always returned absolute.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use capture_locate::{locate_capture_tool, ToolKind};
//!
//! let tool = locate_capture_tool().expect("no capture tool installed");
//! match tool.kind {
//!     ToolKind::Headful => println!("headful tool at {}", tool.path.display()),
//!     ToolKind::Plain => println!("plain tool at {}", tool.path.display()),
//! }
//! ```
//!
//! ## Environment variable overrides
//!
//! - `CAPTURE_TOOL_PATH`: path to the capture executable; skips the search
//!   when the file exists.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

// ── Public constants ─────────────────────────────────────────────────────────

/// Environment variable that points straight at a capture executable.
pub const TOOL_PATH_ENV: &str = "CAPTURE_TOOL_PATH";

/// File stem of the headful (browser-hosted) capture tool.
pub const HEADFUL_TOOL_STEM: &str = "CSharpApp";

/// File stem of the plain capture tool.
pub const PLAIN_TOOL_STEM: &str = "cpp_app";

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned while locating the capture tool.
#[derive(Error, Debug)]
pub enum LocateError {
    /// No candidate path exists.
    #[error("capture tool not found; probed {} locations", probed.len())]
    NotFound { probed: Vec<PathBuf> },

    /// A path supplied by the caller does not point at a file.
    #[error("capture tool '{}' does not exist", path.display())]
    MissingExplicit { path: PathBuf },
}

impl LocateError {
    /// Every path that was checked before giving up.
    pub fn probed(&self) -> &[PathBuf] {
        match self {
            LocateError::NotFound { probed } => probed,
            LocateError::MissingExplicit { path } => std::slice::from_ref(path),
        }
    }
}

// ── Tool metadata ────────────────────────────────────────────────────────────

/// Which flavour of capture tool a path refers to.
///
/// The two flavours take the URL differently: the headful tool expects
/// `--capture-url <url>`, the plain tool takes the URL as its only argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Headful,
    Plain,
}

impl ToolKind {
    /// Platform file name, e.g. `cpp_app` or `cpp_app.exe`.
    pub fn file_name(self) -> String {
        let stem = match self {
            ToolKind::Headful => HEADFUL_TOOL_STEM,
            ToolKind::Plain => PLAIN_TOOL_STEM,
        };
        format!("{stem}{}", std::env::consts::EXE_SUFFIX)
    }

    /// Guess the flavour from a file name; anything unrecognised is `Plain`.
    pub fn from_path(path: &Path) -> Self {
        match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) if stem.eq_ignore_ascii_case(HEADFUL_TOOL_STEM) => ToolKind::Headful,
            _ => ToolKind::Plain,
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolKind::Headful => f.write_str("headful"),
            ToolKind::Plain => f.write_str("plain"),
        }
    }
}

/// A capture executable that exists on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedTool {
    pub path: PathBuf,
    pub kind: ToolKind,
}

// ── Locator ──────────────────────────────────────────────────────────────────

/// Ordered search over the places a capture tool is usually found.
///
/// Every input is injectable so the search is testable without touching the
/// real process environment.
#[derive(Debug, Clone, Default)]
pub struct Locator {
    start_dir: Option<PathBuf>,
    cwd: Option<PathBuf>,
    search_path: Option<OsString>,
    env_override: Option<PathBuf>,
}

impl Locator {
    /// Locator with no inputs; nothing is found until inputs are supplied.
    pub fn new() -> Self {
        Self::default()
    }

    /// Locator seeded from the running process: executable directory,
    /// current directory, `PATH` and `CAPTURE_TOOL_PATH`.
    pub fn from_env() -> Self {
        let start_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self {
            start_dir,
            cwd: std::env::current_dir().ok(),
            search_path: std::env::var_os("PATH"),
            env_override: std::env::var_os(TOOL_PATH_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn start_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start_dir = Some(dir.into());
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn search_path(mut self, path: impl Into<OsString>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    pub fn env_override(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_override = Some(path.into());
        self
    }

    /// All candidate paths in probe order, deduplicated.
    pub fn candidates(&self) -> Vec<(PathBuf, ToolKind)> {
        let mut out: Vec<(PathBuf, ToolKind)> = Vec::new();
        let mut push = |path: PathBuf, kind: ToolKind| {
            if !out.iter().any(|(p, _)| *p == path) {
                out.push((path, kind));
            }
        };

        if let Some(ref p) = self.env_override {
            push(p.clone(), ToolKind::from_path(p));
        }

        let root = self.start_dir.as_deref().map(repo_root_or_top);

        for kind in [ToolKind::Headful, ToolKind::Plain] {
            let name = kind.file_name();
            if let Some(ref root) = root {
                for rel in repo_relative_dirs(kind) {
                    push(root.join(rel).join(&name), kind);
                }
            }
            if let Some(ref cwd) = self.cwd {
                push(cwd.join(&name), kind);
            }
            if let Some(ref root) = root {
                push(root.join("bin").join("package").join(&name), kind);
            }
        }

        if let Some(ref path_var) = self.search_path {
            for kind in [ToolKind::Headful, ToolKind::Plain] {
                let name = kind.file_name();
                for dir in std::env::split_paths(path_var) {
                    if !dir.as_os_str().is_empty() {
                        push(dir.join(&name), kind);
                    }
                }
            }
        }

        out
    }

    /// Return the first candidate that exists as a file.
    pub fn locate(&self) -> Result<LocatedTool, LocateError> {
        let candidates = self.candidates();
        for (path, kind) in &candidates {
            if path.is_file() {
                debug!(path = %path.display(), %kind, "capture tool located");
                return Ok(LocatedTool {
                    path: absolutize(path),
                    kind: *kind,
                });
            }
        }

        debug!(probed = candidates.len(), "no capture tool candidate exists");
        Err(LocateError::NotFound {
            probed: candidates.into_iter().map(|(p, _)| p).collect(),
        })
    }
}

/// Subdirectories of the repository root where builds of each tool land.
fn repo_relative_dirs(kind: ToolKind) -> &'static [&'static str] {
    match kind {
        ToolKind::Headful => &["bin/cs", "bin", "src/cs/bin/Release"],
        ToolKind::Plain => &["bin/package", "build/bin/Release", "src/cpp"],
    }
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Walk up from `start` to the first directory holding `src/` or a `*.sln`.
///
/// Returns `None` when no ancestor carries either marker; [`Locator`] then
/// probes the repository-relative candidates under the top-most ancestor.
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    ancestors(start)
        .find(|dir| dir.join("src").is_dir() || has_solution_file(dir))
        .map(Path::to_path_buf)
}

/// [`find_repo_root`], falling back to the top-most directory reached
/// (the filesystem root for an absolute `start`). The repository-relative
/// candidates are then probed under that directory instead of skipped.
fn repo_root_or_top(start: &Path) -> PathBuf {
    find_repo_root(start)
        .or_else(|| ancestors(start).last().map(Path::to_path_buf))
        .unwrap_or_else(|| start.to_path_buf())
}

/// `Path::ancestors` without the empty path a relative path ends on.
fn ancestors(start: &Path) -> impl Iterator<Item = &Path> {
    start.ancestors().filter(|dir| !dir.as_os_str().is_empty())
}

/// Relative paths are anchored at the current directory; on failure the
/// path is returned unchanged.
fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn has_solution_file(dir: &Path) -> bool {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return false;
    };
    entries
        .filter_map(Result::ok)
        .any(|e| e.path().extension().is_some_and(|ext| ext == "sln"))
}

/// Validate a caller-supplied tool path.
///
/// A relative path is resolved against the current directory, and the
/// returned path is absolute.
pub fn resolve_explicit(path: impl Into<PathBuf>) -> Result<LocatedTool, LocateError> {
    let path = absolutize(&path.into());
    if !path.is_file() {
        return Err(LocateError::MissingExplicit { path });
    }
    let kind = ToolKind::from_path(&path);
    Ok(LocatedTool { path, kind })
}

/// Locate the capture tool using the running process environment.
pub fn locate_capture_tool() -> Result<LocatedTool, LocateError> {
    Locator::from_env().locate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"").unwrap();
    }

    #[test]
    fn repo_root_found_from_nested_dir() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("src")).unwrap();
        let nested = tmp.path().join("target").join("debug");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_repo_root(&nested).as_deref(), Some(tmp.path()));
    }

    #[test]
    fn repo_root_found_by_solution_file() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("App.sln"));
        let nested = tmp.path().join("out");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_repo_root(&nested).as_deref(), Some(tmp.path()));
    }

    #[test]
    fn markerless_start_dir_falls_back_to_top_directory() {
        let tmp = TempDir::new().unwrap();
        let top = tmp.path().ancestors().last().unwrap().to_path_buf();
        let expected_root = find_repo_root(tmp.path()).unwrap_or(top);

        let candidates = Locator::new().start_dir(tmp.path()).candidates();
        let headful = expected_root.join("bin/cs").join(ToolKind::Headful.file_name());
        let plain = expected_root.join("bin/package").join(ToolKind::Plain.file_name());
        assert!(candidates.iter().any(|(p, _)| *p == headful));
        assert!(candidates.iter().any(|(p, _)| *p == plain));
    }

    #[test]
    fn relative_start_dir_tops_out_at_first_component() {
        assert_eq!(
            repo_root_or_top(Path::new("no-such-dir-for-locate/nested")),
            PathBuf::from("no-such-dir-for-locate")
        );
    }

    #[test]
    fn headful_preferred_over_plain() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("src")).unwrap();
        let plain = tmp.path().join("bin/package").join(ToolKind::Plain.file_name());
        let headful = tmp.path().join("bin").join(ToolKind::Headful.file_name());
        touch(&plain);
        touch(&headful);

        let tool = Locator::new().start_dir(tmp.path()).locate().unwrap();
        assert_eq!(tool.path, headful);
        assert_eq!(tool.kind, ToolKind::Headful);
    }

    #[test]
    fn plain_tool_found_in_build_dir() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("src")).unwrap();
        let plain = tmp
            .path()
            .join("build/bin/Release")
            .join(ToolKind::Plain.file_name());
        touch(&plain);

        let tool = Locator::new().start_dir(tmp.path()).locate().unwrap();
        assert_eq!(tool.path, plain);
        assert_eq!(tool.kind, ToolKind::Plain);
    }

    #[test]
    fn env_override_wins() {
        let tmp = TempDir::new().unwrap();
        let custom = tmp.path().join("my-capture");
        touch(&custom);
        std::fs::create_dir_all(tmp.path().join("src")).unwrap();
        touch(&tmp.path().join("bin").join(ToolKind::Headful.file_name()));

        let tool = Locator::new()
            .start_dir(tmp.path())
            .env_override(&custom)
            .locate()
            .unwrap();
        assert_eq!(tool.path, custom);
        assert_eq!(tool.kind, ToolKind::Plain);
    }

    #[test]
    fn search_path_is_last_resort() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("tools");
        let plain = dir.join(ToolKind::Plain.file_name());
        touch(&plain);

        let tool = Locator::new()
            .search_path(dir.clone().into_os_string())
            .locate()
            .unwrap();
        assert_eq!(tool.path, plain);
    }

    #[test]
    fn not_found_lists_probed_paths() {
        let tmp = TempDir::new().unwrap();
        let err = Locator::new().cwd(tmp.path()).locate().unwrap_err();
        assert_eq!(err.probed().len(), 2);
        assert!(err.to_string().contains("probed 2"));
    }

    #[test]
    fn candidates_are_deduplicated() {
        let tmp = TempDir::new().unwrap();
        let locator = Locator::new().cwd(tmp.path()).env_override(
            tmp.path().join(ToolKind::Plain.file_name()),
        );
        let candidates = locator.candidates();
        let plain_hits = candidates
            .iter()
            .filter(|(p, _)| *p == tmp.path().join(ToolKind::Plain.file_name()))
            .count();
        assert_eq!(plain_hits, 1);
    }

    #[test]
    fn explicit_path_must_exist() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(matches!(
            resolve_explicit(&missing),
            Err(LocateError::MissingExplicit { .. })
        ));

        let headful = tmp.path().join(ToolKind::Headful.file_name());
        touch(&headful);
        assert_eq!(resolve_explicit(&headful).unwrap().kind, ToolKind::Headful);
    }

    #[test]
    fn explicit_relative_path_is_made_absolute() {
        let cwd = std::env::current_dir().unwrap();
        let tmp = tempfile::Builder::new()
            .prefix("explicit-rel")
            .tempdir_in(&cwd)
            .unwrap();
        let abs = tmp.path().join(ToolKind::Plain.file_name());
        touch(&abs);
        let rel = abs.strip_prefix(&cwd).unwrap();
        assert!(rel.is_relative());

        let tool = resolve_explicit(rel).unwrap();
        assert_eq!(tool.path, abs);
        assert!(tool.path.is_absolute());
    }
}
