//! Shared helpers: fake capture tools written as shell scripts.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing_subscriber::EnvFilter;

/// Serialises script creation and spawning within one test binary.
///
/// A script still open for writing in one thread can be inherited by a
/// child forked from another thread, and exec then fails with ETXTBSY.
static SPAWN_LOCK: Mutex<()> = Mutex::new(());

pub fn spawn_lock() -> MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Write an executable `/bin/sh` script named `name` into `dir`.
pub fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Script body that prints `text` verbatim on stdout.
pub fn print_stdout(text: &str) -> String {
    format!("cat <<'__CAPTURE_EOF__'\n{text}\n__CAPTURE_EOF__")
}

/// Route library logs through the test harness (`RUST_LOG` to adjust).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
