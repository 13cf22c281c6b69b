//! Byte decoding: raw process output → text.
//!
//! The capture tool may emit binary garbage or mixed encodings. Every invalid
//! UTF-8 sequence becomes U+FFFD so the recovery parser always receives
//! valid text; this stage has no failure mode.

use crate::output::{CaptureOutcome, DecodedStreams};
use tracing::debug;

/// Decode bytes as UTF-8, substituting the replacement character for
/// invalid or truncated sequences.
pub fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Decode both output streams of a finished capture.
pub fn decode_streams(outcome: &CaptureOutcome) -> DecodedStreams {
    let stdout = decode_lossy(&outcome.stdout);
    let stderr = decode_lossy(&outcome.stderr);
    if stdout.contains(char::REPLACEMENT_CHARACTER) {
        debug!("stdout contained invalid UTF-8; replaced");
    }
    DecodedStreams { stdout, stderr }
}
