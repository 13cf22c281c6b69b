//! Pipeline stages for capture normalization.
//!
//! Each submodule implements exactly one transformation step, so each is
//! independently testable and only [`invoke`] touches the operating system.
//!
//! ## Data Flow
//!
//! ```text
//! invoke ──▶ decode ──▶ recover ──▶ extract ──▶ render
//! (process)  (UTF-8)    (JSON)      (markup)    (text)
//!    └───────────────── assemble ──────────────────┘
//! ```
//!
//! 1. [`invoke`]  : run the capture tool, collect raw bytes and exit code
//! 2. [`decode`]  : lossy UTF-8, so later stages always see valid text
//! 3. [`recover`] : strict JSON object parse with trailing-object salvage
//! 4. [`extract`] : streaming tag-aware tokenizer → title/headers/paragraphs
//! 5. [`render`]  : lay the extracted document out as the final text
//! 6. [`assemble`]: pick exactly one success or failure result

pub mod assemble;
pub mod decode;
pub mod extract;
pub mod invoke;
pub mod recover;
pub mod render;
