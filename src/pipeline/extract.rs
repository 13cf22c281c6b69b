//! Text extraction: markup → title, headers and grouped body paragraphs.
//!
//! Markup is fed through html5ever's streaming tokenizer, not its tree
//! builder. No DOM is built; the walker only needs to know which kind of
//! container the next text node belongs to:
//!
//! ```text
//!            <title>              </title>
//!   Neutral ─────────▶ InTitle ──────────▶ Neutral
//!      │ <h1>…<h6>                  ▲
//!      ├──────────▶ InHeader ───────┤ </hN>
//!      │ <script> <style> <iframe>  │
//!      └──────────▶ InSkipped ──────┘ matching close
//! ```
//!
//! Skipped containers nest by depth counter, so their text is dropped no
//! matter what is inside them. `<meta>` and `<link>` are void elements: text
//! directly after one (before any other tag) is dropped as well, which covers
//! feed-style `<link>url</link>` markup.
//!
//! The standalone tokenizer does not switch content models by itself, so the
//! sink does it on start tags: `<script>` body is script data, `<style>` and
//! `<iframe>` are raw text, `<title>` and `<textarea>` are RCDATA (character
//! references decoded, tags taken literally). A self-closing `<script/>`
//! opens nothing.
//!
//! Malformed input never fails: unknown tags are plain containers, unclosed
//! tags close implicitly at end of input, comments and doctypes are skipped,
//! and the tokenizer's own error recovery handles the rest.

use crate::config::ExtractOptions;
use crate::output::ExtractedDocument;
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;

/// Containers whose text never reaches the output.
const SKIPPED_CONTAINERS: [&str; 3] = ["script", "style", "iframe"];

/// Void elements whose trailing text is dropped.
const SKIPPED_VOID: [&str; 2] = ["meta", "link"];

/// Characters that end a paragraph when a fragment ends with them.
const TERMINAL_PUNCTUATION: [char; 9] = ['.', '!', '?', ':', '"', '\'', '\u{201D}', '\u{2019}', '\u{BB}'];

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Extract a structured document from `markup`.
///
/// Pure and deterministic: the same input and options always produce the
/// same document.
pub fn extract_document(markup: &str, opts: &ExtractOptions) -> ExtractedDocument {
    let sink = WalkerSink {
        inner: RefCell::new(SinkState {
            walker: Walker::new(opts),
            pending_text: String::new(),
        }),
    };
    let tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
    let input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(markup));
    // The sink never returns `Script`, so one feed consumes the whole queue.
    let _ = tokenizer.feed(&input);
    tokenizer.end();
    tokenizer.sink.inner.into_inner().walker.finish()
}

// ── Token sink ───────────────────────────────────────────────────────────

/// Content model to switch to after a start tag named `name`.
fn raw_kind(name: &str) -> Option<RawKind> {
    match name {
        "script" => Some(RawKind::ScriptData),
        "style" | "iframe" | "xmp" | "noembed" | "noframes" => Some(RawKind::Rawtext),
        "title" | "textarea" => Some(RawKind::Rcdata),
        _ => None,
    }
}

struct SinkState {
    walker: Walker,
    /// The tokenizer may split one text node into several character tokens
    /// (around references, for instance); they are joined here and handed to
    /// the walker at the next non-text token.
    pending_text: String,
}

impl SinkState {
    fn flush_text(&mut self) {
        if !self.pending_text.is_empty() {
            let text = std::mem::take(&mut self.pending_text);
            self.walker.text(&text);
        }
    }
}

struct WalkerSink {
    inner: RefCell<SinkState>,
}

impl TokenSink for WalkerSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let mut state = self.inner.borrow_mut();
        match token {
            Token::CharacterTokens(text) => state.pending_text.push_str(&text),
            Token::NullCharacterToken | Token::ParseError(_) => {}
            Token::TagToken(Tag {
                kind,
                name,
                self_closing,
                ..
            }) => {
                state.flush_text();
                let name: &str = &name;
                match kind {
                    TagKind::StartTag => {
                        state.walker.start_tag(name, self_closing);
                        if !self_closing {
                            if let Some(kind) = raw_kind(name) {
                                return TokenSinkResult::RawData(kind);
                            }
                        }
                    }
                    TagKind::EndTag => state.walker.end_tag(name),
                }
            }
            _ => state.flush_text(),
        }
        TokenSinkResult::Continue
    }
}

// ── Walker (state machine) ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Title,
    Header,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Neutral,
    InTitle,
    InHeader,
    InSkipped,
}

struct Walker {
    skip_depth: usize,
    after_void_skip: bool,
    containers: Vec<Container>,
    title: Option<String>,
    headers: Vec<String>,
    body: ParagraphGrouper,
}

impl Walker {
    fn new(opts: &ExtractOptions) -> Self {
        Self {
            skip_depth: 0,
            after_void_skip: false,
            containers: Vec::new(),
            title: None,
            headers: Vec::new(),
            body: ParagraphGrouper::new(opts),
        }
    }

    fn state(&self) -> State {
        if self.skip_depth > 0 || self.after_void_skip {
            return State::InSkipped;
        }
        match self.containers.last() {
            Some(Container::Title) => State::InTitle,
            Some(Container::Header) => State::InHeader,
            None => State::Neutral,
        }
    }

    fn start_tag(&mut self, name: &str, self_closing: bool) {
        self.after_void_skip = false;
        if self_closing {
            return;
        }
        if SKIPPED_CONTAINERS.contains(&name) {
            self.skip_depth += 1;
        } else if SKIPPED_VOID.contains(&name) {
            self.after_void_skip = true;
        } else if let Some(kind) = container_kind(name) {
            self.containers.push(kind);
        }
    }

    fn end_tag(&mut self, name: &str) {
        self.after_void_skip = false;
        if SKIPPED_CONTAINERS.contains(&name) {
            self.skip_depth = self.skip_depth.saturating_sub(1);
        } else if let Some(kind) = container_kind(name) {
            if let Some(pos) = self.containers.iter().rposition(|c| *c == kind) {
                self.containers.truncate(pos);
            }
        }
    }

    fn text(&mut self, raw: &str) {
        let state = self.state();
        if state == State::InSkipped {
            return;
        }
        let Some(text) = normalize_text(raw) else {
            return;
        };
        match state {
            State::InTitle => {
                if self.title.is_none() {
                    self.title = Some(text);
                }
            }
            State::InHeader => self.headers.push(text),
            State::Neutral => self.body.push(text),
            State::InSkipped => {}
        }
    }

    fn finish(self) -> ExtractedDocument {
        ExtractedDocument {
            title: self.title.unwrap_or_default(),
            headers: self.headers,
            body_paragraphs: self.body.finish(),
        }
    }
}

fn container_kind(name: &str) -> Option<Container> {
    match name {
        "title" => Some(Container::Title),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Some(Container::Header),
        _ => None,
    }
}

/// Collapse whitespace runs and trim. `None` for whitespace-only nodes.
fn normalize_text(raw: &str) -> Option<String> {
    let collapsed = RE_WHITESPACE.replace_all(raw, " ");
    let trimmed = collapsed.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ── Paragraph grouping ───────────────────────────────────────────────────

/// Accumulates body fragments into paragraphs.
///
/// - A run of two or more consecutive short fragments is dropped; a single
///   short fragment between longer ones is kept.
/// - Fragments join the running buffer until one ends in terminal
///   punctuation or is longer than the maximum, which emits the buffer as
///   one paragraph.
struct ParagraphGrouper {
    min_chars: usize,
    max_chars: usize,
    buffer: Vec<String>,
    pending_short: Option<String>,
    in_short_run: bool,
    paragraphs: Vec<String>,
}

impl ParagraphGrouper {
    fn new(opts: &ExtractOptions) -> Self {
        Self {
            min_chars: opts.min_fragment_chars,
            max_chars: opts.max_fragment_chars,
            buffer: Vec::new(),
            pending_short: None,
            in_short_run: false,
            paragraphs: Vec::new(),
        }
    }

    fn push(&mut self, fragment: String) {
        if fragment.chars().count() < self.min_chars {
            if self.pending_short.take().is_some() {
                self.in_short_run = true;
            } else if !self.in_short_run {
                self.pending_short = Some(fragment);
            }
            return;
        }

        self.in_short_run = false;
        if let Some(short) = self.pending_short.take() {
            self.accept(short);
        }
        self.accept(fragment);
    }

    fn accept(&mut self, fragment: String) {
        let closes = fragment.ends_with(TERMINAL_PUNCTUATION)
            || fragment.chars().count() > self.max_chars;
        self.buffer.push(fragment);
        if closes {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            self.paragraphs.push(self.buffer.join(" "));
            self.buffer.clear();
        }
    }

    fn finish(mut self) -> Vec<String> {
        if let Some(short) = self.pending_short.take() {
            self.accept(short);
        }
        self.flush();
        self.paragraphs
    }
}
