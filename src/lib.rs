pub mod checker;
pub mod cli;
pub mod config;
pub mod dict;
pub mod service;
pub mod session;

pub use checker::{CheckOutcome, Checker};
pub use config::Config;
pub use session::Session;

use serde::{Deserialize, Serialize};

/// Half-open byte range `[start, end)` into one version of a text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub start: usize,
    pub end: usize,
}

impl Position {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn overlaps(&self, other: &Position) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True if the range can be sliced out of `text` without panicking.
    pub fn fits(&self, text: &str) -> bool {
        self.start <= self.end
            && self.end <= text.len()
            && text.is_char_boundary(self.start)
            && text.is_char_boundary(self.end)
    }
}

/// Immutable snapshot of the user's text.
///
/// Edits never mutate a buffer; they produce a new one with a bumped
/// version, so positions taken from an older version can be detected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextBuffer {
    text: String,
    version: u64,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            version: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Next version of this buffer holding `text`.
    pub fn replaced(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            version: self.version + 1,
        }
    }
}

/// One word-level correction as reported by the correction service.
///
/// `position` is an ordering hint computed by the server against the text
/// it received; it may be missing or stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionRecord {
    pub original: String,
    pub corrected: String,
    #[serde(default)]
    pub position: Option<i64>,
}

impl CorrectionRecord {
    pub fn new(original: impl Into<String>, corrected: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            corrected: corrected.into(),
            position: None,
        }
    }

    pub fn at(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }
}
