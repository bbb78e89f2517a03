//! Annotated view of a corrected text.
//!
//! An [`Annotation`] is a flat list of segments. Segments built by the
//! renderers alternate plain/correction and always begin and end with a plain
//! segment, which may be empty.

use super::matcher;
use crate::{CorrectionRecord, Position};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Plain {
        text: String,
    },
    Correction {
        /// Empty when the original word could not be located.
        original: String,
        corrected: String,
        tooltip: String,
    },
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Segment::Plain { text: text.into() }
    }

    pub fn correction(original: impl Into<String>, corrected: impl Into<String>) -> Self {
        let original = original.into();
        let corrected = corrected.into();
        let tooltip = if original.is_empty() {
            format!("→ {}", corrected)
        } else {
            format!("{} → {}", original, corrected)
        };
        Segment::Correction {
            original,
            corrected,
            tooltip,
        }
    }

    pub fn is_correction(&self) -> bool {
        matches!(self, Segment::Correction { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Annotation {
    segments: Vec<Segment>,
}

impl Annotation {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// A single plain segment holding `text`.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(vec![Segment::plain(text)])
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn corrections(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_correction())
    }

    pub fn correction_count(&self) -> usize {
        self.corrections().count()
    }

    /// Plain text with every correction's original word. Corrections whose
    /// original is unknown contribute nothing.
    pub fn original_text(&self) -> String {
        self.project(|original, _| original)
    }

    /// Plain text with every correction's corrected word.
    pub fn corrected_text(&self) -> String {
        self.project(|_, corrected| corrected)
    }

    fn project<'a>(&'a self, pick: impl Fn(&'a str, &'a str) -> &'a str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Plain { text } => out.push_str(text),
                Segment::Correction {
                    original,
                    corrected,
                    ..
                } => out.push_str(pick(original.as_str(), corrected.as_str())),
            }
        }
        out
    }
}

/// Result of rendering against the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub annotation: Annotation,
    /// False when no record matched anywhere; the caller should fall back.
    pub changed: bool,
}

/// Lay corrections over `original`.
///
/// `records` must already be normalized. Every boundary match of each
/// record's original word becomes a correction segment unless an earlier
/// record already claimed an overlapping span. Matching always runs on the
/// untouched original text, so offsets never shift during the pass.
pub fn render(original: &str, records: &[CorrectionRecord]) -> Rendered {
    let mut claimed: Vec<(Position, usize)> = Vec::new();

    for (index, record) in records.iter().enumerate() {
        for range in matcher::find_all(original, &record.original) {
            if claimed.iter().any(|(taken, _)| taken.overlaps(&range)) {
                continue;
            }
            claimed.push((range, index));
        }
    }

    if claimed.is_empty() {
        if !records.is_empty() {
            tracing::debug!(records = records.len(), "no correction matched the original text");
        }
        return Rendered {
            annotation: Annotation::plain(original),
            changed: false,
        };
    }

    claimed.sort_by_key(|(range, _)| range.start);

    let spans = claimed.iter().map(|(range, index)| {
        let record = &records[*index];
        (*range, Segment::correction(&record.original, &record.corrected))
    });

    Rendered {
        annotation: splice_segments(original, spans),
        changed: true,
    }
}

/// Interleave `text` with correction segments at the given sorted,
/// non-overlapping ranges.
pub(crate) fn splice_segments(
    text: &str,
    spans: impl IntoIterator<Item = (Position, Segment)>,
) -> Annotation {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for (range, segment) in spans {
        segments.push(Segment::plain(&text[cursor..range.start]));
        segments.push(segment);
        cursor = range.end;
    }
    segments.push(Segment::plain(&text[cursor..]));

    Annotation::new(segments)
}
