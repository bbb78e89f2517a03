//! Suggestion-panel state: at most one pending edit, spliced back at the
//! offset it was opened with.

use crate::dict::entry::DictionaryEntry;
use crate::service::Suggestion;
use crate::{Position, TextBuffer};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("no suggestion panel is open")]
    NoPendingEdit,
    #[error("the text changed, please re-check (range {start}..{end} no longer fits a buffer of {len} bytes)")]
    OutOfRange { start: usize, end: usize, len: usize },
    #[error("the text changed, please re-check (opened on version {opened}, buffer is at {current})")]
    StaleBuffer { opened: u64, current: u64 },
}

impl EditError {
    /// True for the failures caused by the text moving under an open panel.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, EditError::OutOfRange { .. } | EditError::StaleBuffer { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingEdit {
    pub word: String,
    pub position: Position,
    pub suggestions: Vec<Suggestion>,
    pub buffer_version: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Editing(PendingEdit),
}

#[derive(Debug, Default)]
pub struct ReapplicationController {
    state: EditState,
}

impl ReapplicationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn pending(&self) -> Option<&PendingEdit> {
        match &self.state {
            EditState::Editing(pending) => Some(pending),
            EditState::Idle => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.pending().is_some()
    }

    /// Start editing `word` at `position`. Replaces any open edit.
    pub fn open(
        &mut self,
        word: impl Into<String>,
        position: Position,
        suggestions: Vec<Suggestion>,
        buffer: &TextBuffer,
    ) {
        if let Some(previous) = self.pending() {
            tracing::debug!(word = %previous.word, "discarding unconfirmed edit");
        }
        self.state = EditState::Editing(PendingEdit {
            word: word.into(),
            position,
            suggestions,
            buffer_version: buffer.version(),
        });
    }

    /// Splice `new_word` over the pending position and return the new buffer.
    ///
    /// The pending edit is consumed whether or not the splice succeeds; on
    /// failure `buffer` is left as it was.
    pub fn choose(&mut self, buffer: &TextBuffer, new_word: &str) -> Result<TextBuffer, EditError> {
        let pending = match std::mem::take(&mut self.state) {
            EditState::Editing(pending) => pending,
            EditState::Idle => return Err(EditError::NoPendingEdit),
        };

        let range = pending.position;
        if !range.fits(buffer.text()) {
            return Err(EditError::OutOfRange {
                start: range.start,
                end: range.end,
                len: buffer.len(),
            });
        }
        if pending.buffer_version != buffer.version() {
            return Err(EditError::StaleBuffer {
                opened: pending.buffer_version,
                current: buffer.version(),
            });
        }

        let text = buffer.text();
        let mut spliced = String::with_capacity(text.len() - range.len() + new_word.len());
        spliced.push_str(&text[..range.start]);
        spliced.push_str(new_word);
        spliced.push_str(&text[range.end..]);

        Ok(buffer.replaced(spliced))
    }

    /// Close the panel without touching the text.
    pub fn dismiss(&mut self) -> Option<PendingEdit> {
        match std::mem::take(&mut self.state) {
            EditState::Editing(pending) => Some(pending),
            EditState::Idle => None,
        }
    }

    /// Close the panel and produce the dictionary entry confirming the word.
    pub fn mark_correct(&mut self) -> Option<DictionaryEntry> {
        self.dismiss().map(|pending| DictionaryEntry::confirmed(pending.word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::matcher;

    #[test]
    fn test_choose_splices_at_pending_position() {
        let buffer = TextBuffer::new("خطاء ثم خطاء");
        let second = matcher::find_all(buffer.text(), "خطاء")[1];

        let mut controller = ReapplicationController::new();
        controller.open("خطاء", second, vec![Suggestion::new("خطأ")], &buffer);

        let next = controller.choose(&buffer, "خطأ").unwrap();
        assert_eq!(next.text(), "خطاء ثم خطأ");
        assert_eq!(next.version(), buffer.version() + 1);
        assert_eq!(controller.state(), &EditState::Idle);
    }

    #[test]
    fn test_stale_offset_is_rejected() {
        let buffer = TextBuffer::new("0123456789");
        let mut controller = ReapplicationController::new();
        controller.open("89", Position::new(8, 12), Vec::new(), &buffer);

        let err = controller.choose(&buffer, "x").unwrap_err();
        assert_eq!(err, EditError::OutOfRange { start: 8, end: 12, len: 10 });
        assert!(err.is_out_of_range());
        assert_eq!(buffer.text(), "0123456789");
        assert!(!controller.is_editing());
    }

    #[test]
    fn test_split_character_is_out_of_range() {
        let buffer = TextBuffer::new("خطاء");
        let mut controller = ReapplicationController::new();
        controller.open("خطاء", Position::new(1, 4), Vec::new(), &buffer);

        assert!(controller.choose(&buffer, "خطأ").unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_newer_buffer_is_rejected() {
        let buffer = TextBuffer::new("هذا نص");
        let mut controller = ReapplicationController::new();
        controller.open("نص", Position::new(7, 11), Vec::new(), &buffer);

        let edited = buffer.replaced("هذا نص!");
        assert_eq!(
            controller.choose(&edited, "النص"),
            Err(EditError::StaleBuffer { opened: 0, current: 1 })
        );
    }

    #[test]
    fn test_open_overwrites_previous_edit() {
        let buffer = TextBuffer::new("انا هنا");
        let mut controller = ReapplicationController::new();
        controller.open("انا", Position::new(0, 6), Vec::new(), &buffer);
        controller.open("هنا", Position::new(7, 13), Vec::new(), &buffer);

        assert_eq!(controller.pending().unwrap().word, "هنا");
        assert_eq!(controller.choose(&buffer, "هناك").unwrap().text(), "انا هناك");
    }

    #[test]
    fn test_choose_while_idle() {
        let mut controller = ReapplicationController::new();
        assert_eq!(
            controller.choose(&TextBuffer::new("نص"), "x"),
            Err(EditError::NoPendingEdit)
        );
    }

    #[test]
    fn test_dismiss_and_mark_correct_leave_text_alone() {
        let buffer = TextBuffer::new("مدرسه");
        let mut controller = ReapplicationController::new();

        controller.open("مدرسه", Position::new(0, buffer.len()), Vec::new(), &buffer);
        assert!(controller.dismiss().is_some());
        assert!(controller.dismiss().is_none());

        controller.open("مدرسه", Position::new(0, buffer.len()), Vec::new(), &buffer);
        let entry = controller.mark_correct().unwrap();
        assert_eq!(entry.word, "مدرسه");
        assert!(!controller.is_editing());
        assert_eq!(buffer.text(), "مدرسه");
    }
}
