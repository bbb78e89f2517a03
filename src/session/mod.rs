//! The editing session: owns the text buffer, the latest correction outcome
//! and, when enabled, the suggestion-panel controller.
//!
//! Everything here is plain data. Output is produced by projecting the
//! session's [`CheckOutcome`] (see `cli::output`), so the session can be
//! driven headless in tests.

pub mod controller;
pub mod debounce;
pub mod sequence;

pub use controller::{EditError, EditState, PendingEdit, ReapplicationController};
pub use debounce::Debouncer;
pub use sequence::{RequestSequencer, RequestTicket};

use crate::checker::{matcher, CheckError, CheckOutcome, Checker, TextCounters};
use crate::dict::entry::{DictionaryEntry, DictionaryError};
use crate::dict::ignored::IgnoredWords;
use crate::service::{
    CorrectionResponse, CorrectionService, Level, Notifier, ServiceError, UpsertAck,
};
use crate::{Position, TextBuffer};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Check(#[from] CheckError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("dictionary update rejected: {0}")]
    Rejected(String),
    #[error("editing is not enabled for this session")]
    EditingDisabled,
    #[error("a newer check superseded this one")]
    Superseded,
    #[error("could not save ignored word: {0}")]
    Persist(String),
}

/// Optional behaviour chosen when the session is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Enables the suggestion panel and splicing edits back into the text.
    pub editing: bool,
}

/// A correction pass that has been issued but not yet applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecheckRequest {
    pub ticket: RequestTicket,
    /// Version of the buffer `text` was taken from.
    pub buffer_version: u64,
    pub text: String,
}

pub struct Session<S, N> {
    service: S,
    notifier: N,
    checker: Checker,
    ignored: IgnoredWords,
    buffer: TextBuffer,
    outcome: Option<CheckOutcome>,
    sequencer: RequestSequencer,
    editor: Option<ReapplicationController>,
    max_suggestions: usize,
}

impl<S, N> Session<S, N>
where
    S: CorrectionService,
    N: Notifier,
{
    pub fn new(
        service: S,
        notifier: N,
        checker: Checker,
        ignored: IgnoredWords,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            service,
            notifier,
            checker,
            ignored,
            buffer: TextBuffer::default(),
            outcome: None,
            sequencer: RequestSequencer::new(),
            editor: capabilities.editing.then(ReapplicationController::new),
            max_suggestions: usize::MAX,
        }
    }

    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn counters(&self) -> TextCounters {
        TextCounters::of(self.buffer.text())
    }

    /// Outcome of the latest applied pass, if it still matches the buffer.
    pub fn outcome(&self) -> Option<&CheckOutcome> {
        self.outcome.as_ref()
    }

    pub fn ignored(&self) -> &IgnoredWords {
        &self.ignored
    }

    pub fn pending(&self) -> Option<&PendingEdit> {
        self.editor.as_ref().and_then(|editor| editor.pending())
    }

    /// Replace the text wholesale, as when the user types.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = self.buffer.replaced(text);
        self.outcome = None;
    }

    /// Validate the current text and issue a ticket for a new pass.
    pub fn begin_check(&self) -> Result<RecheckRequest, SessionError> {
        if let Err(e) = self.checker.validate(self.buffer.text()) {
            self.notifier.notify(&e.to_string(), Level::Warning);
            return Err(e.into());
        }
        Ok(RecheckRequest {
            ticket: self.sequencer.issue(),
            buffer_version: self.buffer.version(),
            text: self.buffer.text().to_string(),
        })
    }

    /// Apply the response to `request`, unless a newer pass was issued or
    /// the text changed since `request` was taken.
    ///
    /// Returns `Ok(None)` for a superseded response. A failed call leaves the
    /// previous outcome in place.
    pub fn complete_check(
        &mut self,
        request: &RecheckRequest,
        response: Result<CorrectionResponse, ServiceError>,
    ) -> Result<Option<&CheckOutcome>, SessionError> {
        if !self.sequencer.is_current(request.ticket) {
            debug!(
                ticket = request.ticket.seq(),
                latest = self.sequencer.latest(),
                "discarding stale correction response"
            );
            return Ok(None);
        }
        if request.buffer_version != self.buffer.version() {
            debug!(
                opened = request.buffer_version,
                current = self.buffer.version(),
                "discarding correction response for replaced text"
            );
            return Ok(None);
        }

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                self.notifier.notify(
                    &format!("Checking failed, please try again ({})", e),
                    Level::Error,
                );
                return Err(e.into());
            }
        };

        let outcome = self.checker.outcome(request.text.trim(), response);
        let errors = outcome.statistics.errors_found;
        if errors == 0 {
            self.notifier.notify("No spelling errors found", Level::Success);
        } else {
            self.notifier.notify(
                &format!("Found and corrected {} {}", errors, plural(errors, "error", "errors")),
                Level::Info,
            );
        }

        let outcome = self.outcome.insert(outcome);
        Ok(Some(&*outcome))
    }

    /// Run a full pass synchronously.
    pub fn check(&mut self) -> Result<&CheckOutcome, SessionError> {
        let request = self.begin_check()?;

        self.notifier.show_busy("Checking text...");
        let response = self.service.correct(request.text.trim());
        self.notifier.hide_busy();

        self.complete_check(&request, response)?
            .ok_or(SessionError::Superseded)
    }

    /// Open the suggestion panel for `word`.
    ///
    /// Without a position the first standalone occurrence in the buffer is
    /// used. Returns `Ok(None)` when the word is ignored or not in the text.
    pub fn open_suggestions(
        &mut self,
        word: &str,
        position: Option<Position>,
    ) -> Result<Option<&PendingEdit>, SessionError> {
        if self.editor.is_none() {
            return Err(SessionError::EditingDisabled);
        }
        if self.ignored.contains(word) {
            debug!(word, "not opening suggestions for ignored word");
            return Ok(None);
        }

        let found = match position {
            Some(position) => matcher::find_at(self.buffer.text(), word, position),
            None => matcher::find_first(self.buffer.text(), word),
        };
        let Some(position) = found else {
            self.notifier
                .notify(&format!("'{}' is no longer in the text", word), Level::Warning);
            return Ok(None);
        };

        let mut suggestions = match self.service.suggest(word) {
            Ok(suggestions) => suggestions,
            Err(e) => {
                self.notifier
                    .notify(&format!("Could not load suggestions ({})", e), Level::Warning);
                Vec::new()
            }
        };
        suggestions.truncate(self.max_suggestions);

        let editor = self.editor.as_mut().ok_or(SessionError::EditingDisabled)?;
        editor.open(word, position, suggestions, &self.buffer);
        Ok(editor.pending())
    }

    /// Splice `new_word` into the text and issue the follow-up pass.
    pub fn choose(&mut self, new_word: &str) -> Result<RecheckRequest, SessionError> {
        let editor = self.editor.as_mut().ok_or(SessionError::EditingDisabled)?;
        let word = editor.pending().map(|pending| pending.word.clone());

        match editor.choose(&self.buffer, new_word) {
            Ok(buffer) => {
                self.buffer = buffer;
                self.outcome = None;
                self.notifier.notify(
                    &format!("Applied: {} → {}", word.unwrap_or_default(), new_word),
                    Level::Success,
                );
                self.begin_check()
            }
            Err(e) => {
                if e.is_out_of_range() {
                    self.notifier
                        .notify("The text changed, please re-check", Level::Warning);
                }
                Err(e.into())
            }
        }
    }

    /// Choose `new_word` and run the follow-up pass right away.
    pub fn choose_and_recheck(&mut self, new_word: &str) -> Result<&CheckOutcome, SessionError> {
        let request = self.choose(new_word)?;

        self.notifier.show_busy("Checking text...");
        let response = self.service.correct(request.text.trim());
        self.notifier.hide_busy();

        self.complete_check(&request, response)?
            .ok_or(SessionError::Superseded)
    }

    /// Close the panel without changing anything.
    pub fn dismiss(&mut self) -> Result<Option<PendingEdit>, SessionError> {
        let editor = self.editor.as_mut().ok_or(SessionError::EditingDisabled)?;
        Ok(editor.dismiss())
    }

    /// Close the panel and never offer suggestions for this word again.
    pub fn ignore(&mut self) -> Result<Option<String>, SessionError> {
        let Some(pending) = self.dismiss()? else {
            return Ok(None);
        };

        self.ignored
            .add(&pending.word)
            .map_err(|e| SessionError::Persist(format!("{:#}", e)))?;
        self.notifier
            .notify(&format!("Ignoring '{}'", pending.word), Level::Info);
        Ok(Some(pending.word))
    }

    /// Close the panel and add the word to the dictionary as correct.
    pub fn mark_correct(&mut self) -> Result<Option<UpsertAck>, SessionError> {
        let editor = self.editor.as_mut().ok_or(SessionError::EditingDisabled)?;
        let Some(entry) = editor.mark_correct() else {
            return Ok(None);
        };
        self.add_dictionary_word(&entry).map(Some)
    }

    /// Send `entry` to the service's dictionary.
    pub fn add_dictionary_word(&self, entry: &DictionaryEntry) -> Result<UpsertAck, SessionError> {
        if let Err(e) = entry.validate() {
            self.notifier.notify(&e.to_string(), Level::Warning);
            return Err(e.into());
        }

        self.notifier.show_busy("Adding word to dictionary...");
        let result = self.service.upsert_dictionary_word(entry);
        self.notifier.hide_busy();

        match result {
            Ok(ack) if ack.success => {
                let message = ack
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("Added '{}' to the dictionary", entry.word));
                self.notifier.notify(&message, Level::Success);
                Ok(ack)
            }
            Ok(ack) => {
                let reason = ack.error.unwrap_or_else(|| "unknown error".to_string());
                self.notifier.notify(&reason, Level::Error);
                Err(SessionError::Rejected(reason))
            }
            Err(e) => {
                self.notifier
                    .notify(&format!("Could not reach the dictionary ({})", e), Level::Error);
                Err(e.into())
            }
        }
    }
}

fn plural<'a>(n: u64, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}
