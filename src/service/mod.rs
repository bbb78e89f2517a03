//! Collaborators the engine talks to: the remote correction service and
//! the user-feedback sink.

pub mod http;
pub mod notify;

pub use http::HttpCorrectionService;
pub use notify::{ConsoleNotifier, Level, Notifier, SilentNotifier};

use crate::checker::statistics::PartialStatistics;
use crate::dict::entry::DictionaryEntry;
use crate::CorrectionRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label shown for suggestions the server did not rank.
pub const DEFAULT_SUGGESTION_LABEL: &str = "متوسط";

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("correction service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("correction service returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("correction service rejected the request: {0}")]
    Rejected(String),
    #[error("unexpected response from correction service: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Outcome of one `correct` call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CorrectionResponse {
    pub corrected_text: String,
    #[serde(default)]
    pub corrections: Vec<CorrectionRecord>,
    #[serde(default)]
    pub statistics: Option<PartialStatistics>,
}

/// One alternative spelling, in server order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireSuggestion")]
pub struct Suggestion {
    pub word: String,
    pub label: Option<String>,
}

impl Suggestion {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            label: None,
        }
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(DEFAULT_SUGGESTION_LABEL)
    }
}

// Servers label suggestions with `label`, `frequency` or `confidence`, as a
// number or a string. The first one present wins.
#[derive(Deserialize)]
struct WireSuggestion {
    word: String,
    #[serde(default)]
    label: Option<serde_json::Value>,
    #[serde(default)]
    frequency: Option<serde_json::Value>,
    #[serde(default)]
    confidence: Option<serde_json::Value>,
}

impl From<WireSuggestion> for Suggestion {
    fn from(wire: WireSuggestion) -> Self {
        let label = [wire.label, wire.frequency, wire.confidence]
            .into_iter()
            .flatten()
            .find_map(label_text);
        Self {
            word: wire.word,
            label,
        }
    }
}

fn label_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertAck {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The remote checker. Calls block; callers that need concurrency run them
/// on a blocking pool.
pub trait CorrectionService {
    fn correct(&self, text: &str) -> Result<CorrectionResponse, ServiceError>;

    fn suggest(&self, word: &str) -> Result<Vec<Suggestion>, ServiceError>;

    fn upsert_dictionary_word(&self, entry: &DictionaryEntry) -> Result<UpsertAck, ServiceError>;
}

impl<T: CorrectionService + ?Sized> CorrectionService for std::sync::Arc<T> {
    fn correct(&self, text: &str) -> Result<CorrectionResponse, ServiceError> {
        (**self).correct(text)
    }

    fn suggest(&self, word: &str) -> Result<Vec<Suggestion>, ServiceError> {
        (**self).suggest(word)
    }

    fn upsert_dictionary_word(&self, entry: &DictionaryEntry) -> Result<UpsertAck, ServiceError> {
        (**self).upsert_dictionary_word(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_label_accepts_numbers() {
        let suggestions: Vec<Suggestion> = serde_json::from_str(
            r#"[{"word": "خطأ", "frequency": 12}, {"word": "خطا", "confidence": 0.8}, {"word": "خط"}]"#,
        )
        .unwrap();

        assert_eq!(suggestions[0].display_label(), "12");
        assert_eq!(suggestions[1].display_label(), "0.8");
        assert_eq!(suggestions[2].display_label(), DEFAULT_SUGGESTION_LABEL);
    }

    #[test]
    fn test_suggestion_with_several_label_keys() {
        let suggestion: Suggestion = serde_json::from_str(
            r#"{"word": "خطأ", "frequency": 12, "confidence": 0.8}"#,
        )
        .unwrap();
        assert_eq!(suggestion.display_label(), "12");

        let suggestion: Suggestion =
            serde_json::from_str(r#"{"word": "خطأ", "frequency": null, "confidence": "عالي"}"#)
                .unwrap();
        assert_eq!(suggestion.display_label(), "عالي");
    }

    #[test]
    fn test_correction_response_tolerates_missing_fields() {
        let response: CorrectionResponse =
            serde_json::from_str(r#"{"corrected_text": "نص"}"#).unwrap();
        assert!(response.corrections.is_empty());
        assert!(response.statistics.is_none());
    }
}
