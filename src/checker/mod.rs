pub mod annotation;
pub mod counters;
pub mod fallback;
pub mod matcher;
pub mod normalize;
pub mod statistics;

pub use annotation::{render, Annotation, Rendered, Segment};
pub use counters::TextCounters;
pub use fallback::render_fallback;
pub use normalize::normalize;
pub use statistics::{aggregate, PartialStatistics, Statistics};

use crate::service::{CorrectionResponse, CorrectionService, ServiceError};
use crate::{Config, CorrectionRecord};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("please enter some text to check")]
    EmptyText,
    #[error("please enter Arabic text")]
    NotArabic,
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Everything the display layer needs from one correction pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    pub original_text: String,
    pub corrected_text: String,
    pub annotation: Annotation,
    /// True when the original words could not be located and the
    /// annotation highlights the corrected text instead.
    pub used_fallback: bool,
    pub corrections: Vec<CorrectionRecord>,
    pub statistics: Statistics,
}

impl CheckOutcome {
    pub fn has_corrections(&self) -> bool {
        !self.corrections.is_empty()
    }
}

pub struct Checker {
    require_arabic: bool,
}

impl Checker {
    pub fn new(config: &Config) -> Self {
        Self {
            require_arabic: config.require_arabic,
        }
    }

    /// Reject text that is not worth a round trip.
    pub fn validate(&self, text: &str) -> Result<(), CheckError> {
        if text.trim().is_empty() {
            return Err(CheckError::EmptyText);
        }
        if self.require_arabic && !matcher::contains_arabic(text) {
            return Err(CheckError::NotArabic);
        }
        Ok(())
    }

    /// Run one full pass against `service`.
    pub fn check<S>(&self, service: &S, text: &str) -> Result<CheckOutcome, CheckError>
    where
        S: CorrectionService + ?Sized,
    {
        self.validate(text)?;
        let response = service.correct(text.trim())?;
        Ok(self.outcome(text.trim(), response))
    }

    /// Turn a service response into an annotated outcome.
    pub fn outcome(&self, original: &str, response: CorrectionResponse) -> CheckOutcome {
        let corrections = normalize(&response.corrections);

        let mut server_stats = response.statistics.unwrap_or_default();
        if server_stats.total_words.is_none() {
            server_stats.total_words = Some(TextCounters::of(original).arabic_words as u64);
        }
        let statistics = aggregate(&server_stats, &corrections);

        if corrections.is_empty() {
            return CheckOutcome {
                original_text: original.to_string(),
                annotation: Annotation::plain(&response.corrected_text),
                corrected_text: response.corrected_text,
                used_fallback: false,
                corrections,
                statistics,
            };
        }

        let Rendered {
            annotation,
            changed,
        } = render(original, &corrections);

        let (annotation, used_fallback) = if changed {
            (annotation, false)
        } else {
            tracing::debug!("falling back to corrected-text highlighting");
            (render_fallback(&response.corrected_text, &corrections), true)
        };

        CheckOutcome {
            original_text: original.to_string(),
            corrected_text: response.corrected_text,
            annotation,
            used_fallback,
            corrections,
            statistics,
        }
    }
}

/// Put the leading and trailing whitespace of `input` back around
/// `corrected`, which the service computed from the trimmed text.
pub fn restore_edges(input: &str, corrected: &str) -> String {
    let trimmed_start = input.trim_start();
    let leading = &input[..input.len() - trimmed_start.len()];
    let trailing = &trimmed_start[trimmed_start.trim_end().len()..];
    format!("{}{}{}", leading, corrected.trim(), trailing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Checker {
        Checker {
            require_arabic: true,
        }
    }

    #[test]
    fn test_outcome_for_scenario() {
        let response = CorrectionResponse {
            corrected_text: "هذا نص به خطأ".to_string(),
            corrections: vec![CorrectionRecord::new("خطاء", "خطأ").at(3)],
            statistics: None,
        };

        let outcome = checker().outcome("هذا نص به خطاء", response);

        assert!(!outcome.used_fallback);
        assert_eq!(outcome.annotation.corrected_text(), outcome.corrected_text);
        assert_eq!(outcome.statistics.total_words, 4);
        assert_eq!(outcome.statistics.errors_found, 1);
    }

    #[test]
    fn test_outcome_without_corrections_shows_corrected_text() {
        let response = CorrectionResponse {
            corrected_text: "نص سليم".to_string(),
            corrections: vec![CorrectionRecord::new("نص", "نص")],
            statistics: None,
        };

        let outcome = checker().outcome("نص  سليم", response);
        assert_eq!(outcome.annotation, Annotation::plain("نص سليم"));
        assert!(!outcome.has_corrections());
        assert_eq!(outcome.statistics.accuracy_percentage, 100.0);
    }

    #[test]
    fn test_outcome_falls_back_when_nothing_matches() {
        let response = CorrectionResponse {
            corrected_text: "B".to_string(),
            corrections: vec![CorrectionRecord::new("X", "B")],
            statistics: None,
        };

        let outcome = checker().outcome("A", response);
        assert!(outcome.used_fallback);
        assert_eq!(outcome.annotation.correction_count(), 1);
    }

    #[test]
    fn test_restore_edges_keeps_surrounding_whitespace() {
        assert_eq!(
            restore_edges("هذا نص به خطاء\n", "هذا نص به خطأ"),
            "هذا نص به خطأ\n"
        );
        assert_eq!(restore_edges("\n  نص خطاء \n\n", "نص خطأ"), "\n  نص خطأ \n\n");
        assert_eq!(restore_edges("نص", "نص"), "نص");
        assert_eq!(restore_edges("   ", ""), "   ");
    }

    #[test]
    fn test_validation() {
        assert!(matches!(checker().validate("   "), Err(CheckError::EmptyText)));
        assert!(matches!(checker().validate("hello"), Err(CheckError::NotArabic)));
        assert!(checker().validate("مرحبا").is_ok());

        let lenient = Checker {
            require_arabic: false,
        };
        assert!(lenient.validate("hello").is_ok());
    }
}
