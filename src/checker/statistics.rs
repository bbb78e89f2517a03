use crate::CorrectionRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Statistics as sent by the service. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialStatistics {
    #[serde(default)]
    pub total_words: Option<u64>,
    #[serde(default)]
    pub errors_found: Option<u64>,
    #[serde(default)]
    pub corrections_made: Option<u64>,
    #[serde(default, alias = "accuracy")]
    pub accuracy_percentage: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_words: u64,
    pub errors_found: u64,
    pub corrections_made: u64,
    pub accuracy_percentage: f64,
}

impl Statistics {
    /// Accuracy as shown to the user, e.g. `"92.5%"`.
    pub fn accuracy_label(&self) -> String {
        format!("{:.1}%", self.accuracy_percentage)
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "words: {}, errors: {}, corrections: {}, accuracy: {}",
            self.total_words,
            self.errors_found,
            self.corrections_made,
            self.accuracy_label()
        )
    }
}

/// Fill the gaps in the service's statistics from the correction batch.
///
/// Fields the server sent win, even when zero.
pub fn aggregate(server: &PartialStatistics, records: &[CorrectionRecord]) -> Statistics {
    let batch = records.len() as u64;
    Statistics {
        total_words: server.total_words.unwrap_or(0),
        errors_found: server.errors_found.unwrap_or(batch),
        corrections_made: server.corrections_made.unwrap_or(batch),
        accuracy_percentage: round_one_decimal(server.accuracy_percentage.unwrap_or(100.0)),
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
