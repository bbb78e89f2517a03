use crate::checker::matcher;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Definition attached to words the user confirmed as correct.
pub const CONFIRMED_DEFINITION: &str = "كلمة صحيحة مؤكدة من المستخدم";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DictionaryError {
    #[error("word is required")]
    EmptyWord,
    #[error("word must contain Arabic letters: {0}")]
    NotArabic(String),
    #[error("frequency must be a positive number")]
    InvalidFrequency,
    #[error("unknown word type: {0}")]
    UnknownWordType(String),
}

/// Part of speech accepted by the dictionary server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WordType {
    #[serde(rename = "اسم")]
    Noun,
    #[serde(rename = "فعل")]
    Verb,
    #[serde(rename = "صفة")]
    Adjective,
    #[serde(rename = "ظرف")]
    Adverb,
    #[serde(rename = "حرف جر")]
    Preposition,
    #[serde(rename = "حرف عطف")]
    Conjunction,
    #[serde(rename = "ضمير")]
    Pronoun,
    #[serde(rename = "حرف")]
    Particle,
    #[default]
    #[serde(rename = "غير محدد")]
    Unspecified,
}

impl WordType {
    pub const ALL: [WordType; 9] = [
        WordType::Noun,
        WordType::Verb,
        WordType::Adjective,
        WordType::Adverb,
        WordType::Preposition,
        WordType::Conjunction,
        WordType::Pronoun,
        WordType::Particle,
        WordType::Unspecified,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WordType::Noun => "اسم",
            WordType::Verb => "فعل",
            WordType::Adjective => "صفة",
            WordType::Adverb => "ظرف",
            WordType::Preposition => "حرف جر",
            WordType::Conjunction => "حرف عطف",
            WordType::Pronoun => "ضمير",
            WordType::Particle => "حرف",
            WordType::Unspecified => "غير محدد",
        }
    }

    fn english(&self) -> &'static str {
        match self {
            WordType::Noun => "noun",
            WordType::Verb => "verb",
            WordType::Adjective => "adjective",
            WordType::Adverb => "adverb",
            WordType::Preposition => "preposition",
            WordType::Conjunction => "conjunction",
            WordType::Pronoun => "pronoun",
            WordType::Particle => "particle",
            WordType::Unspecified => "unspecified",
        }
    }
}

impl FromStr for WordType {
    type Err = DictionaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        WordType::ALL
            .into_iter()
            .find(|t| t.label() == wanted || t.english().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DictionaryError::UnknownWordType(s.to_string()))
    }
}

impl fmt::Display for WordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A word submitted to the server's dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub word: String,
    pub word_type: WordType,
    pub frequency: u32,
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub synonyms: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
}

impl DictionaryEntry {
    pub fn new(word: impl Into<String>, word_type: WordType) -> Self {
        Self {
            word: word.into().trim().to_string(),
            word_type,
            frequency: 1,
            root: None,
            synonyms: None,
            definition: None,
        }
    }

    /// Entry for a word the user marked as correct.
    pub fn confirmed(word: impl Into<String>) -> Self {
        let mut entry = Self::new(word, WordType::Unspecified);
        entry.definition = Some(CONFIRMED_DEFINITION.to_string());
        entry
    }

    /// Same checks the server applies, so obviously bad entries never leave
    /// the client.
    pub fn validate(&self) -> Result<(), DictionaryError> {
        if self.word.trim().is_empty() {
            return Err(DictionaryError::EmptyWord);
        }
        if !matcher::contains_arabic(&self.word) {
            return Err(DictionaryError::NotArabic(self.word.clone()));
        }
        if self.frequency < 1 {
            return Err(DictionaryError::InvalidFrequency);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmed_entry_shape() {
        let entry = DictionaryEntry::confirmed(" مدرسة ");
        assert_eq!(entry.word, "مدرسة");
        assert_eq!(entry.word_type, WordType::Unspecified);
        assert_eq!(entry.frequency, 1);

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["word_type"], "غير محدد");
        assert_eq!(json["definition"], CONFIRMED_DEFINITION);
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            DictionaryEntry::new("", WordType::Noun).validate(),
            Err(DictionaryError::EmptyWord)
        );
        assert!(matches!(
            DictionaryEntry::new("school", WordType::Noun).validate(),
            Err(DictionaryError::NotArabic(_))
        ));

        let mut entry = DictionaryEntry::new("مدرسة", WordType::Noun);
        assert!(entry.validate().is_ok());
        entry.frequency = 0;
        assert_eq!(entry.validate(), Err(DictionaryError::InvalidFrequency));
    }

    #[test]
    fn test_word_type_parsing() {
        assert_eq!("فعل".parse::<WordType>(), Ok(WordType::Verb));
        assert_eq!("Noun".parse::<WordType>(), Ok(WordType::Noun));
        assert_eq!("حرف جر".parse::<WordType>(), Ok(WordType::Preposition));
        assert!("gerund".parse::<WordType>().is_err());
    }
}
