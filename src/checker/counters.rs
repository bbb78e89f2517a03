use super::matcher;
use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

/// Live counters for the text being edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextCounters {
    /// Whitespace-separated words.
    pub words: usize,
    /// Words containing Arabic letters.
    pub arabic_words: usize,
    /// User-perceived characters.
    pub characters: usize,
}

impl TextCounters {
    pub fn of(text: &str) -> Self {
        let mut counters = Self {
            characters: text.graphemes(true).count(),
            ..Default::default()
        };
        for word in text.split_whitespace() {
            counters.words += 1;
            if matcher::contains_arabic(word) {
                counters.arabic_words += 1;
            }
        }
        counters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_words_and_characters() {
        let counters = TextCounters::of("  هذا نص  test \n");
        assert_eq!(counters.words, 3);
        assert_eq!(counters.arabic_words, 2);
        assert_eq!(counters.characters, 16);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(TextCounters::of(""), TextCounters::default());
        assert_eq!(TextCounters::of("   ").words, 0);
    }

    #[test]
    fn test_combining_marks_are_one_character() {
        assert_eq!(TextCounters::of("كَتَبَ").characters, 3);
    }
}
