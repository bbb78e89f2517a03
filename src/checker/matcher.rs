//! Literal word matching with script-aware word boundaries.
//!
//! The `regex` crate's `\b` is Unicode-aware but has no notion of Arabic
//! punctuation and cannot be combined with look-behind, so boundaries are
//! checked here against an explicit word-constituent class instead.

use crate::Position;
use regex::Regex;
use unicode_segmentation::{GraphemeCursor, UnicodeSegmentation};

/// Arabic-block characters that separate words rather than belong to them.
const ARABIC_PUNCTUATION: &[char] = &[
    '\u{060C}', // comma
    '\u{060D}', // date separator
    '\u{061B}', // semicolon
    '\u{061E}', // triple dot
    '\u{061F}', // question mark
    '\u{066A}', // percent
    '\u{066B}', // decimal separator
    '\u{066C}', // thousands separator
    '\u{066D}', // five pointed star
    '\u{06D4}', // full stop
    '\u{FD3E}', // ornate left parenthesis
    '\u{FD3F}', // ornate right parenthesis
];

pub fn is_arabic(ch: char) -> bool {
    matches!(
        ch,
        '\u{0600}'..='\u{06FF}'
            | '\u{0750}'..='\u{077F}'
            | '\u{08A0}'..='\u{08FF}'
            | '\u{FB50}'..='\u{FDFF}'
            | '\u{FE70}'..='\u{FEFF}'
    )
}

/// Characters that make up a word. Tatweel and harakat count, Arabic
/// punctuation does not.
pub fn is_word_char(ch: char) -> bool {
    if is_arabic(ch) {
        return !ARABIC_PUNCTUATION.contains(&ch);
    }
    ch.is_alphanumeric() || ch == '_'
}

/// True if `text` contains at least one Arabic letter.
pub fn contains_arabic(text: &str) -> bool {
    text.chars().any(|c| is_arabic(c) && is_word_char(c))
}

/// Escape `word` so the regex engine treats it as a literal.
pub fn escape_literal(word: &str) -> String {
    regex::escape(word)
}

/// True if `range` in `text` is not glued to a word character on either side.
///
/// Neighbours are compared grapheme by grapheme, so a combining mark never
/// separates a letter from the rest of its word.
pub fn is_on_boundary(text: &str, range: Position) -> bool {
    if !is_grapheme_boundary(text, range.start) || !is_grapheme_boundary(text, range.end) {
        return false;
    }
    let before = text[..range.start].graphemes(true).next_back();
    let after = text[range.end..].graphemes(true).next();
    !before.is_some_and(has_word_char) && !after.is_some_and(has_word_char)
}

fn has_word_char(grapheme: &str) -> bool {
    grapheme.chars().any(is_word_char)
}

fn is_grapheme_boundary(text: &str, offset: usize) -> bool {
    GraphemeCursor::new(offset, text.len(), true)
        .is_boundary(text, 0)
        .unwrap_or(true)
}

/// All non-overlapping, boundary-respecting occurrences of `word`, leftmost first.
pub fn find_all(text: &str, word: &str) -> Vec<Position> {
    let Some(pattern) = compile(word) else {
        return Vec::new();
    };

    let mut found = Vec::new();
    let mut from = 0;

    // A rejected candidate only advances by one character, so a valid match
    // that starts inside it (e.g. "aa" in "aaa") is still found.
    while from <= text.len() {
        let Some(m) = pattern.find_at(text, from) else {
            break;
        };
        let range = Position::new(m.start(), m.end());
        if is_on_boundary(text, range) {
            found.push(range);
            from = m.end();
        } else {
            from = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
        }
    }

    found
}

/// First boundary-respecting occurrence of `word`.
pub fn find_first(text: &str, word: &str) -> Option<Position> {
    find_all(text, word).into_iter().next()
}

/// `Some(position)` if `word` sits exactly at `position` in `text`.
pub fn find_at(text: &str, word: &str, position: Position) -> Option<Position> {
    if !position.fits(text) || &text[position.start..position.end] != word {
        return None;
    }
    is_on_boundary(text, position).then_some(position)
}

fn compile(word: &str) -> Option<Regex> {
    if word.is_empty() {
        return None;
    }
    match Regex::new(&escape_literal(word)) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(word, error = %e, "could not compile literal pattern");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arabic_word_boundaries() {
        let text = "كتاب الكتابة";
        let found = find_all(text, "كتاب");
        assert_eq!(found, vec![Position::new(0, "كتاب".len())]);
    }

    #[test]
    fn test_arabic_punctuation_is_a_boundary() {
        let text = "خطاء، خطاء؟";
        assert_eq!(find_all(text, "خطاء").len(), 2);
    }

    #[test]
    fn test_harakat_are_word_characters() {
        // "كتابُ" carries a damma after the word
        assert!(find_all("كتابُ", "كتاب").is_empty());
    }

    #[test]
    fn test_combining_marks_stay_inside_words() {
        // "café" spelled with U+0301 after the "e"
        let text = "cafe\u{301} bar";
        assert!(find_all(text, "cafe").is_empty());
        assert!(find_all("cafe\u{301}x", "x").is_empty());
        assert_eq!(find_all(text, "cafe\u{301}"), vec![Position::new(0, 6)]);
        assert_eq!(find_all(text, "bar").len(), 1);
    }

    #[test]
    fn test_escape_neutralizes_metacharacters() {
        let text = "cost is $5 (approx.) not 555";
        assert_eq!(find_all(text, "(approx.)").len(), 1);
        assert!(find_all(text, "5.5").is_empty());
        assert_eq!(escape_literal("a.b*"), r"a\.b\*");
    }

    #[test]
    fn test_repeated_candidates_advance_by_character() {
        assert_eq!(find_all("aaa aa", "aa"), vec![Position::new(4, 6)]);
    }

    #[test]
    fn test_multiple_occurrences() {
        let text = "في البيت في الحديقة في";
        assert_eq!(find_all(text, "في").len(), 3);
    }

    #[test]
    fn test_find_at_requires_exact_word() {
        let text = "هذا نص";
        let nass = find_first(text, "نص").unwrap();
        assert_eq!(find_at(text, "نص", nass), Some(nass));
        assert_eq!(find_at(text, "هذا", nass), None);
        assert_eq!(find_at(text, "نص", Position::new(40, 44)), None);
    }

    #[test]
    fn test_contains_arabic() {
        assert!(contains_arabic("hello مرحبا"));
        assert!(!contains_arabic("hello ، world"));
    }
}
