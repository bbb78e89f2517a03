use super::annotation::{splice_segments, Annotation, Segment};
use super::matcher;
use crate::{CorrectionRecord, Position};
use aho_corasick::{AhoCorasick, MatchKind};
use std::cmp::Reverse;

/// Highlight corrected words in the service's corrected text.
///
/// Used when the original words could not be located. Each boundary
/// occurrence of a record's corrected word becomes a correction segment with
/// an empty original. Overlapping candidates resolve leftmost first, longer
/// first on ties.
pub fn render_fallback(corrected_text: &str, records: &[CorrectionRecord]) -> Annotation {
    let mut words: Vec<&str> = records
        .iter()
        .map(|record| record.corrected.as_str())
        .filter(|word| !word.is_empty())
        .collect();
    words.sort_unstable();
    words.dedup();

    if words.is_empty() {
        return Annotation::plain(corrected_text);
    }

    let automaton = match AhoCorasick::builder()
        .match_kind(MatchKind::Standard)
        .build(&words)
    {
        Ok(automaton) => automaton,
        Err(e) => {
            tracing::warn!(error = %e, "could not build fallback automaton");
            return Annotation::plain(corrected_text);
        }
    };

    let mut candidates: Vec<(Position, usize)> = automaton
        .find_overlapping_iter(corrected_text)
        .map(|m| (Position::new(m.start(), m.end()), m.pattern().as_usize()))
        .filter(|(range, _)| matcher::is_on_boundary(corrected_text, *range))
        .collect();
    candidates.sort_by_key(|(range, _)| (range.start, Reverse(range.len())));

    let mut chosen: Vec<(Position, usize)> = Vec::new();
    for (range, word) in candidates {
        if chosen.last().is_some_and(|(last, _)| last.overlaps(&range)) {
            continue;
        }
        chosen.push((range, word));
    }

    tracing::debug!(highlighted = chosen.len(), "rendered fallback annotation");

    splice_segments(
        corrected_text,
        chosen
            .into_iter()
            .map(|(range, word)| (range, Segment::correction("", words[word]))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::annotation::render;

    #[test]
    fn test_fallback_activation() {
        let records = vec![CorrectionRecord::new("X", "B")];
        let rendered = render("A", &records);
        assert!(!rendered.changed);

        let fallback = render_fallback("B", &records);
        assert_eq!(
            fallback.segments(),
            &[Segment::plain(""), Segment::correction("", "B"), Segment::plain("")]
        );
    }

    #[test]
    fn test_fallback_highlights_every_occurrence() {
        let records = vec![CorrectionRecord::new("انشاء", "إنشاء")];
        let fallback = render_fallback("إنشاء البيت ثم إنشاء الحديقة", &records);

        assert_eq!(fallback.correction_count(), 2);
        assert_eq!(fallback.corrected_text(), "إنشاء البيت ثم إنشاء الحديقة");
        assert_eq!(fallback.original_text(), " البيت ثم  الحديقة");
    }

    #[test]
    fn test_fallback_respects_boundaries_and_prefers_longer() {
        let records = vec![
            CorrectionRecord::new("a", "كتاب"),
            CorrectionRecord::new("b", "كتاب الله"),
        ];
        let fallback = render_fallback("الكتاب كتاب الله", &records);

        let corrected: Vec<_> = fallback
            .corrections()
            .map(|segment| match segment {
                Segment::Correction { corrected, .. } => corrected.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(corrected, vec!["كتاب الله".to_string()]);
    }

    #[test]
    fn test_fallback_without_words_is_plain() {
        let records = vec![CorrectionRecord::new("زائد", "")];
        assert_eq!(render_fallback("نص", &records), Annotation::plain("نص"));
    }
}
