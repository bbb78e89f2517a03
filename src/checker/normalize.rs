use crate::CorrectionRecord;
use std::cmp::Reverse;

/// Filter and order a batch of correction records for substitution.
///
/// No-op records (`original == corrected`), records with an empty original
/// and records with a negative position are dropped. The rest are sorted by
/// position, highest first; records without a position keep their input
/// order after all positioned ones.
pub fn normalize(records: &[CorrectionRecord]) -> Vec<CorrectionRecord> {
    let mut kept: Vec<CorrectionRecord> = records
        .iter()
        .filter(|record| is_well_formed(record))
        .cloned()
        .collect();

    kept.sort_by_key(|record| match record.position {
        Some(position) => (false, Reverse(position)),
        None => (true, Reverse(0)),
    });

    kept
}

fn is_well_formed(record: &CorrectionRecord) -> bool {
    if record.original.trim().is_empty() {
        tracing::debug!(corrected = %record.corrected, "dropping record with empty original");
        return false;
    }
    if record.original == record.corrected {
        return false;
    }
    if let Some(position) = record.position.filter(|p| *p < 0) {
        tracing::debug!(original = %record.original, position, "dropping record with negative position");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(records: &[CorrectionRecord]) -> Vec<Option<i64>> {
        records.iter().map(|r| r.position).collect()
    }

    #[test]
    fn test_drops_noops_and_malformed() {
        let records = vec![
            CorrectionRecord::new("كتاب", "كتاب").at(1),
            CorrectionRecord::new("", "خطأ").at(2),
            CorrectionRecord::new("  ", "خطأ"),
            CorrectionRecord::new("خطاء", "خطأ").at(-4),
            CorrectionRecord::new("خطاء", "خطأ").at(3),
        ];

        let normalized = normalize(&records);
        assert_eq!(normalized, vec![CorrectionRecord::new("خطاء", "خطأ").at(3)]);
    }

    #[test]
    fn test_descending_with_unpositioned_last() {
        let records = vec![
            CorrectionRecord::new("a", "b"),
            CorrectionRecord::new("c", "d").at(2),
            CorrectionRecord::new("e", "f").at(9),
            CorrectionRecord::new("g", "h"),
            CorrectionRecord::new("i", "j").at(5),
        ];

        let normalized = normalize(&records);
        assert_eq!(positions(&normalized), vec![Some(9), Some(5), Some(2), None, None]);
        assert_eq!(normalized[3].original, "a");
        assert_eq!(normalized[4].original, "g");

        for pair in normalized.windows(2) {
            if let (Some(a), Some(b)) = (pair[0].position, pair[1].position) {
                assert!(a >= b);
            }
        }
    }

    #[test]
    fn test_duplicates_are_kept() {
        let records = vec![
            CorrectionRecord::new("خطاء", "خطأ").at(1),
            CorrectionRecord::new("خطاء", "خطأ").at(7),
        ];
        assert_eq!(normalize(&records).len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let records = vec![
            CorrectionRecord::new("x", "x"),
            CorrectionRecord::new("a", "b"),
            CorrectionRecord::new("c", "d").at(4),
            CorrectionRecord::new("e", "f").at(4),
            CorrectionRecord::new("g", "h").at(11),
        ];
        let once = normalize(&records);
        assert_eq!(normalize(&once), once);
    }
}
