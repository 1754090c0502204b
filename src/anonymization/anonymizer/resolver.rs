//! Conflict resolution between candidate spans
//!
//! Sorted by start ascending and length descending, then swept once: a
//! candidate starting at or after the current span's end commits the
//! current span; an overlapping candidate replaces it only when strictly
//! longer; anything else is dropped.

use crate::anonymization::models::CandidateSpan;

/// Reduce a candidate pool to a non-overlapping set, ordered descending by start
pub fn resolve(mut candidates: Vec<CandidateSpan>) -> Vec<CandidateSpan> {
    candidates.retain(|span| !span.is_empty());
    candidates.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut accepted: Vec<CandidateSpan> = Vec::with_capacity(candidates.len());
    let mut candidates = candidates.into_iter();
    let Some(mut current) = candidates.next() else {
        return accepted;
    };

    for next in candidates {
        if next.start >= current.end {
            accepted.push(std::mem::replace(&mut current, next));
        } else if next.len() > current.len() {
            current = next;
        }
    }
    accepted.push(current);

    accepted.reverse();
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::ExtractorKind;
    use proptest::prelude::*;

    fn span(start: usize, end: usize) -> CandidateSpan {
        CandidateSpan::new(start, end, format!("<{start}-{end}>"), ExtractorKind::Pattern)
    }

    fn ranges(spans: &[CandidateSpan]) -> Vec<(usize, usize)> {
        spans.iter().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn test_empty_pool() {
        assert!(resolve(Vec::new()).is_empty());
    }

    #[test]
    fn test_disjoint_spans_kept_descending() {
        let resolved = resolve(vec![span(0, 2), span(5, 8), span(2, 4)]);
        assert_eq!(ranges(&resolved), vec![(5, 8), (2, 4), (0, 2)]);
    }

    #[test]
    fn test_longest_at_same_start_wins() {
        let resolved = resolve(vec![span(0, 3), span(0, 6), span(0, 4)]);
        assert_eq!(ranges(&resolved), vec![(0, 6)]);
    }

    #[test]
    fn test_longer_overlapping_span_replaces_current() {
        let resolved = resolve(vec![span(0, 3), span(2, 10)]);
        assert_eq!(ranges(&resolved), vec![(2, 10)]);
    }

    #[test]
    fn test_shorter_overlapping_span_dropped() {
        let resolved = resolve(vec![span(0, 6), span(4, 7)]);
        assert_eq!(ranges(&resolved), vec![(0, 6)]);
    }

    #[test]
    fn test_equal_length_overlap_keeps_first() {
        let resolved = resolve(vec![span(0, 4), span(2, 6)]);
        assert_eq!(ranges(&resolved), vec![(0, 4)]);
    }

    proptest! {
        #[test]
        fn test_output_is_pairwise_disjoint(
            bounds in prop::collection::vec((0usize..40, 1usize..9), 1..13)
        ) {
            let pool: Vec<CandidateSpan> = bounds
                .iter()
                .map(|&(start, len)| span(start, start + len))
                .collect();
            let resolved = resolve(pool.clone());

            for pair in resolved.windows(2) {
                prop_assert!(pair[0].start >= pair[1].end, "{:?}", ranges(&resolved));
            }
            // Every dropped candidate lost to an overlapping candidate at least as long
            for (i, candidate) in pool.iter().enumerate() {
                if resolved.contains(candidate) {
                    continue;
                }
                let beaten = pool.iter().enumerate().any(|(j, other)| {
                    i != j && other.overlaps(candidate) && other.len() >= candidate.len()
                });
                prop_assert!(beaten);
            }
        }
    }
}
