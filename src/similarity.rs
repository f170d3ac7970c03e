//! Normalized edit-distance similarity.
//!
//! For strings `a` and `b` measured in Unicode scalar values:
//!
//! ```text
//! similarity(a, b) = 1 - distance(a, b) / max(|a|, |b|)
//! similarity("", "") = 1
//! ```
//!
//! where `distance` is the Damerau-Levenshtein distance (adjacent
//! transpositions cost one edit) or plain Levenshtein, depending on the
//! configured [`Metric`]. The result is symmetric, lies in `[0, 1]`, and is
//! `1.0` only for identical inputs. A short prefix of a long string scores
//! low: `"Al"` against `"Alice Smith"` is `2 / 11`.

use crate::settings::Metric;

pub fn similarity(a: &str, b: &str, metric: Metric) -> f64 {
    if a == b {
        return 1.0;
    }
    match metric {
        Metric::DamerauLevenshtein => strsim::normalized_damerau_levenshtein(a, b),
        Metric::Levenshtein => strsim::normalized_levenshtein(a, b),
    }
}

/// Highest score any string of `other_len` characters can reach against one
/// of `len` characters, since the distance is at least the length difference.
pub fn upper_bound(len: usize, other_len: usize) -> f64 {
    let longest = len.max(other_len);
    if longest == 0 {
        return 1.0;
    }
    len.min(other_len) as f64 / longest as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn identical_strings_score_one() {
        for metric in [Metric::DamerauLevenshtein, Metric::Levenshtein] {
            assert_eq!(similarity("alice smith", "alice smith", metric), 1.0);
            assert_eq!(similarity("", "", metric), 1.0);
        }
    }

    #[test]
    fn empty_against_non_empty_scores_zero() {
        assert_eq!(similarity("", "bob", Metric::DamerauLevenshtein), 0.0);
        assert_eq!(similarity("bob", "", Metric::Levenshtein), 0.0);
    }

    #[test]
    fn single_substitution_costs_one_edit() {
        assert_close(similarity("kitten", "sitten", Metric::Levenshtein), 5.0 / 6.0);
    }

    #[test]
    fn transposition_is_cheaper_under_damerau() {
        let damerau = similarity("jonh", "john", Metric::DamerauLevenshtein);
        let plain = similarity("jonh", "john", Metric::Levenshtein);
        assert_close(damerau, 0.75);
        assert_close(plain, 0.5);
    }

    #[test]
    fn short_prefix_does_not_score_near_one() {
        assert_close(
            similarity("al", "alice smith", Metric::DamerauLevenshtein),
            2.0 / 11.0,
        );
    }

    #[test]
    fn score_is_symmetric() {
        let pairs = [("bob lee", "bobby lee"), ("carol", "karol white"), ("x", "")];
        for (a, b) in pairs {
            for metric in [Metric::DamerauLevenshtein, Metric::Levenshtein] {
                assert_eq!(similarity(a, b, metric), similarity(b, a, metric));
            }
        }
    }

    #[test]
    fn disjoint_strings_of_equal_length_score_zero() {
        assert_eq!(similarity("abc", "xyz", Metric::DamerauLevenshtein), 0.0);
    }

    #[test]
    fn upper_bound_never_undercuts_the_actual_score() {
        let pairs = [("bob", "bobby lee"), ("alice", "alicia"), ("", "abc"), ("ab", "ba")];
        for (a, b) in pairs {
            let bound = upper_bound(a.chars().count(), b.chars().count());
            assert!(similarity(a, b, Metric::DamerauLevenshtein) <= bound + EPSILON);
        }
        assert_eq!(upper_bound(0, 0), 1.0);
    }
}
