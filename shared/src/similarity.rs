//! Confidence scoring between a raw input and a vocabulary candidate,
//! optionally against the candidate's aliases.

use strsim::{jaro_winkler, levenshtein};

use crate::normalize::normalize;

/// Weighted string-distance primitive on already-normalized strings:
/// Jaro-Winkler carries most of the weight since it tolerates the short
/// transpositions typical of diacritic-stripped typing, Levenshtein keeps
/// wholesale rewrites from scoring high.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let max_len = a.chars().count().max(b.chars().count());
    let lev = 1.0 - levenshtein(a, b) as f64 / max_len as f64;
    0.7 * jaro_winkler(a, b) + 0.3 * lev
}

/// Score `input` against a candidate name and its aliases, returning a
/// confidence in [0, 1].
///
/// Exact normalized equality scores 1.0, alias equality 0.95. Otherwise the
/// maximum pairwise similarity is taken and boosted when one side contains
/// the other: +0.15 (capped at 0.99) for the candidate name itself, +0.10
/// (capped at 1.0) when an alias is the substring match.
pub fn score(input: &str, candidate_name: &str, aliases: &[String]) -> f64 {
    let norm_input = normalize(input);
    let norm_candidate = normalize(candidate_name);

    if norm_input == norm_candidate {
        return 1.0;
    }
    let norm_aliases: Vec<String> = aliases.iter().map(|a| normalize(a)).collect();
    if norm_aliases.iter().any(|a| *a == norm_input) {
        return 0.95;
    }

    let base = similarity(&norm_input, &norm_candidate);
    let mut max_score = base;
    let mut max_from_base = true;
    for alias in &norm_aliases {
        let s = similarity(&norm_input, alias);
        if s > max_score {
            max_score = s;
            max_from_base = false;
        }
    }

    let contains = |a: &str, b: &str| a.contains(b) || b.contains(a);
    if max_from_base && contains(&norm_candidate, &norm_input) {
        max_score = (max_score + 0.15).min(0.99);
    } else if norm_aliases.iter().any(|a| contains(a, &norm_input)) {
        max_score = (max_score + 0.10).min(1.0);
    }

    max_score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(score("hành lá", "hành lá", &[]), 1.0);
        assert_eq!(score("x", "x", &[]), 1.0);
    }

    #[test]
    fn normalized_equality_scores_one() {
        // diacritic-stripped input still matches exactly
        assert_eq!(score("hanh la", "Hành lá", &[]), 1.0);
    }

    #[test]
    fn alias_equality_scores_095() {
        let aliases = vec!["hành hoa".to_string()];
        assert_eq!(score("hanh hoa", "Hành lá", &aliases), 0.95);
    }

    #[test]
    fn empty_pair_scores_one_single_empty_scores_low() {
        assert_eq!(score("", "", &[]), 1.0);
        assert!(score("", "abc", &[]) < 0.5);
        assert_eq!(similarity("", "abc"), 0.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn near_miss_scores_below_one() {
        let s = score("hanh laa", "Hành lá", &[]);
        assert!(s < 1.0, "got {s}");
        assert!(s > 0.8, "got {s}");
    }

    #[test]
    fn substring_boost_applies_to_candidate() {
        // "ca chua" is a substring of "ca chua bi"
        let plain = similarity("ca chua", "ca chua bi");
        let boosted = score("cà chua", "cà chua bi", &[]);
        assert!(boosted > plain);
        assert!(boosted <= 0.99);
    }

    #[test]
    fn boost_never_exceeds_caps() {
        // base similarity already close to 1.0, boost must cap at 0.99
        let s = score("ca chua bi do", "ca chua bi", &[]);
        assert!(s <= 0.99);
    }

    #[test]
    fn alias_similarity_wins_over_weak_base() {
        let aliases = vec!["ngò rí".to_string()];
        let s = score("ngo ri xanh", "Rau mùi", &aliases);
        assert!(s > similarity("ngo ri xanh", "rau mui"));
    }

    #[test]
    fn score_stays_in_unit_interval() {
        for (a, b) in [("a", "zzzz"), ("thit bo", "ca"), ("x", "")] {
            let s = score(a, b, &[]);
            assert!((0.0..=1.0).contains(&s), "{a}/{b} -> {s}");
        }
    }
}
