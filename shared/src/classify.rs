//! Threshold-based decision policy over ranked vocabulary candidates.

use crate::dto::{ItemOutcome, MatchCandidate, Warning};

/// Scores at or above this are accepted with an automatic correction.
pub const AUTO_CORRECT_THRESHOLD: f64 = 0.8;
/// Scores at or above this (but below auto-correct) yield suggestions.
pub const SUGGESTION_THRESHOLD: f64 = 0.6;
/// Maximum number of suggestions attached to one item.
pub const MAX_SUGGESTIONS: usize = 3;

/// Decide the outcome for one trimmed input given its candidates, ranked by
/// descending score. Both thresholds are inclusive on their lower bound.
pub fn classify(original: &str, candidates: &[MatchCandidate]) -> ItemOutcome {
    let Some(best) = candidates.first() else {
        return not_found(original);
    };
    if best.match_score < SUGGESTION_THRESHOLD {
        return not_found(original);
    }

    if best.match_score >= 1.0 {
        let warning = if best.name != original {
            Some(Warning::Correction {
                original: original.to_string(),
                corrected: best.name.clone(),
                confidence: 1.0,
                message: format!("'{}' corrected to standard form '{}'", original, best.name),
            })
        } else {
            None
        };
        return ItemOutcome {
            original: original.to_string(),
            corrected_name: Some(best.name.clone()),
            is_valid: true,
            warning,
            report_gap: false,
        };
    }

    if best.match_score >= AUTO_CORRECT_THRESHOLD {
        return ItemOutcome {
            original: original.to_string(),
            corrected_name: Some(best.name.clone()),
            is_valid: true,
            warning: Some(Warning::Correction {
                original: original.to_string(),
                corrected: best.name.clone(),
                confidence: best.match_score,
                message: format!(
                    "'{}' corrected to '{}' ({:.0}% similarity)",
                    original,
                    best.name,
                    best.match_score * 100.0
                ),
            }),
            report_gap: false,
        };
    }

    // suggestion band: top distinct display names in descending score order
    let mut suggestions: Vec<String> = Vec::new();
    for c in candidates {
        if c.match_score < SUGGESTION_THRESHOLD {
            break;
        }
        if !suggestions.contains(&c.name) {
            suggestions.push(c.name.clone());
        }
        if suggestions.len() == MAX_SUGGESTIONS {
            break;
        }
    }
    ItemOutcome {
        original: original.to_string(),
        corrected_name: None,
        is_valid: false,
        warning: Some(Warning::Suggestion {
            ingredient: original.to_string(),
            suggestions,
            message: format!("did you mean one of these instead of '{}'?", original),
        }),
        report_gap: false,
    }
}

/// Outcome for an item with no acceptable match; the caller is expected to
/// gap-report it.
pub fn not_found(original: &str) -> ItemOutcome {
    ItemOutcome {
        original: original.to_string(),
        corrected_name: None,
        is_valid: false,
        warning: Some(Warning::NotFound {
            ingredient: original.to_string(),
            message: format!("'{}' was not found in the ingredient vocabulary", original),
            reported: true,
        }),
        report_gap: true,
    }
}

/// Outcome for an item whose lookup failed outright. Distinct message from
/// the not-found case so callers can tell a vocabulary gap from an outage.
pub fn validation_error(original: &str) -> ItemOutcome {
    ItemOutcome {
        original: original.to_string(),
        corrected_name: None,
        is_valid: false,
        warning: Some(Warning::NotFound {
            ingredient: original.to_string(),
            message: "error occurred during validation".to_string(),
            reported: true,
        }),
        report_gap: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::MatchType;

    fn candidate(name: &str, score: f64) -> MatchCandidate {
        MatchCandidate {
            name: name.to_string(),
            normalized_name: crate::normalize::normalize(name),
            category: None,
            aliases: vec![],
            match_type: if score >= 1.0 {
                MatchType::Exact
            } else {
                MatchType::Fuzzy
            },
            match_score: score,
        }
    }

    #[test]
    fn exact_match_same_display_name_has_no_warning() {
        let out = classify("Hành lá", &[candidate("Hành lá", 1.0)]);
        assert!(out.is_valid);
        assert_eq!(out.corrected_name.as_deref(), Some("Hành lá"));
        assert!(out.warning.is_none());
        assert!(!out.report_gap);
    }

    #[test]
    fn exact_match_different_display_name_gets_standard_form_correction() {
        let out = classify("hanh la", &[candidate("Hành lá", 1.0)]);
        assert!(out.is_valid);
        match out.warning {
            Some(Warning::Correction { confidence, corrected, .. }) => {
                assert_eq!(confidence, 1.0);
                assert_eq!(corrected, "Hành lá");
            }
            other => panic!("expected correction warning, got {:?}", other),
        }
    }

    #[test]
    fn fuzzy_band_is_valid_with_correction() {
        for score in [0.8, 0.85, 0.999] {
            let out = classify("hanh laa", &[candidate("Hành lá", score)]);
            assert!(out.is_valid, "score {score}");
            match out.warning {
                Some(Warning::Correction { confidence, .. }) => assert_eq!(confidence, score),
                other => panic!("expected correction at {score}, got {:?}", other),
            }
        }
    }

    #[test]
    fn suggestion_band_is_invalid_with_suggestions() {
        for score in [0.6, 0.7, 0.799] {
            let out = classify("hanh", &[candidate("Hành lá", score)]);
            assert!(!out.is_valid, "score {score}");
            assert!(!out.report_gap);
            assert!(matches!(out.warning, Some(Warning::Suggestion { .. })));
        }
    }

    #[test]
    fn below_suggestion_band_is_not_found_and_reported() {
        let out = classify("xyz", &[candidate("Hành lá", 0.59)]);
        assert!(!out.is_valid);
        assert!(out.report_gap);
        match out.warning {
            Some(Warning::NotFound { reported, .. }) => assert!(reported),
            other => panic!("expected not-found, got {:?}", other),
        }
    }

    #[test]
    fn no_candidates_is_not_found() {
        let out = classify("xyz", &[]);
        assert!(!out.is_valid);
        assert!(out.report_gap);
    }

    #[test]
    fn suggestions_are_deduplicated_and_capped_at_three() {
        let candidates: Vec<MatchCandidate> = (0..10)
            .map(|i| candidate(["A", "B", "A", "C", "D"][i % 5], 0.65))
            .collect();
        let out = classify("abc", &candidates);
        match out.warning {
            Some(Warning::Suggestion { suggestions, .. }) => {
                assert_eq!(suggestions, vec!["A", "B", "C"]);
            }
            other => panic!("expected suggestion, got {:?}", other),
        }
    }

    #[test]
    fn suggestions_keep_descending_score_order() {
        let candidates = vec![
            candidate("Best", 0.79),
            candidate("Middle", 0.7),
            candidate("Worst", 0.61),
        ];
        let out = classify("abc", &candidates);
        match out.warning {
            Some(Warning::Suggestion { suggestions, .. }) => {
                assert_eq!(suggestions, vec!["Best", "Middle", "Worst"]);
            }
            other => panic!("expected suggestion, got {:?}", other),
        }
    }
}
