use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a vocabulary candidate matched the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Alias,
    Fuzzy,
}

/// One scored candidate from a vocabulary search, alive only for the
/// duration of a single classification decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub name: String,
    pub normalized_name: String,
    pub category: Option<String>,
    pub aliases: Vec<String>,
    pub match_type: MatchType,
    pub match_score: f64,
}

/// Warning attached to a validated item. An explicit sum type so call sites
/// handle every shape exhaustively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Warning {
    Correction {
        original: String,
        corrected: String,
        confidence: f64,
        message: String,
    },
    Suggestion {
        ingredient: String,
        suggestions: Vec<String>,
        message: String,
    },
    NotFound {
        ingredient: String,
        message: String,
        reported: bool,
    },
}

/// Classification result for a single input item.
#[derive(Debug, Clone)]
pub struct ItemOutcome {
    pub original: String,
    pub corrected_name: Option<String>,
    pub is_valid: bool,
    pub warning: Option<Warning>,
    /// The item had no acceptable match and should be gap-reported.
    pub report_gap: bool,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub ingredients: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub valid: Vec<String>,
    pub invalid: Vec<String>,
    pub warnings: Vec<Warning>,
}

/// Running summary of gap reports for one normalized ingredient name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub original_name: String,
    pub normalized_name: String,
    pub report_count: i64,
    pub first_reported_at: DateTime<Utc>,
    pub last_reported_at: DateTime<Utc>,
    pub needs_admin_review: bool,
}

/// Event published to curators when an ingredient gap crosses the review
/// threshold.
#[derive(Debug, Serialize, Deserialize)]
pub struct CuratorAlert {
    pub ingredient: String,
    pub normalized_name: String,
    pub report_count: i64,
}
