//! Batch orchestration: runs the classifier over each input item in order,
//! isolating per-item failures and feeding vocabulary gaps to the reporter.

use std::sync::Arc;

use tracing::warn;

use shared::classify::{classify, validation_error};
use shared::dto::ValidationSummary;
use shared::error::{AppError, Result};
use shared::normalize::normalize;

use crate::report::{CuratorNotifier, GapReporter, ReportStore};
use crate::search::VocabularySearch;

pub const MAX_BATCH_SIZE: usize = 20;

pub struct BatchValidator<V, S, N> {
    search: Arc<V>,
    reporter: GapReporter<S, N>,
}

impl<V, S, N> BatchValidator<V, S, N>
where
    V: VocabularySearch,
    S: ReportStore,
    N: CuratorNotifier,
{
    pub fn new(search: Arc<V>, reporter: GapReporter<S, N>) -> Self {
        Self { search, reporter }
    }

    /// Validate a batch of raw ingredient names.
    ///
    /// Rejects the whole request when the list is empty or exceeds
    /// [`MAX_BATCH_SIZE`]; every accepted item yields exactly one
    /// classification, in input order, even if its lookup fails.
    pub async fn validate(&self, items: &[String]) -> Result<ValidationSummary> {
        if items.is_empty() {
            return Err(AppError::InvalidRequest(
                "ingredient list must not be empty".into(),
            ));
        }
        if items.len() > MAX_BATCH_SIZE {
            return Err(AppError::InvalidRequest(format!(
                "at most {MAX_BATCH_SIZE} ingredients per request, got {}",
                items.len()
            )));
        }

        let mut summary = ValidationSummary::default();
        for raw in items {
            let trimmed = raw.trim();
            let outcome = match self.search.search(trimmed).await {
                Ok(candidates) => classify(trimmed, &candidates),
                Err(e) => {
                    warn!(%e, ingredient = %trimmed, "vocabulary search failed");
                    validation_error(trimmed)
                }
            };

            if outcome.report_gap {
                self.reporter.report(trimmed, &normalize(trimmed)).await;
            }
            if outcome.is_valid {
                summary.valid.push(
                    outcome
                        .corrected_name
                        .unwrap_or_else(|| outcome.original.clone()),
                );
            } else {
                summary.invalid.push(outcome.original.clone());
            }
            if let Some(warning) = outcome.warning {
                summary.warnings.push(warning);
            }
        }
        Ok(summary)
    }
}
