//! Gap reporting: durable counters for ingredients that failed
//! classification, with curator escalation once a name keeps reappearing.
//!
//! Everything here is best-effort telemetry. Failures are logged and
//! swallowed so they can never leak into a validation response.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rdkafka::producer::FutureProducer;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use shared::dto::{CuratorAlert, ReportSummary};
use shared::error::{AppError, Result};
use shared::retry::{retry_if, RetryConfig};

#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Record one failed classification for `normalized`: an immutable event
    /// row plus an atomic increment of the per-ingredient summary. Returns
    /// the summary after the increment.
    async fn record_failure(
        &self,
        original: &str,
        normalized: &str,
        at: DateTime<Utc>,
        review_threshold: i64,
    ) -> Result<ReportSummary>;

    /// Summaries whose normalized name starts with `prefix`, most recently
    /// reported first.
    async fn summaries_by_prefix(&self, prefix: &str, limit: i64) -> Result<Vec<ReportSummary>>;
}

#[async_trait]
pub trait CuratorNotifier: Send + Sync {
    async fn notify(&self, alert: &CuratorAlert) -> Result<()>;
}

#[derive(sqlx::FromRow)]
struct ReportRow {
    original_name: String,
    normalized_name: String,
    report_count: i64,
    first_reported_at: DateTime<Utc>,
    last_reported_at: DateTime<Utc>,
    needs_admin_review: bool,
}

impl From<ReportRow> for ReportSummary {
    fn from(r: ReportRow) -> Self {
        ReportSummary {
            original_name: r.original_name,
            normalized_name: r.normalized_name,
            report_count: r.report_count,
            first_reported_at: r.first_reported_at,
            last_reported_at: r.last_reported_at,
            needs_admin_review: r.needs_admin_review,
        }
    }
}

pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn record_failure(
        &self,
        original: &str,
        normalized: &str,
        at: DateTime<Utc>,
        review_threshold: i64,
    ) -> Result<ReportSummary> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO ingredient_gap_events (id, original_name, normalized_name, reported_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(original)
        .bind(normalized)
        .bind(at)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        // the conditional increment runs inside the database, so concurrent
        // failures for the same name cannot lose updates
        let row: ReportRow = sqlx::query_as(
            r#"
            INSERT INTO ingredient_gap_reports AS r
                   (normalized_name, original_name, report_count,
                    first_reported_at, last_reported_at, needs_admin_review)
            VALUES ($1, $2, 1, $3, $3, 1 >= $4)
            ON CONFLICT (normalized_name) DO UPDATE
               SET report_count = r.report_count + 1,
                   last_reported_at = EXCLUDED.last_reported_at,
                   needs_admin_review = r.needs_admin_review
                                        OR r.report_count + 1 >= $4
            RETURNING original_name, normalized_name, report_count,
                      first_reported_at, last_reported_at, needs_admin_review
            "#,
        )
        .bind(normalized)
        .bind(original)
        .bind(at)
        .bind(review_threshold)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(row.into())
    }

    async fn summaries_by_prefix(&self, prefix: &str, limit: i64) -> Result<Vec<ReportSummary>> {
        let rows: Vec<ReportRow> = sqlx::query_as(
            r#"
            SELECT original_name, normalized_name, report_count,
                   first_reported_at, last_reported_at, needs_admin_review
              FROM ingredient_gap_reports
             WHERE normalized_name LIKE $1 || '%'
             ORDER BY last_reported_at DESC
             LIMIT $2
            "#,
        )
        .bind(prefix)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

pub struct KafkaNotifier {
    producer: FutureProducer,
    topic: String,
}

impl KafkaNotifier {
    pub fn new(producer: FutureProducer, topic: String) -> Self {
        Self { producer, topic }
    }
}

#[async_trait]
impl CuratorNotifier for KafkaNotifier {
    async fn notify(&self, alert: &CuratorAlert) -> Result<()> {
        shared::kafka::publish_json(&self.producer, &self.topic, &alert.normalized_name, alert)
            .await
            .map_err(|e| AppError::Broker(e.to_string()))
    }
}

/// Records vocabulary gaps and escalates to curators once a normalized name
/// crosses the review threshold.
pub struct GapReporter<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    review_threshold: i64,
    retry: RetryConfig,
}

impl<S: ReportStore, N: CuratorNotifier> GapReporter<S, N> {
    pub fn new(store: Arc<S>, notifier: Arc<N>, review_threshold: i64, retry: RetryConfig) -> Self {
        Self {
            store,
            notifier,
            review_threshold,
            retry,
        }
    }

    /// Record one failed classification. Never returns an error: store and
    /// notification failures are logged and dropped.
    pub async fn report(&self, original: &str, normalized: &str) {
        if normalized.is_empty() {
            return;
        }
        let at = Utc::now();
        let result = retry_if(
            &self.retry,
            || {
                self.store
                    .record_failure(original, normalized, at, self.review_threshold)
            },
            AppError::is_transient,
        )
        .await;

        match result {
            Ok(summary) => {
                // notify exactly once: only the call that moved the counter
                // onto the threshold publishes
                if summary.needs_admin_review && summary.report_count == self.review_threshold {
                    let alert = CuratorAlert {
                        ingredient: summary.original_name.clone(),
                        normalized_name: summary.normalized_name.clone(),
                        report_count: summary.report_count,
                    };
                    match self.notifier.notify(&alert).await {
                        Ok(()) => info!(
                            ingredient = %alert.ingredient,
                            count = alert.report_count,
                            "ingredient gap escalated to curators"
                        ),
                        Err(e) => warn!(%e, ingredient = %alert.ingredient, "curator notification failed"),
                    }
                }
            }
            Err(e) => warn!(%e, ingredient = %original, "failed to record ingredient gap"),
        }
    }
}
