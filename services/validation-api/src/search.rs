//! Vocabulary search backend: trait boundary plus the Postgres-backed
//! implementation that combines trigram recall with in-process scoring.

use async_trait::async_trait;
use sqlx::PgPool;

use shared::dto::{MatchCandidate, MatchType};
use shared::normalize::{normalize, variations};
use shared::similarity::score;

#[async_trait]
pub trait VocabularySearch: Send + Sync {
    /// Return ranked, scored candidates for the query. An empty result means
    /// the vocabulary has no plausible entry, not an error.
    async fn search(&self, query: &str) -> anyhow::Result<Vec<MatchCandidate>>;
}

#[derive(sqlx::FromRow)]
struct IngredientRow {
    name: String,
    normalized_name: String,
    category: Option<String>,
    aliases: Vec<String>,
}

pub struct PgVocabularySearch {
    pool: PgPool,
    limit: usize,
    fuzzy_floor: f64,
}

impl PgVocabularySearch {
    pub fn new(pool: PgPool, limit: usize, fuzzy_floor: f64) -> Self {
        Self {
            pool,
            limit,
            fuzzy_floor,
        }
    }
}

#[async_trait]
impl VocabularySearch for PgVocabularySearch {
    async fn search(&self, query: &str) -> anyhow::Result<Vec<MatchCandidate>> {
        let norm_query = normalize(query);
        if norm_query.is_empty() {
            return Ok(vec![]);
        }
        let variants: Vec<String> = variations(query).into_iter().collect();

        // trigram similarity gives cheap recall in the database, the exact
        // variant list catches alias/word forms the trigram operator misses
        let rows: Vec<IngredientRow> = sqlx::query_as(
            r#"
            SELECT name, normalized_name, category, aliases
              FROM master_ingredients
             WHERE is_active
               AND (normalized_name % $1 OR normalized_name = ANY($2))
             LIMIT 50
            "#,
        )
        .bind(&norm_query)
        .bind(&variants)
        .fetch_all(&self.pool)
        .await?;

        let mut candidates: Vec<MatchCandidate> = rows
            .into_iter()
            .map(|row| {
                let match_score = score(query, &row.name, &row.aliases);
                let match_type = if row.normalized_name == norm_query {
                    MatchType::Exact
                } else if row.aliases.iter().any(|a| normalize(a) == norm_query) {
                    MatchType::Alias
                } else {
                    MatchType::Fuzzy
                };
                MatchCandidate {
                    name: row.name,
                    normalized_name: row.normalized_name,
                    category: row.category,
                    aliases: row.aliases,
                    match_type,
                    match_score,
                }
            })
            .filter(|c| c.match_score >= self.fuzzy_floor)
            .collect();

        candidates.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(self.limit);
        Ok(candidates)
    }
}
