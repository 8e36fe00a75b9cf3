use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::services::models::SearchHistory;

/// Append-only log of client search queries, read back for
/// personalized recommendations
pub struct SearchHistoryService {
    pool: PgPool,
}

impl SearchHistoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a search query for a client. Blank queries are skipped.
    pub async fn record(&self, user_id: Uuid, query: &str) -> Result<()> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }

        sqlx::query("INSERT INTO search_history (id, user_id, query) VALUES ($1, $2, $3)")
            .bind(Uuid::now_v7())
            .bind(user_id)
            .bind(query)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to record search query: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(())
    }

    /// The user's most recent search query, if any
    pub async fn last_query(&self, user_id: Uuid) -> Result<Option<String>> {
        let entry = sqlx::query_as::<_, SearchHistory>(
            "SELECT id, user_id, query, created_at \
             FROM search_history \
             WHERE user_id = $1 \
             ORDER BY created_at DESC \
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load last search query: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(entry.map(|h| h.query))
    }
}
