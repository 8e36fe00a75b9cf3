use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::services::dtos::ServiceSummaryDto;
use crate::features::services::models::{ServiceWithExecutor, SERVICE_WITH_EXECUTOR_COLUMNS};
use crate::features::services::services::search_history_service::SearchHistoryService;
use crate::features::services::services::service_catalog_service::summaries_for;
use crate::shared::constants::{RECENT_FALLBACK_LIMIT, RECOMMENDATION_LIMIT};
use crate::shared::validation::escape_like;

struct CachedEntry {
    summaries: Vec<ServiceSummaryDto>,
    fetched_at: Instant,
}

impl CachedEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Tiered recommendation engine. Tries the viewer's last search query,
/// then popular services, then newest services; each tier is used only
/// when the previous one produced nothing. Results are cached per
/// viewer for a short TTL.
pub struct RecommendationService {
    pool: PgPool,
    history: Arc<SearchHistoryService>,
    cache_ttl: Duration,
    cache: RwLock<HashMap<Option<Uuid>, CachedEntry>>,
}

impl RecommendationService {
    pub fn new(pool: PgPool, history: Arc<SearchHistoryService>, cache_ttl: Duration) -> Self {
        Self {
            pool,
            history,
            cache_ttl,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Recommendations for a viewer; anonymous viewers share one cache slot
    pub async fn recommend(&self, viewer_id: Option<Uuid>) -> Result<Vec<ServiceSummaryDto>> {
        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&viewer_id) {
                if entry.is_fresh(self.cache_ttl) {
                    return Ok(entry.summaries.clone());
                }
            }
        }

        let summaries = self.compute(viewer_id).await?;

        let mut cache = self.cache.write().await;
        cache.retain(|_, entry| entry.is_fresh(self.cache_ttl));
        cache.insert(
            viewer_id,
            CachedEntry {
                summaries: summaries.clone(),
                fetched_at: Instant::now(),
            },
        );

        Ok(summaries)
    }

    async fn compute(&self, viewer_id: Option<Uuid>) -> Result<Vec<ServiceSummaryDto>> {
        let mut tiers: Vec<TierFuture<'_, ServiceWithExecutor>> = Vec::new();
        if let Some(viewer_id) = viewer_id {
            tiers.push(Box::pin(self.from_last_search(viewer_id)));
        }
        tiers.push(Box::pin(self.popular()));

        let rows = first_populated_tier(tiers, self.newest()).await?;
        summaries_for(&self.pool, rows).await
    }

    /// Tier 1: title matches against the viewer's most recent search query.
    /// None when the viewer has no history or the query matches nothing.
    async fn from_last_search(&self, viewer_id: Uuid) -> Result<Option<Vec<ServiceWithExecutor>>> {
        let Some(query) = self.history.last_query(viewer_id).await? else {
            return Ok(None);
        };

        let pattern = format!("%{}%", escape_like(query.trim()));
        let rows = sqlx::query_as::<_, ServiceWithExecutor>(&format!(
            "SELECT {SERVICE_WITH_EXECUTOR_COLUMNS} FROM services s \
             JOIN users u ON u.id = s.executor_id \
             WHERE s.title ILIKE $1 \
             ORDER BY s.popularity DESC, s.created_at DESC \
             LIMIT $2"
        ))
        .bind(pattern)
        .bind(RECOMMENDATION_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to match last search query: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(non_empty(rows))
    }

    /// Tier 2: most popular services. None only when the catalog is empty.
    async fn popular(&self) -> Result<Option<Vec<ServiceWithExecutor>>> {
        let rows = sqlx::query_as::<_, ServiceWithExecutor>(&format!(
            "SELECT {SERVICE_WITH_EXECUTOR_COLUMNS} FROM services s \
             JOIN users u ON u.id = s.executor_id \
             ORDER BY s.popularity DESC, s.created_at DESC \
             LIMIT $1"
        ))
        .bind(RECOMMENDATION_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load popular services: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(non_empty(rows))
    }

    /// Tier 3: newest services. Terminal tier; an empty catalog yields
    /// an empty list.
    async fn newest(&self) -> Result<Vec<ServiceWithExecutor>> {
        sqlx::query_as::<_, ServiceWithExecutor>(&format!(
            "SELECT {SERVICE_WITH_EXECUTOR_COLUMNS} FROM services s \
             JOIN users u ON u.id = s.executor_id \
             ORDER BY s.created_at DESC \
             LIMIT $1"
        ))
        .bind(RECENT_FALLBACK_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load newest services: {:?}", e);
            AppError::Database(e)
        })
    }
}

/// One stage of the fallback chain. Futures are lazy, so a tier placed
/// after the first hit is dropped without ever running its query.
type TierFuture<'a, T> = Pin<Box<dyn Future<Output = Result<Option<Vec<T>>>> + Send + 'a>>;

/// Evaluate tiers in order and return the first populated result whole;
/// when every tier comes up empty, return the terminal tier's result as-is
/// (possibly empty).
async fn first_populated_tier<T>(
    tiers: Vec<TierFuture<'_, T>>,
    terminal: impl Future<Output = Result<Vec<T>>>,
) -> Result<Vec<T>> {
    for tier in tiers {
        if let Some(rows) = tier.await? {
            return Ok(rows);
        }
    }
    terminal.await
}

fn non_empty<T>(rows: Vec<T>) -> Option<Vec<T>> {
    if rows.is_empty() {
        None
    } else {
        Some(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_first_populated_tier_is_returned_whole() {
        let later_tier_ran = AtomicBool::new(false);
        let terminal_ran = AtomicBool::new(false);

        let tiers: Vec<TierFuture<'_, i32>> = vec![
            Box::pin(async { Ok(Some(vec![1, 2, 3])) }),
            Box::pin(async {
                later_tier_ran.store(true, Ordering::SeqCst);
                Ok(Some(vec![9]))
            }),
        ];

        let picked = first_populated_tier(tiers, async {
            terminal_ran.store(true, Ordering::SeqCst);
            Ok(vec![7])
        })
        .await
        .unwrap();

        assert_eq!(picked, vec![1, 2, 3]);
        assert!(!later_tier_ran.load(Ordering::SeqCst));
        assert!(!terminal_ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_empty_tiers_fall_through_in_order() {
        let tiers: Vec<TierFuture<'_, i32>> = vec![
            Box::pin(async { Ok(None) }),
            Box::pin(async { Ok(Some(vec![5, 6])) }),
        ];

        let picked = first_populated_tier(tiers, async { Ok(vec![7]) })
            .await
            .unwrap();

        assert_eq!(picked, vec![5, 6]);
    }

    #[tokio::test]
    async fn test_terminal_tier_result_returned_as_is() {
        let tiers: Vec<TierFuture<'_, i32>> = vec![Box::pin(async { Ok(None) })];

        let picked = first_populated_tier(tiers, async { Ok(Vec::new()) })
            .await
            .unwrap();

        assert!(picked.is_empty());
    }

    #[tokio::test]
    async fn test_tier_error_propagates() {
        let tiers: Vec<TierFuture<'_, i32>> = vec![Box::pin(async {
            Err(crate::core::error::AppError::Internal(
                "store unavailable".to_string(),
            ))
        })];

        let result = first_populated_tier(tiers, async { Ok(vec![7]) }).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_non_empty_helper() {
        assert_eq!(non_empty(Vec::<i32>::new()), None);
        assert_eq!(non_empty(vec![1]), Some(vec![1]));
    }

    #[test]
    fn test_cached_entry_freshness() {
        let entry = CachedEntry {
            summaries: vec![],
            fetched_at: Instant::now(),
        };
        assert!(entry.is_fresh(Duration::from_secs(30)));
        assert!(!entry.is_fresh(Duration::ZERO));
    }

    #[test]
    fn test_cached_entry_expires() {
        let entry = CachedEntry {
            summaries: vec![],
            fetched_at: Instant::now() - Duration::from_secs(60),
        };
        assert!(!entry.is_fresh(Duration::from_secs(30)));
    }
}
