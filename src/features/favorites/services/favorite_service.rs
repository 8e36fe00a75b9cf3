use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::favorites::dtos::FavoriteResponseDto;
use crate::features::favorites::models::Favorite;
use crate::features::services::dtos::ServiceSummaryDto;
use crate::features::services::models::{ServiceWithExecutor, SERVICE_WITH_EXECUTOR_COLUMNS};
use crate::features::services::services::summaries_for;

/// Service for a user's bookmarked services
pub struct FavoriteService {
    pool: PgPool,
}

impl FavoriteService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Bookmark a service for a user. Bookmarking twice is a conflict.
    pub async fn add(&self, user_id: Uuid, service_id: Uuid) -> Result<FavoriteResponseDto> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM services WHERE id = $1)")
            .bind(service_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check service: {:?}", e);
                AppError::Database(e)
            })?;
        if !exists {
            return Err(AppError::NotFound(format!(
                "Service {} not found",
                service_id
            )));
        }

        let favorite = sqlx::query_as::<_, Favorite>(
            r#"
            INSERT INTO favorites (id, user_id, service_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, service_id) DO NOTHING
            RETURNING id, user_id, service_id, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(service_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to add favorite: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::Conflict("Service is already favorited".to_string()))?;

        let mut summaries = self.summaries_by_id(&[service_id]).await?;
        let summary = summaries
            .remove(&service_id)
            .ok_or_else(|| AppError::Internal("Favorited service vanished".to_string()))?;

        Ok(FavoriteResponseDto::new(favorite, summary))
    }

    /// List a user's favorites, newest first
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<FavoriteResponseDto>> {
        let favorites = sqlx::query_as::<_, Favorite>(
            r#"
            SELECT id, user_id, service_id, created_at
            FROM favorites
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list favorites: {:?}", e);
            AppError::Database(e)
        })?;

        let service_ids: Vec<Uuid> = favorites.iter().map(|f| f.service_id).collect();
        let mut summaries = self.summaries_by_id(&service_ids).await?;

        // Favorites of deleted services are removed by cascade; a missing
        // summary here would mean a torn read, so just skip it
        Ok(favorites
            .into_iter()
            .filter_map(|favorite| {
                let summary = summaries.remove(&favorite.service_id)?;
                Some(FavoriteResponseDto::new(favorite, summary))
            })
            .collect())
    }

    /// Remove a user's bookmark of a service
    pub async fn remove(&self, user_id: Uuid, service_id: Uuid) -> Result<()> {
        let removed = sqlx::query(
            "DELETE FROM favorites WHERE user_id = $1 AND service_id = $2",
        )
        .bind(user_id)
        .bind(service_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to remove favorite: {:?}", e);
            AppError::Database(e)
        })?;

        if removed.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Service {} is not favorited",
                service_id
            )));
        }
        Ok(())
    }

    async fn summaries_by_id(
        &self,
        service_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, ServiceSummaryDto>> {
        if service_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, ServiceWithExecutor>(&format!(
            "SELECT {SERVICE_WITH_EXECUTOR_COLUMNS} FROM services s \
             LEFT JOIN users u ON u.id = s.executor_id \
             WHERE s.id = ANY($1)"
        ))
        .bind(service_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load favorited services: {:?}", e);
            AppError::Database(e)
        })?;

        let summaries = summaries_for(&self.pool, rows).await?;
        Ok(summaries.into_iter().map(|s| (s.id, s)).collect())
    }
}
