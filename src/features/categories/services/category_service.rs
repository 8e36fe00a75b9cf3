use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{CategoryResponseDto, SubCategoryResponseDto};
use crate::features::categories::models::{Category, SubCategory};

/// Service for category and subcategory reads
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all categories
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, photo_url, created_at, updated_at
            FROM categories
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// Get category by id
    pub async fn get(&self, id: Uuid) -> Result<CategoryResponseDto> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, photo_url, created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get category: {:?}", e);
            AppError::Database(e)
        })?;

        category
            .map(|c| c.into())
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    /// List subcategories, optionally scoped to a parent category
    pub async fn list_subcategories(
        &self,
        category_id: Option<Uuid>,
    ) -> Result<Vec<SubCategoryResponseDto>> {
        let subcategories = match category_id {
            Some(category_id) => {
                sqlx::query_as::<_, SubCategory>(
                    r#"
                    SELECT id, category_id, name, description, created_at
                    FROM subcategories
                    WHERE category_id = $1
                    ORDER BY name
                    "#,
                )
                .bind(category_id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, SubCategory>(
                    r#"
                    SELECT id, category_id, name, description, created_at
                    FROM subcategories
                    ORDER BY name
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| {
            tracing::error!("Failed to list subcategories: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(subcategories.into_iter().map(|s| s.into()).collect())
    }

    /// Get subcategory by id
    pub async fn get_subcategory(&self, id: Uuid) -> Result<SubCategoryResponseDto> {
        let subcategory = sqlx::query_as::<_, SubCategory>(
            r#"
            SELECT id, category_id, name, description, created_at
            FROM subcategories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get subcategory: {:?}", e);
            AppError::Database(e)
        })?;

        subcategory
            .map(|s| s.into())
            .ok_or_else(|| AppError::NotFound(format!("Subcategory {} not found", id)))
    }
}
