use std::collections::HashSet;

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::SubCategoryResponseDto;
use crate::features::services::dtos::{
    CreateServiceDto, ServiceDetailDto, ServicePhotoDto, ServiceSummaryDto, UpdateServiceDto,
};
use crate::features::services::models::{
    ServicePhoto, ServiceSubCategoryRow, ServiceWithExecutor, SERVICE_WITH_EXECUTOR_COLUMNS,
};
use crate::features::services::services::filter::{ServiceFilter, ServiceOrdering};
use crate::shared::types::PaginationQuery;

/// Service for catalog listing, lookup and executor-side CRUD
pub struct ServiceCatalogService {
    pool: PgPool,
}

/// Load subcategories and photos for a page of service rows and
/// assemble summaries, preserving row order.
pub(crate) async fn summaries_for(
    pool: &PgPool,
    rows: Vec<ServiceWithExecutor>,
) -> Result<Vec<ServiceSummaryDto>> {
    if rows.is_empty() {
        return Ok(vec![]);
    }

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

    let subcategories = sqlx::query_as::<_, ServiceSubCategoryRow>(
        r#"
        SELECT ssc.service_id, sc.id, sc.category_id, sc.name, sc.description, sc.created_at
        FROM service_subcategories ssc
        JOIN subcategories sc ON sc.id = ssc.subcategory_id
        WHERE ssc.service_id = ANY($1)
        ORDER BY sc.name
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to load service subcategories: {:?}", e);
        AppError::Database(e)
    })?;

    let photos = sqlx::query_as::<_, ServicePhoto>(
        r#"
        SELECT id, service_id, photo_url, created_at
        FROM service_photos
        WHERE service_id = ANY($1)
        ORDER BY created_at
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to load service photos: {:?}", e);
        AppError::Database(e)
    })?;

    Ok(ServiceSummaryDto::assemble(rows, subcategories, photos))
}

impl ServiceCatalogService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List services matching a filter, with total count for pagination meta
    pub async fn list(
        &self,
        filter: &ServiceFilter,
        ordering: ServiceOrdering,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<ServiceSummaryDto>, i64)> {
        let mut count_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM services s");
        filter.push_predicates(&mut count_builder);

        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count services: {:?}", e);
                AppError::Database(e)
            })?;

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {SERVICE_WITH_EXECUTOR_COLUMNS} FROM services s \
             LEFT JOIN users u ON u.id = s.executor_id"
        ));
        filter.push_predicates(&mut builder);
        builder.push(ordering.sql());
        builder.push(" LIMIT ");
        builder.push_bind(pagination.limit());
        builder.push(" OFFSET ");
        builder.push_bind(pagination.offset());

        let rows = builder
            .build_query_as::<ServiceWithExecutor>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list services: {:?}", e);
                AppError::Database(e)
            })?;

        let summaries = summaries_for(&self.pool, rows).await?;
        Ok((summaries, total))
    }

    /// Get a single service with viewer-context annotation
    pub async fn get_detail(&self, id: Uuid, viewer_id: Option<Uuid>) -> Result<ServiceDetailDto> {
        let row = self.fetch_with_executor(id).await?;

        let subcategories = sqlx::query_as::<_, ServiceSubCategoryRow>(
            r#"
            SELECT ssc.service_id, sc.id, sc.category_id, sc.name, sc.description, sc.created_at
            FROM service_subcategories ssc
            JOIN subcategories sc ON sc.id = ssc.subcategory_id
            WHERE ssc.service_id = $1
            ORDER BY sc.name
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load service subcategories: {:?}", e);
            AppError::Database(e)
        })?;

        let photos = sqlx::query_as::<_, ServicePhoto>(
            r#"
            SELECT id, service_id, photo_url, created_at
            FROM service_photos
            WHERE service_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load service photos: {:?}", e);
            AppError::Database(e)
        })?;

        let is_favorited = match viewer_id {
            Some(viewer_id) => self.is_favorited(viewer_id, id).await?,
            None => false,
        };

        Ok(ServiceDetailDto::from_parts(
            row,
            subcategories
                .into_iter()
                .map(|s| SubCategoryResponseDto {
                    id: s.id,
                    category_id: s.category_id,
                    name: s.name,
                    description: s.description,
                    created_at: s.created_at,
                })
                .collect(),
            photos.into_iter().map(ServicePhotoDto::from).collect(),
            is_favorited,
        ))
    }

    /// List the services owned by an executor
    pub async fn my_services(
        &self,
        executor_id: Uuid,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<ServiceSummaryDto>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM services WHERE executor_id = $1")
                .bind(executor_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count own services: {:?}", e);
                    AppError::Database(e)
                })?;

        let rows = sqlx::query_as::<_, ServiceWithExecutor>(&format!(
            "SELECT {SERVICE_WITH_EXECUTOR_COLUMNS} FROM services s \
             LEFT JOIN users u ON u.id = s.executor_id \
             WHERE s.executor_id = $1 \
             ORDER BY s.created_at DESC \
             LIMIT $2 OFFSET $3"
        ))
        .bind(executor_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list own services: {:?}", e);
            AppError::Database(e)
        })?;

        let summaries = summaries_for(&self.pool, rows).await?;
        Ok((summaries, total))
    }

    /// Publish a new service owned by the given executor
    pub async fn create(&self, executor_id: Uuid, dto: CreateServiceDto) -> Result<ServiceDetailDto> {
        let subcategory_ids = dedup_ids(dto.subcategory_ids);
        self.ensure_subcategories_exist(&subcategory_ids).await?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let service_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO services
                (id, executor_id, category_id, title, description, price, currency,
                 experience, phone_number)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(executor_id)
        .bind(dto.category_id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.price)
        .bind(dto.currency)
        .bind(dto.experience)
        .bind(&dto.phone_number)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert service: {:?}", e);
            AppError::Database(e)
        })?;

        Self::insert_subcategories(&mut tx, service_id, &subcategory_ids).await?;
        Self::insert_photos(&mut tx, service_id, &dto.photo_urls).await?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit service creation: {:?}", e);
            AppError::Database(e)
        })?;

        self.get_detail(service_id, Some(executor_id)).await
    }

    /// Update a service; only its owner may do so
    pub async fn update(
        &self,
        executor_id: Uuid,
        id: Uuid,
        dto: UpdateServiceDto,
    ) -> Result<ServiceDetailDto> {
        self.ensure_owned_by(id, executor_id).await?;

        let subcategory_ids = dto.subcategory_ids.map(dedup_ids);
        if let Some(ids) = subcategory_ids.as_deref() {
            self.ensure_subcategories_exist(ids).await?;
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        sqlx::query(
            r#"
            UPDATE services SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category_id = COALESCE($4, category_id),
                price = COALESCE($5, price),
                currency = COALESCE($6, currency),
                experience = COALESCE($7, experience),
                phone_number = COALESCE($8, phone_number),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(dto.title)
        .bind(dto.description)
        .bind(dto.category_id)
        .bind(dto.price)
        .bind(dto.currency)
        .bind(dto.experience)
        .bind(dto.phone_number)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update service: {:?}", e);
            AppError::Database(e)
        })?;

        if let Some(subcategory_ids) = subcategory_ids {
            sqlx::query("DELETE FROM service_subcategories WHERE service_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to clear service subcategories: {:?}", e);
                    AppError::Database(e)
                })?;
            Self::insert_subcategories(&mut tx, id, &subcategory_ids).await?;
        }

        if let Some(photo_urls) = dto.photo_urls {
            sqlx::query("DELETE FROM service_photos WHERE service_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to clear service photos: {:?}", e);
                    AppError::Database(e)
                })?;
            Self::insert_photos(&mut tx, id, &photo_urls).await?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit service update: {:?}", e);
            AppError::Database(e)
        })?;

        self.get_detail(id, Some(executor_id)).await
    }

    /// Delete a service; only its owner may do so
    pub async fn delete(&self, executor_id: Uuid, id: Uuid) -> Result<()> {
        self.ensure_owned_by(id, executor_id).await?;

        sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete service: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(())
    }

    async fn fetch_with_executor(&self, id: Uuid) -> Result<ServiceWithExecutor> {
        sqlx::query_as::<_, ServiceWithExecutor>(&format!(
            "SELECT {SERVICE_WITH_EXECUTOR_COLUMNS} FROM services s \
             LEFT JOIN users u ON u.id = s.executor_id \
             WHERE s.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get service: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Service {} not found", id)))
    }

    async fn ensure_owned_by(&self, id: Uuid, executor_id: Uuid) -> Result<()> {
        let owner: Option<Option<Uuid>> =
            sqlx::query_scalar("SELECT executor_id FROM services WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to check service owner: {:?}", e);
                    AppError::Database(e)
                })?;

        match owner {
            None => Err(AppError::NotFound(format!("Service {} not found", id))),
            Some(Some(owner_id)) if owner_id == executor_id => Ok(()),
            Some(_) => Err(AppError::Forbidden(
                "Only the service owner may modify it".to_string(),
            )),
        }
    }

    /// Expects `ids` to already be deduplicated; COUNT matches distinct rows
    async fn ensure_subcategories_exist(&self, ids: &[Uuid]) -> Result<()> {
        let known: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM subcategories WHERE id = ANY($1)")
                .bind(ids)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to check subcategories: {:?}", e);
                    AppError::Database(e)
                })?;

        if known != ids.len() as i64 {
            return Err(AppError::Validation(
                "One or more subcategories do not exist".to_string(),
            ));
        }
        Ok(())
    }

    async fn is_favorited(&self, user_id: Uuid, service_id: Uuid) -> Result<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE user_id = $1 AND service_id = $2)",
        )
        .bind(user_id)
        .bind(service_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check favorite: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn insert_subcategories(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        service_id: Uuid,
        subcategory_ids: &[Uuid],
    ) -> Result<()> {
        for subcategory_id in subcategory_ids {
            sqlx::query(
                "INSERT INTO service_subcategories (service_id, subcategory_id) \
                 VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(service_id)
            .bind(subcategory_id)
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to attach subcategory: {:?}", e);
                AppError::Database(e)
            })?;
        }
        Ok(())
    }

    async fn insert_photos(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        service_id: Uuid,
        photo_urls: &[String],
    ) -> Result<()> {
        for photo_url in photo_urls {
            sqlx::query(
                "INSERT INTO service_photos (id, service_id, photo_url) VALUES ($1, $2, $3)",
            )
            .bind(Uuid::now_v7())
            .bind(service_id)
            .bind(photo_url)
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to attach photo: {:?}", e);
                AppError::Database(e)
            })?;
        }
        Ok(())
    }
}

/// Collapse repeated ids, keeping first-seen order. A request carrying
/// `[A, A]` links subcategory A once rather than tripping the existence
/// check with a misleading error.
fn dedup_ids(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_ids_collapses_repeats_preserving_order() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        assert_eq!(dedup_ids(vec![a, b, a, a, b]), vec![a, b]);
    }

    #[test]
    fn test_dedup_ids_leaves_unique_ids_untouched() {
        let ids = vec![Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7()];
        assert_eq!(dedup_ids(ids.clone()), ids);
    }
}
