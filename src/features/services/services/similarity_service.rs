use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::services::dtos::ServiceSummaryDto;
use crate::features::services::models::{ServiceWithExecutor, SERVICE_WITH_EXECUTOR_COLUMNS};
use crate::features::services::services::service_catalog_service::summaries_for;

/// Finds services related to a reference service by shared category
/// and overlapping subcategory sets.
pub struct SimilarityService {
    pool: PgPool,
}

struct Reference {
    category_id: Option<Uuid>,
    subcategory_ids: Vec<Uuid>,
}

impl SimilarityService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Services in the same category sharing at least one subcategory with
    /// the reference. Excludes the reference itself and ownerless rows;
    /// returns an empty list when the reference is missing or carries no
    /// subcategories.
    pub async fn find_similar(&self, reference_id: Uuid) -> Result<Vec<ServiceSummaryDto>> {
        let Some(reference) = self.load_reference(reference_id).await? else {
            return Ok(vec![]);
        };

        if reference.subcategory_ids.is_empty() {
            return Ok(vec![]);
        }

        let sql = similar_candidates_sql(reference.category_id.is_some());
        let mut query = sqlx::query_as::<_, ServiceWithExecutor>(&sql).bind(reference_id);
        if let Some(category_id) = reference.category_id {
            query = query.bind(category_id);
        }
        query = query.bind(&reference.subcategory_ids);

        let rows = query.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to find similar services: {:?}", e);
            AppError::Database(e)
        })?;

        summaries_for(&self.pool, rows).await
    }

    async fn load_reference(&self, id: Uuid) -> Result<Option<Reference>> {
        let category_id: Option<Option<Uuid>> =
            sqlx::query_scalar("SELECT category_id FROM services WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to load reference service: {:?}", e);
                    AppError::Database(e)
                })?;

        let Some(category_id) = category_id else {
            return Ok(None);
        };

        let subcategory_ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT subcategory_id FROM service_subcategories WHERE service_id = $1",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load reference subcategories: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(Some(Reference {
            category_id,
            subcategory_ids,
        }))
    }
}

/// Candidate query for [`SimilarityService::find_similar`]. Binds the
/// reference id ($1), the reference category when present ($2), and the
/// reference subcategory id set (last parameter). The inner join drops
/// ownerless rows; subcategory overlap is an EXISTS membership test, so
/// a candidate sharing several subcategories still appears once.
fn similar_candidates_sql(has_category: bool) -> String {
    // NULL never equals NULL in SQL, so a category-less reference
    // needs the IS NULL branch
    let category_predicate = if has_category {
        "s.category_id = $2"
    } else {
        "s.category_id IS NULL"
    };

    format!(
        "SELECT {SERVICE_WITH_EXECUTOR_COLUMNS} FROM services s \
         JOIN users u ON u.id = s.executor_id \
         WHERE s.id <> $1 \
           AND {category_predicate} \
           AND EXISTS (SELECT 1 FROM service_subcategories ssc \
                       WHERE ssc.service_id = s.id \
                         AND ssc.subcategory_id = ANY(${subcategory_param})) \
         ORDER BY s.popularity DESC, s.created_at DESC",
        subcategory_param = if has_category { 3 } else { 2 },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_exclude_reference_and_ownerless_rows() {
        for sql in [similar_candidates_sql(true), similar_candidates_sql(false)] {
            assert!(sql.contains("s.id <> $1"));
            assert!(sql.contains("JOIN users u ON u.id = s.executor_id"));
            assert!(!sql.contains("LEFT JOIN"));
        }
    }

    #[test]
    fn test_candidates_use_membership_test_not_a_row_multiplying_join() {
        for sql in [similar_candidates_sql(true), similar_candidates_sql(false)] {
            assert!(sql.contains("EXISTS (SELECT 1 FROM service_subcategories"));
            assert!(!sql.contains("JOIN service_subcategories"));
        }
    }

    #[test]
    fn test_candidates_ranked_by_popularity_then_recency() {
        for sql in [similar_candidates_sql(true), similar_candidates_sql(false)] {
            assert!(sql.ends_with("ORDER BY s.popularity DESC, s.created_at DESC"));
        }
    }

    #[test]
    fn test_category_branch_parameterization() {
        let with_category = similar_candidates_sql(true);
        assert!(with_category.contains("s.category_id = $2"));
        assert!(with_category.contains("ANY($3)"));

        let without_category = similar_candidates_sql(false);
        assert!(without_category.contains("s.category_id IS NULL"));
        assert!(without_category.contains("ANY($2)"));
    }
}
