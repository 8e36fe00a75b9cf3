use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, OptionalViewer};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::services::dtos::{
    CreateServiceDto, ServiceDetailDto, ServiceSummaryDto, UpdateServiceDto,
};
use crate::features::services::models::ExperienceLevel;
use crate::features::services::services::{
    RecommendationService, SearchHistoryService, ServiceCatalogService, ServiceFilter,
    ServiceOrdering, SimilarityService,
};
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// State for service discovery handlers
#[derive(Clone)]
pub struct ServiceState {
    pub catalog: Arc<ServiceCatalogService>,
    pub history: Arc<SearchHistoryService>,
    pub similarity: Arc<SimilarityService>,
    pub recommendations: Arc<RecommendationService>,
}

/// Query parameters for the catalog listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct ServiceListQuery {
    /// Exact category match
    pub category_id: Option<Uuid>,
    /// Service must carry this subcategory
    pub subcategory_id: Option<Uuid>,
    /// Exact experience bracket match
    pub experience: Option<ExperienceLevel>,
    /// Inclusive lower price bound
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound
    pub max_price: Option<Decimal>,
    /// Case-insensitive substring match on title or description
    pub search: Option<String>,
    /// Sort order; prefix with `-` for descending
    #[serde(default)]
    pub ordering: ServiceOrdering,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    crate::shared::constants::DEFAULT_PAGE_SIZE
}

impl ServiceListQuery {
    fn split(self) -> (ServiceFilter, ServiceOrdering, PaginationQuery) {
        let filter = ServiceFilter {
            category_id: self.category_id,
            subcategory_id: self.subcategory_id,
            experience: self.experience,
            min_price: self.min_price,
            max_price: self.max_price,
            search: self.search,
        };
        let pagination = PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        };
        (filter, self.ordering, pagination)
    }
}

/// List services with filtering, ordering and pagination (public)
#[utoipa::path(
    get,
    path = "/api/services",
    params(ServiceListQuery),
    responses(
        (status = 200, description = "Page of matching services", body = ApiResponse<Vec<ServiceSummaryDto>>)
    ),
    tag = "services"
)]
pub async fn list_services(
    OptionalViewer(viewer): OptionalViewer,
    State(state): State<ServiceState>,
    Query(query): Query<ServiceListQuery>,
) -> Result<Json<ApiResponse<Vec<ServiceSummaryDto>>>> {
    let (filter, ordering, pagination) = query.split();

    // Search history is a side effect of searching, never a reason to fail
    if let Some(term) = filter.search_term() {
        if let Some(viewer) = viewer.as_ref().filter(|v| v.is_client()) {
            if let Err(e) = state.history.record(viewer.id, term).await {
                tracing::warn!("Failed to log search query: {:?}", e);
            }
        }
    }

    let (summaries, total) = state.catalog.list(&filter, ordering, &pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(summaries),
        None,
        Some(Meta { total }),
    )))
}

/// Get service by ID (public; favorite annotation reflects the viewer)
#[utoipa::path(
    get,
    path = "/api/services/{id}",
    params(
        ("id" = Uuid, Path, description = "Service ID")
    ),
    responses(
        (status = 200, description = "Service found", body = ApiResponse<ServiceDetailDto>),
        (status = 404, description = "Service not found")
    ),
    tag = "services"
)]
pub async fn get_service(
    OptionalViewer(viewer): OptionalViewer,
    State(state): State<ServiceState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ServiceDetailDto>>> {
    let detail = state
        .catalog
        .get_detail(id, viewer.map(|v| v.id))
        .await?;
    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}

/// Recommended services for the viewer (public)
#[utoipa::path(
    get,
    path = "/api/services/recommended",
    responses(
        (status = 200, description = "Recommended services", body = ApiResponse<Vec<ServiceSummaryDto>>)
    ),
    tag = "services"
)]
pub async fn recommended_services(
    OptionalViewer(viewer): OptionalViewer,
    State(state): State<ServiceState>,
) -> Result<Json<ApiResponse<Vec<ServiceSummaryDto>>>> {
    let summaries = state
        .recommendations
        .recommend(viewer.map(|v| v.id))
        .await?;
    Ok(Json(ApiResponse::success(Some(summaries), None, None)))
}

/// Services similar to the given one
#[utoipa::path(
    get,
    path = "/api/services/similar/{id}",
    params(
        ("id" = Uuid, Path, description = "Reference service ID")
    ),
    responses(
        (status = 200, description = "Similar services (empty when none)", body = ApiResponse<Vec<ServiceSummaryDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "services"
)]
pub async fn similar_services(
    _user: AuthenticatedUser,
    State(state): State<ServiceState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ServiceSummaryDto>>>> {
    let summaries = state.similarity.find_similar(id).await?;
    Ok(Json(ApiResponse::success(Some(summaries), None, None)))
}

/// List the authenticated executor's own services
#[utoipa::path(
    get,
    path = "/api/services/my",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Page of own services", body = ApiResponse<Vec<ServiceSummaryDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "services"
)]
pub async fn my_services(
    user: AuthenticatedUser,
    State(state): State<ServiceState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ServiceSummaryDto>>>> {
    let (summaries, total) = state.catalog.my_services(user.id, &pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(summaries),
        None,
        Some(Meta { total }),
    )))
}

/// Publish a new service (executors only)
#[utoipa::path(
    post,
    path = "/api/services",
    request_body = CreateServiceDto,
    responses(
        (status = 201, description = "Service created", body = ApiResponse<ServiceDetailDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an executor"),
        (status = 422, description = "Validation failed")
    ),
    security(("bearer_auth" = [])),
    tag = "services"
)]
pub async fn create_service(
    user: AuthenticatedUser,
    State(state): State<ServiceState>,
    AppJson(dto): AppJson<CreateServiceDto>,
) -> Result<(StatusCode, Json<ApiResponse<ServiceDetailDto>>)> {
    if !user.is_executor() {
        return Err(AppError::Forbidden(
            "Only executors may publish services".to_string(),
        ));
    }
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let detail = state.catalog.create(user.id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(detail), None, None)),
    ))
}

/// Update an owned service
#[utoipa::path(
    put,
    path = "/api/services/{id}",
    params(
        ("id" = Uuid, Path, description = "Service ID")
    ),
    request_body = UpdateServiceDto,
    responses(
        (status = 200, description = "Service updated", body = ApiResponse<ServiceDetailDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Service not found")
    ),
    security(("bearer_auth" = [])),
    tag = "services"
)]
pub async fn update_service(
    user: AuthenticatedUser,
    State(state): State<ServiceState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateServiceDto>,
) -> Result<Json<ApiResponse<ServiceDetailDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let detail = state.catalog.update(user.id, id, dto).await?;
    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}

/// Delete an owned service
#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    params(
        ("id" = Uuid, Path, description = "Service ID")
    ),
    responses(
        (status = 200, description = "Service deleted", body = ApiResponse<Object>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Service not found")
    ),
    security(("bearer_auth" = [])),
    tag = "services"
)]
pub async fn delete_service(
    user: AuthenticatedUser,
    State(state): State<ServiceState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    state.catalog.delete(user.id, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Service deleted".to_string()),
        None,
    )))
}
