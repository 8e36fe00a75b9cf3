use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::favorites::dtos::{CreateFavoriteDto, FavoriteResponseDto};
use crate::features::favorites::services::FavoriteService;
use crate::shared::types::ApiResponse;

/// List the authenticated user's favorites
#[utoipa::path(
    get,
    path = "/api/favorites",
    responses(
        (status = 200, description = "List of favorites", body = ApiResponse<Vec<FavoriteResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "favorites"
)]
pub async fn list_favorites(
    user: AuthenticatedUser,
    State(service): State<Arc<FavoriteService>>,
) -> Result<Json<ApiResponse<Vec<FavoriteResponseDto>>>> {
    let favorites = service.list(user.id).await?;
    Ok(Json(ApiResponse::success(Some(favorites), None, None)))
}

/// Bookmark a service
#[utoipa::path(
    post,
    path = "/api/favorites",
    request_body = CreateFavoriteDto,
    responses(
        (status = 201, description = "Favorite created", body = ApiResponse<FavoriteResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Service not found"),
        (status = 409, description = "Already favorited")
    ),
    security(("bearer_auth" = [])),
    tag = "favorites"
)]
pub async fn add_favorite(
    user: AuthenticatedUser,
    State(service): State<Arc<FavoriteService>>,
    AppJson(dto): AppJson<CreateFavoriteDto>,
) -> Result<(StatusCode, Json<ApiResponse<FavoriteResponseDto>>)> {
    let favorite = service.add(user.id, dto.service_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(favorite), None, None)),
    ))
}

/// Remove a bookmarked service
#[utoipa::path(
    delete,
    path = "/api/favorites/{service_id}",
    params(
        ("service_id" = Uuid, Path, description = "Service ID")
    ),
    responses(
        (status = 200, description = "Favorite removed", body = ApiResponse<Object>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not favorited")
    ),
    security(("bearer_auth" = [])),
    tag = "favorites"
)]
pub async fn remove_favorite(
    user: AuthenticatedUser,
    State(service): State<Arc<FavoriteService>>,
    Path(service_id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.remove(user.id, service_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Favorite removed".to_string()),
        None,
    )))
}
