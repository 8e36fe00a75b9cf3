use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::categories::dtos::{CategoryResponseDto, SubCategoryResponseDto};
use crate::features::categories::services::CategoryService;
use crate::shared::types::ApiResponse;

/// Query params for listing subcategories
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListSubCategoriesQuery {
    /// Restrict to subcategories of this category
    pub category_id: Option<Uuid>,
}

/// List all categories
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<Vec<CategoryResponseDto>>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories = service.list().await?;
    Ok(Json(ApiResponse::success(Some(categories), None, None)))
}

/// Get category by id
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// List subcategories (optionally scoped to a category)
#[utoipa::path(
    get,
    path = "/api/subcategories",
    params(ListSubCategoriesQuery),
    responses(
        (status = 200, description = "List of subcategories", body = ApiResponse<Vec<SubCategoryResponseDto>>),
    ),
    tag = "categories"
)]
pub async fn list_subcategories(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<ListSubCategoriesQuery>,
) -> Result<Json<ApiResponse<Vec<SubCategoryResponseDto>>>> {
    let subcategories = service.list_subcategories(query.category_id).await?;
    Ok(Json(ApiResponse::success(Some(subcategories), None, None)))
}

/// Get subcategory by id
#[utoipa::path(
    get,
    path = "/api/subcategories/{id}",
    params(
        ("id" = Uuid, Path, description = "Subcategory id")
    ),
    responses(
        (status = 200, description = "Subcategory found", body = ApiResponse<SubCategoryResponseDto>),
        (status = 404, description = "Subcategory not found")
    ),
    tag = "categories"
)]
pub async fn get_subcategory(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SubCategoryResponseDto>>> {
    let subcategory = service.get_subcategory(id).await?;
    Ok(Json(ApiResponse::success(Some(subcategory), None, None)))
}
