use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::categories::models::{Category, SubCategory};

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            photo_url: c.photo_url,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Response DTO for subcategory
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubCategoryResponseDto {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<SubCategory> for SubCategoryResponseDto {
    fn from(s: SubCategory) -> Self {
        Self {
            id: s.id,
            category_id: s.category_id,
            name: s.name,
            description: s.description,
            created_at: s.created_at,
        }
    }
}
