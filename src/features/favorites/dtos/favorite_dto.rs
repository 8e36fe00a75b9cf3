use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::favorites::models::Favorite;
use crate::features::services::dtos::ServiceSummaryDto;

/// Request DTO for bookmarking a service
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateFavoriteDto {
    pub service_id: Uuid,
}

/// Response DTO for a favorite with its service summary
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FavoriteResponseDto {
    pub id: Uuid,
    pub service: ServiceSummaryDto,
    pub created_at: DateTime<Utc>,
}

impl FavoriteResponseDto {
    pub fn new(favorite: Favorite, service: ServiceSummaryDto) -> Self {
        Self {
            id: favorite.id,
            service,
            created_at: favorite.created_at,
        }
    }
}
