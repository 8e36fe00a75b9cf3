use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::model::UserRole;
use crate::features::categories::dtos::SubCategoryResponseDto;
use crate::features::services::models::{
    Currency, ExperienceLevel, ServicePhoto, ServiceSubCategoryRow, ServiceWithExecutor,
};
use crate::shared::validation::PHONE_REGEX;

/// Executor identity as shown alongside a service
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExecutorSummaryDto {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub role: Option<UserRole>,
    pub avatar: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl ExecutorSummaryDto {
    /// Build from the joined executor columns; None for ownerless rows
    fn from_row(row: &ServiceWithExecutor) -> Option<Self> {
        let id = row.executor_id?;
        let username = row.executor_username.clone()?;

        Some(Self {
            id,
            username,
            full_name: full_name(
                row.executor_first_name.as_deref(),
                row.executor_last_name.as_deref(),
            ),
            role: row.executor_role,
            avatar: row.executor_avatar.clone(),
            phone_number: row.executor_phone.clone(),
            email: row.executor_email.clone(),
        })
    }
}

fn full_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let joined = format!("{} {}", first.unwrap_or(""), last.unwrap_or(""));
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServicePhotoDto {
    pub id: Uuid,
    pub photo_url: String,
}

impl From<ServicePhoto> for ServicePhotoDto {
    fn from(p: ServicePhoto) -> Self {
        Self {
            id: p.id,
            photo_url: p.photo_url,
        }
    }
}

/// Service summary for list, similarity and recommendation responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceSummaryDto {
    pub id: Uuid,
    pub executor: Option<ExecutorSummaryDto>,
    pub title: String,
    pub category_id: Option<Uuid>,
    pub subcategories: Vec<SubCategoryResponseDto>,
    pub price: Option<Decimal>,
    pub currency: Currency,
    pub experience: ExperienceLevel,
    pub phone_number: String,
    pub popularity: i32,
    pub created_at: DateTime<Utc>,
    pub photos: Vec<ServicePhotoDto>,
}

impl ServiceSummaryDto {
    /// Attach subcategories and photos to a page of service rows.
    /// Row order is preserved; related rows belonging to services outside
    /// the page are ignored.
    pub fn assemble(
        rows: Vec<ServiceWithExecutor>,
        subcategories: Vec<ServiceSubCategoryRow>,
        photos: Vec<ServicePhoto>,
    ) -> Vec<ServiceSummaryDto> {
        let mut subcategories_by_service: HashMap<Uuid, Vec<SubCategoryResponseDto>> =
            HashMap::new();
        for row in subcategories {
            subcategories_by_service
                .entry(row.service_id)
                .or_default()
                .push(SubCategoryResponseDto {
                    id: row.id,
                    category_id: row.category_id,
                    name: row.name,
                    description: row.description,
                    created_at: row.created_at,
                });
        }

        let mut photos_by_service: HashMap<Uuid, Vec<ServicePhotoDto>> = HashMap::new();
        for photo in photos {
            photos_by_service
                .entry(photo.service_id)
                .or_default()
                .push(photo.into());
        }

        rows.into_iter()
            .map(|row| {
                let executor = ExecutorSummaryDto::from_row(&row);
                ServiceSummaryDto {
                    id: row.id,
                    executor,
                    title: row.title,
                    category_id: row.category_id,
                    subcategories: subcategories_by_service.remove(&row.id).unwrap_or_default(),
                    price: row.price,
                    currency: row.currency,
                    experience: row.experience,
                    phone_number: row.phone_number,
                    popularity: row.popularity,
                    created_at: row.created_at,
                    photos: photos_by_service.remove(&row.id).unwrap_or_default(),
                }
            })
            .collect()
    }
}

/// Full service representation with viewer-context annotation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceDetailDto {
    pub id: Uuid,
    pub executor: Option<ExecutorSummaryDto>,
    pub title: String,
    pub description: String,
    pub category_id: Option<Uuid>,
    pub subcategories: Vec<SubCategoryResponseDto>,
    pub price: Option<Decimal>,
    pub currency: Currency,
    pub experience: ExperienceLevel,
    pub phone_number: String,
    pub popularity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub photos: Vec<ServicePhotoDto>,
    /// Whether the requesting viewer has favorited this service
    pub is_favorited: bool,
}

impl ServiceDetailDto {
    pub fn from_parts(
        row: ServiceWithExecutor,
        subcategories: Vec<SubCategoryResponseDto>,
        photos: Vec<ServicePhotoDto>,
        is_favorited: bool,
    ) -> Self {
        let executor = ExecutorSummaryDto::from_row(&row);
        Self {
            id: row.id,
            executor,
            title: row.title,
            description: row.description,
            category_id: row.category_id,
            subcategories,
            price: row.price,
            currency: row.currency,
            experience: row.experience,
            phone_number: row.phone_number,
            popularity: row.popularity,
            created_at: row.created_at,
            updated_at: row.updated_at,
            photos,
            is_favorited,
        }
    }
}

/// Request DTO for publishing a service
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateServiceDto {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: String,

    pub category_id: Option<Uuid>,

    #[validate(length(min = 1, max = 5, message = "A service carries 1-5 subcategories"))]
    pub subcategory_ids: Vec<Uuid>,

    pub price: Option<Decimal>,

    #[serde(default)]
    pub currency: Currency,

    pub experience: ExperienceLevel,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone_number: String,

    #[validate(length(min = 1, max = 6, message = "A service carries 1-6 photos"))]
    pub photo_urls: Vec<String>,
}

/// Request DTO for updating a service; absent fields are left unchanged
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateServiceDto {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: Option<String>,

    pub category_id: Option<Uuid>,

    #[validate(length(min = 1, max = 5, message = "A service carries 1-5 subcategories"))]
    pub subcategory_ids: Option<Vec<Uuid>>,

    pub price: Option<Decimal>,

    pub currency: Option<Currency>,

    pub experience: Option<ExperienceLevel>,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone_number: Option<String>,

    #[validate(length(min = 1, max = 6, message = "A service carries 1-6 photos"))]
    pub photo_urls: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: Uuid, title: &str) -> ServiceWithExecutor {
        ServiceWithExecutor {
            id,
            executor_id: Some(Uuid::now_v7()),
            category_id: None,
            title: title.to_string(),
            description: "desc".to_string(),
            price: None,
            currency: Currency::Som,
            experience: ExperienceLevel::OneToTwoYears,
            phone_number: "+996700123456".to_string(),
            popularity: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            executor_username: Some("mirlan".to_string()),
            executor_first_name: Some("Mirlan".to_string()),
            executor_last_name: None,
            executor_email: None,
            executor_phone: None,
            executor_avatar: None,
            executor_role: Some(UserRole::Executor),
        }
    }

    #[test]
    fn test_full_name_variants() {
        assert_eq!(full_name(Some("Aibek"), Some("Toktogulov")), Some("Aibek Toktogulov".to_string()));
        assert_eq!(full_name(Some("Aibek"), None), Some("Aibek".to_string()));
        assert_eq!(full_name(None, None), None);
        assert_eq!(full_name(Some(""), Some("")), None);
    }

    #[test]
    fn test_assemble_preserves_row_order_and_groups_related() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let rows = vec![row(b, "second created, listed first"), row(a, "first")];

        let subcategories = vec![
            ServiceSubCategoryRow {
                service_id: a,
                id: Uuid::now_v7(),
                category_id: Uuid::now_v7(),
                name: "pipes".to_string(),
                description: String::new(),
                created_at: Utc::now(),
            },
            ServiceSubCategoryRow {
                service_id: a,
                id: Uuid::now_v7(),
                category_id: Uuid::now_v7(),
                name: "heating".to_string(),
                description: String::new(),
                created_at: Utc::now(),
            },
        ];

        let photos = vec![ServicePhoto {
            id: Uuid::now_v7(),
            service_id: b,
            photo_url: "https://cdn.example/1.jpg".to_string(),
            created_at: Utc::now(),
        }];

        let summaries = ServiceSummaryDto::assemble(rows, subcategories, photos);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, b);
        assert_eq!(summaries[0].subcategories.len(), 0);
        assert_eq!(summaries[0].photos.len(), 1);
        assert_eq!(summaries[1].id, a);
        assert_eq!(summaries[1].subcategories.len(), 2);
        assert_eq!(summaries[1].photos.len(), 0);
    }

    #[test]
    fn test_assemble_ignores_unrelated_rows() {
        let a = Uuid::now_v7();
        let rows = vec![row(a, "only")];

        let stray = vec![ServiceSubCategoryRow {
            service_id: Uuid::now_v7(),
            id: Uuid::now_v7(),
            category_id: Uuid::now_v7(),
            name: "stray".to_string(),
            description: String::new(),
            created_at: Utc::now(),
        }];

        let summaries = ServiceSummaryDto::assemble(rows, stray, vec![]);
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].subcategories.is_empty());
    }

    #[test]
    fn test_create_dto_subcategory_bounds() {
        let dto = CreateServiceDto {
            title: "Plumbing repair".to_string(),
            description: "Fix leaks".to_string(),
            category_id: None,
            subcategory_ids: vec![],
            price: None,
            currency: Currency::Som,
            experience: ExperienceLevel::ThreeToFiveYears,
            phone_number: "+996700123456".to_string(),
            photo_urls: vec!["https://cdn.example/1.jpg".to_string()],
        };
        assert!(dto.validate().is_err());

        let dto = CreateServiceDto {
            subcategory_ids: (0..6).map(|_| Uuid::now_v7()).collect(),
            ..dto
        };
        assert!(dto.validate().is_err());

        let dto = CreateServiceDto {
            subcategory_ids: vec![Uuid::now_v7()],
            ..dto
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_dto_rejects_bad_phone() {
        let dto = CreateServiceDto {
            title: "Plumbing repair".to_string(),
            description: "Fix leaks".to_string(),
            category_id: None,
            subcategory_ids: vec![Uuid::now_v7()],
            price: None,
            currency: Currency::Som,
            experience: ExperienceLevel::UpToOneYear,
            phone_number: "not-a-phone".to_string(),
            photo_urls: vec!["https://cdn.example/1.jpg".to_string()],
        };
        assert!(dto.validate().is_err());
    }
}
