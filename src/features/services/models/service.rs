use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::auth::model::UserRole;

/// Currency enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "currency", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Som,
    Rub,
    Usd,
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Som
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Currency::Som => write!(f, "SOM"),
            Currency::Rub => write!(f, "RUB"),
            Currency::Usd => write!(f, "USD"),
        }
    }
}

/// Executor experience bracket matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "experience_level")]
pub enum ExperienceLevel {
    #[sqlx(rename = "0-1")]
    #[serde(rename = "0-1")]
    UpToOneYear,
    #[sqlx(rename = "1-2")]
    #[serde(rename = "1-2")]
    OneToTwoYears,
    #[sqlx(rename = "3-5")]
    #[serde(rename = "3-5")]
    ThreeToFiveYears,
    #[sqlx(rename = "6+")]
    #[serde(rename = "6+")]
    SixPlusYears,
}

impl std::fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExperienceLevel::UpToOneYear => write!(f, "0-1"),
            ExperienceLevel::OneToTwoYears => write!(f, "1-2"),
            ExperienceLevel::ThreeToFiveYears => write!(f, "3-5"),
            ExperienceLevel::SixPlusYears => write!(f, "6+"),
        }
    }
}

/// Service row joined with its executor's identity columns.
/// Executor columns are null for ownerless rows.
#[derive(Debug, Clone, FromRow)]
pub struct ServiceWithExecutor {
    pub id: Uuid,
    pub executor_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub price: Option<Decimal>,
    pub currency: Currency,
    pub experience: ExperienceLevel,
    pub phone_number: String,
    pub popularity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub executor_username: Option<String>,
    pub executor_first_name: Option<String>,
    pub executor_last_name: Option<String>,
    pub executor_email: Option<String>,
    pub executor_phone: Option<String>,
    pub executor_avatar: Option<String>,
    pub executor_role: Option<UserRole>,
}

/// Columns every query producing [`ServiceWithExecutor`] selects
pub const SERVICE_WITH_EXECUTOR_COLUMNS: &str = "s.id, s.executor_id, s.category_id, s.title, \
     s.description, s.price, s.currency, s.experience, s.phone_number, s.popularity, \
     s.created_at, s.updated_at, \
     u.username AS executor_username, u.first_name AS executor_first_name, \
     u.last_name AS executor_last_name, u.email AS executor_email, \
     u.phone_number AS executor_phone, u.avatar AS executor_avatar, u.role AS executor_role";

/// Database model for a service photo reference
#[derive(Debug, Clone, FromRow)]
pub struct ServicePhoto {
    pub id: Uuid,
    pub service_id: Uuid,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
}

/// Subcategory row tagged with the service it was fetched for,
/// used when attaching subcategories to a page of services
#[derive(Debug, Clone, FromRow)]
pub struct ServiceSubCategoryRow {
    pub service_id: Uuid,
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
