use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A user's bookmark of a service. One row per (user, service) pair.
#[derive(Debug, Clone, FromRow)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub created_at: DateTime<Utc>,
}
