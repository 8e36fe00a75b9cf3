use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Append-only log row of a client's free-text search.
/// Never updated; removed only when the user account is removed.
#[derive(Debug, Clone, FromRow)]
pub struct SearchHistory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub query: String,
    pub created_at: DateTime<Utc>,
}
