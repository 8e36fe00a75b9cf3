use serde::{Deserialize, Serialize};
use sqlx::Type;
use utoipa::ToSchema;
use uuid::Uuid;

/// Marketplace-side role carried in tokens issued by the identity service
/// and mirrored in the users table. A user may have no role yet
/// (registration not completed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Client,
    Executor,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Client => write!(f, "client"),
            UserRole::Executor => write!(f, "executor"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

impl AuthenticatedUser {
    /// Check if user searches as a client (search history is only logged for clients)
    pub fn is_client(&self) -> bool {
        self.role == Some(UserRole::Client)
    }

    /// Check if user offers services
    pub fn is_executor(&self) -> bool {
        self.role == Some(UserRole::Executor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{create_client_user, create_executor_user};

    #[test]
    fn test_role_checks() {
        let user = create_client_user();
        assert!(user.is_client());
        assert!(!user.is_executor());

        let executor = create_executor_user();
        assert!(executor.is_executor());
        assert!(!executor.is_client());

        let roleless = AuthenticatedUser {
            id: Uuid::now_v7(),
            username: "new-user".to_string(),
            role: None,
        };
        assert!(!roleless.is_client());
        assert!(!roleless.is_executor());
    }
}
