#[cfg(test)]
use crate::features::auth::model::{AuthenticatedUser, UserRole};

#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
pub fn create_client_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::now_v7(),
        username: "test-client".to_string(),
        role: Some(UserRole::Client),
    }
}

#[cfg(test)]
pub fn create_executor_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::now_v7(),
        username: "test-executor".to_string(),
        role: Some(UserRole::Executor),
    }
}
