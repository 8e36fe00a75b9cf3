use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

use super::model::{AuthenticatedUser, UserRole};
use crate::core::error::AppError;

/// Validates HS256 bearer tokens issued by the identity service.
///
/// Token issuance (registration, login, phone/social flows) lives in the
/// identity service; this backend only verifies the shared-secret signature
/// and maps claims onto an [`AuthenticatedUser`].
pub struct JwtValidator {
    decoding_key: DecodingKey,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    username: String,
    #[serde(default)]
    role: Option<UserRole>,
    #[serde(rename = "exp")]
    _exp: u64,
}

impl JwtValidator {
    pub fn new(secret: &str, leeway: Duration) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            leeway: leeway.as_secs(),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway;
        validation.validate_exp = true;

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

        let id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid subject claim".to_string()))?;

        Ok(AuthenticatedUser {
            id,
            username: data.claims.username,
            role: data.claims.role,
        })
    }
}
