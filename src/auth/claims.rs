/// JWT Claims structures
///
/// Access tokens carry enough of the profile for clients to render a
/// session without a round trip. Refresh tokens carry only the user id and
/// a unique token id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AuthError};

/// Claims of a short-lived access token
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    pub user_name: String,
    pub email: String,
    pub full_name: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub iss: String,
}

/// Claims of a long-lived refresh token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RefreshClaims {
    pub sub: String,
    /// Unique per token, so two tokens minted within one second still differ
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

impl AccessClaims {
    pub fn new(
        user_id: Uuid,
        user_name: String,
        email: String,
        full_name: String,
        expiry_seconds: i64,
        issuer: String,
    ) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            user_name,
            email,
            full_name,
            exp: now + expiry_seconds,
            iat: now,
            iss: issuer,
        }
    }
}

impl RefreshClaims {
    pub fn new(user_id: Uuid, expiry_seconds: i64, issuer: String) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            exp: now + expiry_seconds,
            iat: now,
            iss: issuer,
        }
    }
}

/// Claims that identify a user
pub trait SubjectClaims {
    fn subject(&self) -> &str;

    /// Extract user ID from claims
    ///
    /// # Errors
    /// A subject that is not a UUID means the token was not minted by us
    fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(self.subject()).map_err(|_| AppError::Auth(AuthError::TokenInvalid))
    }
}

impl SubjectClaims for AccessClaims {
    fn subject(&self) -> &str {
        &self.sub
    }
}

impl SubjectClaims for RefreshClaims {
    fn subject(&self) -> &str {
        &self.sub
    }
}
