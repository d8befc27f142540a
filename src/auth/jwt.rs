/// JWT Token Generation and Validation
///
/// [`TokenIssuer`] mints access and refresh tokens for a user and verifies
/// them. The two token kinds use different secrets.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::claims::{AccessClaims, RefreshClaims};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};
use crate::models::User;

/// Freshly minted access + refresh token pair
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct TokenIssuer {
    config: JwtSettings,
}

impl TokenIssuer {
    pub fn new(config: JwtSettings) -> Self {
        Self { config }
    }

    /// Generate a new access token for a user
    ///
    /// # Errors
    /// Returns error if token encoding fails
    pub fn issue_access_token(&self, user: &User) -> Result<String, AppError> {
        let claims = AccessClaims::new(
            user.id,
            user.user_name.clone(),
            user.email.clone(),
            user.full_name.clone(),
            self.config.access_token_expiry,
            self.config.issuer.clone(),
        );
        sign(&claims, &self.config.access_token_secret)
    }

    /// Generate a new refresh token for a user
    ///
    /// # Errors
    /// Returns error if token encoding fails
    pub fn issue_refresh_token(&self, user: &User) -> Result<String, AppError> {
        let claims = RefreshClaims::new(
            user.id,
            self.config.refresh_token_expiry,
            self.config.issuer.clone(),
        );
        sign(&claims, &self.config.refresh_token_secret)
    }

    pub fn issue_pair(&self, user: &User) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(user)?,
            refresh_token: self.issue_refresh_token(user)?,
        })
    }

    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, AuthError> {
        verify(token, &self.config.access_token_secret, &self.config.issuer)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, AuthError> {
        verify(token, &self.config.refresh_token_secret, &self.config.issuer)
    }
}

fn sign<C: Serialize>(claims: &C, secret: &str) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Validate a token against `secret` and extract its claims
///
/// # Errors
/// - `TokenExpired` when the signature is valid but `exp` has passed
/// - `TokenInvalid` for everything else (tampering, wrong secret, wrong issuer)
pub fn verify<C: DeserializeOwned>(token: &str, secret: &str, issuer: &str) -> Result<C, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[issuer]);

    decode::<C>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!("JWT validation error: {}", e);
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid,
        }
    })
}
