/// Session Manager
///
/// Owns the account lifecycle: registration, login, refresh token rotation,
/// logout, password reset and the access-token check used by the auth
/// middleware. A user holds at most one valid refresh token, the one stored
/// on their record. Issuing a new one overwrites it; logout clears it.

use serde::Deserialize;
use uuid::Uuid;

use crate::audit::{log_audit, AuditAction, AuditLog};
use crate::auth::claims::SubjectClaims;
use crate::auth::jwt::{TokenIssuer, TokenPair};
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::error::{AppError, AuthError};
use crate::models::{NewUser, User, UserProfile};
use crate::store::DynUserStore;
use crate::validators::{required, required_lowercase, valid_email};

/// Registration form as submitted by the client
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    pub user_name: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub answer: Option<String>,
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub tokens: TokenPair,
    pub user: UserProfile,
}

#[derive(Clone)]
pub struct SessionManager {
    users: DynUserStore,
    tokens: TokenIssuer,
    hash_cost: u32,
}

impl SessionManager {
    pub fn new(users: DynUserStore, tokens: TokenIssuer, hash_cost: u32) -> Self {
        Self {
            users,
            tokens,
            hash_cost,
        }
    }

    /// Create a new account
    ///
    /// # Errors
    /// - `Validation` when a field is missing, blank or the email is malformed
    /// - `Conflict` when the user name or email is already taken
    pub async fn register(&self, form: RegisterUser) -> Result<UserProfile, AppError> {
        let result = self.try_register(form).await;
        audit(
            AuditAction::Register,
            &result,
            "User registered",
            result.as_ref().ok().map(|p| p.id),
        );
        result
    }

    async fn try_register(&self, form: RegisterUser) -> Result<UserProfile, AppError> {
        let user_name = required_lowercase("userName", form.user_name.as_deref())?;
        let full_name = required_lowercase("fullName", form.full_name.as_deref())?;
        let email = valid_email(form.email.as_deref())?;
        let password = required("password", form.password.as_deref())?;
        let answer = required("answer", form.answer.as_deref())?;

        if self
            .users
            .find_user_by_user_name_or_email(&user_name, &email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Already registered"));
        }

        let password_hash = hash_password_blocking(password, self.hash_cost).await?;
        let user = self
            .users
            .insert_user(NewUser {
                user_name,
                full_name,
                email,
                password_hash,
                answer,
            })
            .await?;

        Ok(UserProfile::new(user, Vec::new()))
    }

    /// Exchange a user name and password for a fresh token pair
    ///
    /// # Errors
    /// - `Validation` when either field is blank
    /// - `NotFound` when no user has that name
    /// - `InvalidCredentials` when the password does not match
    pub async fn login(
        &self,
        user_name: Option<&str>,
        password: Option<&str>,
    ) -> Result<LoginOutcome, AppError> {
        let result = self.try_login(user_name, password).await;
        audit(
            AuditAction::Login,
            &result,
            "User logged in",
            result.as_ref().ok().map(|o| o.user.id),
        );
        result
    }

    async fn try_login(
        &self,
        user_name: Option<&str>,
        password: Option<&str>,
    ) -> Result<LoginOutcome, AppError> {
        let user_name = required_lowercase("userName", user_name)?;
        let password = required("password", password)?;

        let user = self
            .users
            .find_user_by_user_name(&user_name)
            .await?
            .ok_or_else(|| AppError::not_found("Can't find user"))?;

        if !verify_password_blocking(password, user.password_hash.clone()).await? {
            return Err(AuthError::InvalidCredentials.into());
        }

        let tokens = self.rotate(&user).await?;
        let user = self.profile(user).await?;

        Ok(LoginOutcome { tokens, user })
    }

    /// Rotate a refresh token
    ///
    /// The presented token must verify and be byte-equal to the one stored
    /// on the user. The stored token is replaced, so the presented one is
    /// spent.
    pub async fn refresh(&self, token: Option<&str>) -> Result<TokenPair, AppError> {
        let result = self.try_refresh(token).await;
        audit(AuditAction::Refresh, &result, "Refresh token rotated", None);
        result
    }

    async fn try_refresh(&self, token: Option<&str>) -> Result<TokenPair, AppError> {
        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or(AuthError::MissingToken)?;

        let claims = self.tokens.verify_refresh(token)?;
        let user = self
            .users
            .find_user(claims.user_id()?)
            .await?
            .ok_or_else(|| AppError::not_found("Invalid refresh token"))?;

        if user.refresh_token.as_deref() != Some(token) {
            return Err(AuthError::TokenMismatch.into());
        }

        self.rotate(&user).await
    }

    /// Clear the stored refresh token. Safe to call repeatedly.
    pub async fn logout(&self, user_id: Uuid) -> Result<(), AppError> {
        let result = self.users.set_refresh_token(user_id, None).await;
        audit(AuditAction::Logout, &result, "User logged out", Some(user_id));
        result
    }

    /// Replace the password of the user matching `email` and `answer`
    ///
    /// Refresh tokens issued before the reset stay valid.
    ///
    /// # Errors
    /// `NotFound` when the pair matches no user; the message does not say
    /// which of the two was wrong.
    pub async fn reset_password(
        &self,
        email: Option<&str>,
        answer: Option<&str>,
        new_password: Option<&str>,
    ) -> Result<(), AppError> {
        let result = self.try_reset_password(email, answer, new_password).await;
        audit(AuditAction::ResetPassword, &result, "Password reset", None);
        result
    }

    async fn try_reset_password(
        &self,
        email: Option<&str>,
        answer: Option<&str>,
        new_password: Option<&str>,
    ) -> Result<(), AppError> {
        let email = required("email", email)?;
        let answer = required("answer", answer)?;
        let new_password = required("newPassword", new_password)?;

        let password_hash = hash_password_blocking(new_password, self.hash_cost).await?;
        if !self
            .users
            .update_password(&email, &answer, &password_hash)
            .await?
        {
            return Err(AppError::not_found("Invalid credentials"));
        }

        Ok(())
    }

    /// Resolve an access token to the user it was issued for
    ///
    /// # Errors
    /// `MissingToken`, `TokenInvalid`, `TokenExpired`, or `UserNotFound`
    /// when the user was deleted after the token was issued.
    pub async fn authenticate(&self, token: Option<&str>) -> Result<UserProfile, AppError> {
        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or(AuthError::MissingToken)?;

        let claims = self.tokens.verify_access(token)?;
        let user = self
            .users
            .find_user(claims.user_id()?)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.profile(user).await
    }

    pub async fn list_users(&self) -> Result<Vec<UserProfile>, AppError> {
        let users = self.users.list_users().await?;
        let mut profiles = Vec::with_capacity(users.len());
        for user in users {
            profiles.push(self.profile(user).await?);
        }
        Ok(profiles)
    }

    /// Delete a user and the addresses they own
    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), AppError> {
        let result = match self.users.delete_user(user_id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(AppError::not_found("User not found")),
            Err(e) => Err(e),
        };
        audit(AuditAction::DeleteUser, &result, "User deleted", Some(user_id));
        result
    }

    async fn rotate(&self, user: &User) -> Result<TokenPair, AppError> {
        let tokens = self.tokens.issue_pair(user)?;
        self.users
            .set_refresh_token(user.id, Some(tokens.refresh_token.as_str()))
            .await?;
        Ok(tokens)
    }

    async fn profile(&self, user: User) -> Result<UserProfile, AppError> {
        let address = self.users.addresses_for(user.id).await?;
        Ok(UserProfile::new(user, address))
    }
}

/// Admin-only routes answer 404 rather than 403 to non-admins
pub fn require_admin(user: &UserProfile) -> Result<(), AppError> {
    if user.is_admin {
        Ok(())
    } else {
        Err(AuthError::NotAdmin.into())
    }
}

fn audit<T>(
    action: AuditAction,
    result: &Result<T, AppError>,
    message: &str,
    user_id: Option<Uuid>,
) {
    let entry = match result {
        Ok(_) => AuditLog::success(action, message),
        Err(e) => AuditLog::failure(action, e.to_string()),
    };
    let entry = match user_id {
        Some(id) => entry.with_user_id(id),
        None => entry,
    };
    log_audit(&entry);
}
