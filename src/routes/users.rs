/// User Routes
///
/// Registration, login, logout, refresh token rotation, password reset and
/// the admin-only user management endpoints. Tokens travel as HTTP-only
/// cookies; refresh also accepts the token in the request body.

use actix_web::cookie::Cookie;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{require_admin, RegisterUser, SessionManager, TokenPair};
use crate::error::AppError;
use crate::middleware::ACCESS_TOKEN_COOKIE;
use crate::models::UserProfile;

pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_name: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
    pub answer: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

fn token_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build(name, value)
        .http_only(true)
        .secure(true)
        .path("/")
        .finish()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = token_cookie(name, String::new());
    cookie.make_removal();
    cookie
}

fn with_token_cookies(tokens: &TokenPair) -> actix_web::HttpResponseBuilder {
    let mut builder = HttpResponse::Ok();
    builder
        .cookie(token_cookie(ACCESS_TOKEN_COOKIE, tokens.access_token.clone()))
        .cookie(token_cookie(REFRESH_TOKEN_COOKIE, tokens.refresh_token.clone()));
    builder
}

/// POST /user/register
///
/// # Errors
/// - 400: a field is missing/blank or the email is malformed
/// - 409: user name or email already registered
pub async fn register(
    form: web::Json<RegisterUser>,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let created_user = sessions.register(form.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Registration successful",
        "createdUser": created_user,
    })))
}

/// POST /user/login
///
/// Sets `accessToken` and `refreshToken` cookies on success.
///
/// # Errors
/// - 400: blank user name or password
/// - 404: unknown user name
/// - 401: wrong password
pub async fn login(
    form: web::Json<LoginRequest>,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let outcome = sessions
        .login(form.user_name.as_deref(), form.password.as_deref())
        .await?;

    Ok(with_token_cookies(&outcome.tokens).json(serde_json::json!({
        "success": true,
        "message": "Login successful",
        "user": outcome.user,
    })))
}

/// POST /user/forgotPassword
pub async fn forgot_password(
    form: web::Json<ForgotPasswordRequest>,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    sessions
        .reset_password(
            form.email.as_deref(),
            form.answer.as_deref(),
            form.new_password.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Password Reset Successfully",
    })))
}

/// POST /user/logout (authenticated)
pub async fn logout(
    user: web::ReqData<UserProfile>,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    sessions.logout(user.id).await?;

    Ok(HttpResponse::Ok()
        .cookie(removal_cookie(ACCESS_TOKEN_COOKIE))
        .cookie(removal_cookie(REFRESH_TOKEN_COOKIE))
        .json(serde_json::json!({
            "success": true,
            "message": "Logout successful",
        })))
}

/// POST /user/refresh-token
///
/// The token comes from the `refreshToken` cookie, or from the JSON body
/// when no cookie is present.
///
/// # Errors
/// - 401: token missing, invalid, expired, or already rotated out
/// - 404: the token's user no longer exists
pub async fn refresh_token(
    req: HttpRequest,
    body: Option<web::Json<RefreshRequest>>,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let token = req
        .cookie(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| body.and_then(|b| b.into_inner().refresh_token));

    let tokens = sessions.refresh(token.as_deref()).await?;

    Ok(with_token_cookies(&tokens).json(serde_json::json!({
        "success": true,
        "message": "Access token refreshed successfully",
        "accessToken": tokens.access_token,
        "refreshToken": tokens.refresh_token,
    })))
}

/// GET /user/user-auth (authenticated)
pub async fn user_auth(_user: web::ReqData<UserProfile>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "ok": true }))
}

/// GET /user/admin-auth (admin)
pub async fn admin_auth(user: web::ReqData<UserProfile>) -> Result<HttpResponse, AppError> {
    require_admin(&user)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "admin": true })))
}

/// DELETE /user/deleteUser/{id} (admin)
pub async fn delete_user(
    user: web::ReqData<UserProfile>,
    path: web::Path<Uuid>,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user)?;
    sessions.delete_user(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "User deleted successfully",
    })))
}

/// GET /user/allUser (admin)
pub async fn all_users(
    user: web::ReqData<UserProfile>,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user)?;
    let users = sessions.list_users().await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": format!("{} users found", users.len()),
        "users": users,
    })))
}
