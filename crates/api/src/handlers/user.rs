//! Handlers for the `/user` resource.
//!
//! Registration creates the credential record and opens the first session.
//! Changing a password sits behind [`AuthUser`]. Profile, stats, and
//! leaderboard endpoints are served elsewhere.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use repcount_core::error::{AuthError, CoreError};
use repcount_db::models::user::{CreateUser, UserResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Request body for `POST /user/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 3, max = 30, message = "Username must be 3 to 30 characters"))]
    pub username: String,
    #[serde(default)]
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Successful registration payload, wrapped in [`DataResponse`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

/// POST /api/user/register
///
/// Create an account and log it in. Returns 201 with the new token pair.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<RegisterResponse>>)> {
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    if input.username.trim().is_empty() || input.email.trim().is_empty() || input.password.is_empty()
    {
        return Err(AppError::BadRequest("All fields are required".into()));
    }
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(CoreError::Validation)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let new_user = CreateUser {
        username: input.username,
        email: input.email,
        password_hash,
    };
    let user = state
        .sessions
        .bounded("create_user", state.store.create_user(&new_user))
        .await??;
    tracing::info!(user_id = user.id, "User registered");

    let tokens = state.sessions.open_session(&user).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: RegisterResponse {
                user: UserResponse::from(&user),
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
            },
        }),
    ))
}

/// Request body for `PUT /user/change-password`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
}

/// PUT /api/user/change-password
///
/// Replace the caller's password. A wrong old password is a 400.
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    if input.old_password.is_empty() || input.new_password.is_empty() {
        return Err(AppError::BadRequest(
            "Old and new password are required".into(),
        ));
    }
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(CoreError::Validation)?;

    state
        .sessions
        .change_password(auth_user.user_id, &input.old_password, &input.new_password)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials => AppError::BadRequest("Invalid old password".into()),
            other => other.into(),
        })?;

    Ok(Json(MessageResponse {
        message: "Password changed successfully",
    }))
}
