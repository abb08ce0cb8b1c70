//! Authentication handler implementations

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::AuthService,
    state::AppState,
};

use super::{
    request::{LoginRequest, LogoutRequest, RefreshTokenRequest},
    response::{AuthUserResponse, TokenResponse},
};

/// Login with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    payload.validate()?;

    let (user, roles, access_token, refresh_token, expires_in) = AuthService::login(
        state.db(),
        state.redis(),
        state.config(),
        &payload.email,
        &payload.password,
    )
    .await?;

    Ok(Json(TokenResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in,
        user: Some(AuthUserResponse {
            id: user.id,
            code: user.code,
            name: user.name,
            lastname: user.lastname,
            email: user.email,
            roles,
        }),
    }))
}

/// Rotate the refresh token and issue a new access token
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    payload.validate()?;

    let (access_token, refresh_token, expires_in) = AuthService::refresh_token(
        state.db(),
        state.redis(),
        state.config(),
        &payload.refresh_token,
    )
    .await?;

    Ok(Json(TokenResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in,
        user: None,
    }))
}

/// Invalidate the caller's refresh token(s)
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    payload: Option<Json<LogoutRequest>>,
) -> AppResult<StatusCode> {
    let all_sessions = payload
        .as_ref()
        .and_then(|p| p.all_sessions)
        .unwrap_or(false);

    AuthService::logout(state.redis(), &auth_user.id, all_sessions).await?;

    Ok(StatusCode::NO_CONTENT)
}
