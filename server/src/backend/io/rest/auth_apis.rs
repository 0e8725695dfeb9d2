//! # REST API for Admin Sessions

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::backend::domain::models::admin::AdminContext;
use crate::backend::storage::repositories::format_timestamp;
use crate::backend::AppState;
use shared::{LoginRequest, LoginResponse};

/// Exchange admin credentials for a bearer token
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> impl IntoResponse {
    info!("POST /api/auth/login - username: {}", request.username);

    match state.auth_service.login(&request.username, &request.password).await {
        Ok(session) => {
            let response = LoginResponse {
                expires_at: format_timestamp(&session.expires_at),
                token: session.token,
                username: session.username,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Login failed: {}", e);
            e.into_response()
        }
    }
}

/// End the caller's session
pub async fn logout(State(state): State<AppState>, ctx: AdminContext) -> impl IntoResponse {
    info!("POST /api/auth/logout - {}", ctx.username());

    match state.auth_service.logout(&ctx).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to log out: {}", e);
            e.into_response()
        }
    }
}
