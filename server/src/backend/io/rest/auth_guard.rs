//! Extractor that turns an `Authorization: Bearer <token>` header into an
//! [`AdminContext`]. Any handler that takes an `AdminContext` is protected.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::backend::domain::errors::LedgerError;
use crate::backend::domain::models::admin::AdminContext;
use crate::backend::AppState;

#[async_trait]
impl FromRequestParts<AppState> for AdminContext {
    type Rejection = LedgerError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| LedgerError::Unauthorized("Missing bearer token".to_string()))?;

        state.auth_service.authenticate(token).await
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
