//! # REST API Interface Layer
//!
//! HTTP endpoints for the site ledger. Handlers map shared DTOs to domain
//! commands, call a service and map the result back. Every handler except
//! login and health takes an [`AdminContext`](crate::backend::domain::models::admin::AdminContext),
//! so an unauthenticated request never reaches a service.
//!
//! Errors are returned as `{ "error": "..." }` with the status code chosen
//! in [`error`].

pub mod attendance_apis;
pub mod auth_apis;
pub mod auth_guard;
pub mod error;
pub mod mappers;
pub mod report_apis;
pub mod worker_apis;

use axum::{http::StatusCode, response::IntoResponse};

/// Liveness probe
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
