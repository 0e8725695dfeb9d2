//! # REST API for Reports and the Dashboard

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use log::{error, info};

use crate::backend::domain::models::admin::AdminContext;
use crate::backend::AppState;
use shared::{MonthRequest, WeekRequest};

/// Weekly pay report (default: current week)
pub async fn weekly_report(
    State(state): State<AppState>,
    ctx: AdminContext,
    Query(request): Query<WeekRequest>,
) -> impl IntoResponse {
    info!("GET /api/reports/weekly - query: {:?}", request);

    let date = request
        .date
        .unwrap_or_else(|| Utc::now().date_naive().format("%Y-%m-%d").to_string());
    match state.report_service.weekly_report(&ctx, &date).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            error!("Failed to build weekly report: {}", e);
            e.into_response()
        }
    }
}

/// Monthly pay report (default: current month)
pub async fn monthly_report(
    State(state): State<AppState>,
    ctx: AdminContext,
    Query(request): Query<MonthRequest>,
) -> impl IntoResponse {
    info!("GET /api/reports/monthly - query: {:?}", request);

    let month = request
        .month
        .unwrap_or_else(|| Utc::now().date_naive().format("%Y-%m").to_string());
    match state.report_service.monthly_report(&ctx, &month).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            error!("Failed to build monthly report: {}", e);
            e.into_response()
        }
    }
}

pub async fn dashboard(State(state): State<AppState>, ctx: AdminContext) -> impl IntoResponse {
    info!("GET /api/dashboard");

    match state.report_service.dashboard(&ctx, Utc::now().date_naive()).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            error!("Failed to build dashboard: {}", e);
            e.into_response()
        }
    }
}
