//! # REST API for Attendance and Settlement

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use log::{error, info};

use super::mappers::{AttendanceMapper, PaymentMapper};
use crate::backend::domain::models::admin::AdminContext;
use crate::backend::AppState;
use shared::{RecordAttendanceRequest, SettleRequest, WeekRequest};

/// Attendance sheet for the week containing `date` (default: today)
pub async fn get_week_sheet(
    State(state): State<AppState>,
    ctx: AdminContext,
    Query(request): Query<WeekRequest>,
) -> impl IntoResponse {
    info!("GET /api/attendance - query: {:?}", request);

    let date = request.date.unwrap_or_else(today);
    match state.attendance_service.week_sheet(&ctx, &date).await {
        Ok(sheet) => (StatusCode::OK, Json(AttendanceMapper::to_week_sheet_dto(sheet))).into_response(),
        Err(e) => {
            error!("Failed to load attendance sheet: {}", e);
            e.into_response()
        }
    }
}

/// Save a week's attendance sheet for the whole site
pub async fn record_week(
    State(state): State<AppState>,
    ctx: AdminContext,
    Json(request): Json<RecordAttendanceRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/attendance - week_start: {}, {} entries",
        request.week_start,
        request.entries.len()
    );

    let commands = request
        .entries
        .into_iter()
        .map(AttendanceMapper::to_record_command)
        .collect();
    match state.attendance_service.record_week(&ctx, &request.week_start, commands).await {
        Ok(result) => (StatusCode::OK, Json(AttendanceMapper::to_record_response_dto(result))).into_response(),
        Err(e) => {
            error!("Failed to record attendance: {}", e);
            e.into_response()
        }
    }
}

/// Settle one worker's week
pub async fn settle(
    State(state): State<AppState>,
    ctx: AdminContext,
    Json(request): Json<SettleRequest>,
) -> impl IntoResponse {
    info!("POST /api/attendance/settle - request: {:?}", request);

    let command = PaymentMapper::to_settle_command(request);
    match state.settlement_service.settle(&ctx, command).await {
        Ok(result) => (StatusCode::OK, Json(PaymentMapper::to_settle_response_dto(result))).into_response(),
        Err(e) => {
            error!("Failed to settle week: {}", e);
            e.into_response()
        }
    }
}

fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}
