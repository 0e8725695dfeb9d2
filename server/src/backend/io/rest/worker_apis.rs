//! # REST API for the Worker Directory
//!
//! Endpoints for listing, creating, viewing, updating and deleting workers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};

use super::mappers::WorkerMapper;
use crate::backend::domain::models::admin::AdminContext;
use crate::backend::AppState;
use shared::{CreateWorkerRequest, UpdateWorkerRequest, WorkerListRequest};

/// List workers, optionally filtered by a search term and active flag
pub async fn list_workers(
    State(state): State<AppState>,
    ctx: AdminContext,
    Query(request): Query<WorkerListRequest>,
) -> impl IntoResponse {
    info!("GET /api/workers - query: {:?}", request);

    let query = WorkerMapper::to_list_query(request);
    match state.worker_service.list_workers(&ctx, query).await {
        Ok(workers) => (StatusCode::OK, Json(WorkerMapper::to_list_dto(workers))).into_response(),
        Err(e) => {
            error!("Failed to list workers: {}", e);
            e.into_response()
        }
    }
}

/// Create a new worker
pub async fn create_worker(
    State(state): State<AppState>,
    ctx: AdminContext,
    Json(request): Json<CreateWorkerRequest>,
) -> impl IntoResponse {
    info!("POST /api/workers - request: {:?}", request);

    let command = WorkerMapper::to_create_command(request);
    match state.worker_service.create_worker(&ctx, command).await {
        Ok(worker) => (
            StatusCode::CREATED,
            Json(WorkerMapper::to_response_dto(worker, "Worker created successfully")),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to create worker: {}", e);
            e.into_response()
        }
    }
}

/// Worker profile with payment and attendance history
pub async fn get_worker(
    State(state): State<AppState>,
    ctx: AdminContext,
    Path(worker_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/workers/{}", worker_id);

    match state.report_service.worker_profile(&ctx, &worker_id).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => {
            error!("Failed to get worker: {}", e);
            e.into_response()
        }
    }
}

/// Update a worker's directory details
pub async fn update_worker(
    State(state): State<AppState>,
    ctx: AdminContext,
    Path(worker_id): Path<String>,
    Json(request): Json<UpdateWorkerRequest>,
) -> impl IntoResponse {
    info!("PUT /api/workers/{} - request: {:?}", worker_id, request);

    let command = WorkerMapper::to_update_command(request);
    match state.worker_service.update_worker(&ctx, &worker_id, command).await {
        Ok(worker) => (
            StatusCode::OK,
            Json(WorkerMapper::to_response_dto(worker, "Worker updated successfully")),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to update worker: {}", e);
            e.into_response()
        }
    }
}

/// Delete a worker
pub async fn delete_worker(
    State(state): State<AppState>,
    ctx: AdminContext,
    Path(worker_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/workers/{}", worker_id);

    match state.worker_service.delete_worker(&ctx, &worker_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete worker: {}", e);
            e.into_response()
        }
    }
}
