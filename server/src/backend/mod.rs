//! # Backend Module
//!
//! Everything behind the HTTP port of the site ledger.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST handlers, auth guard, DTO mappers)
//!     ↓
//! Domain Layer (services, models, commands)
//!     ↓
//! Storage Layer (SQLite repositories, session store)
//! ```
//!
//! [`initialize_backend`] opens the database and wires the services;
//! [`create_router`] mounts them under `/api`.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::backend::config::Config;
use crate::backend::domain::{AttendanceService, AuthService, ReportService, SettlementService, WorkerService};
use crate::backend::io::rest::{attendance_apis, auth_apis, health, report_apis, worker_apis};
use crate::backend::storage::{DbConnection, InMemorySessionStore};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub worker_service: WorkerService,
    pub attendance_service: AttendanceService,
    pub settlement_service: SettlementService,
    pub report_service: ReportService,
    pub auth_service: AuthService,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;

    info!("Setting up domain model");
    let auth_service = AuthService::new(
        db.clone(),
        Arc::new(InMemorySessionStore::new()),
        config.session_ttl(),
        config.pbkdf2_iterations,
    );

    if let Some((username, password)) = config.bootstrap_admin() {
        auth_service.ensure_admin(username, password).await?;
    }

    let app_state = AppState {
        worker_service: WorkerService::new(db.clone()),
        attendance_service: AttendanceService::new(db.clone()),
        settlement_service: SettlementService::new(db.clone()),
        report_service: ReportService::new(db),
        auth_service,
    };

    Ok(app_state)
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(
            cors_origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", cors_origin))?,
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(auth_apis::login))
        .route("/auth/logout", post(auth_apis::logout))
        .route("/workers", get(worker_apis::list_workers).post(worker_apis::create_worker))
        .route(
            "/workers/:id",
            get(worker_apis::get_worker)
                .put(worker_apis::update_worker)
                .delete(worker_apis::delete_worker),
        )
        .route(
            "/attendance",
            get(attendance_apis::get_week_sheet).post(attendance_apis::record_week),
        )
        .route("/attendance/settle", post(attendance_apis::settle))
        .route("/reports/weekly", get(report_apis::weekly_report))
        .route("/reports/monthly", get(report_apis::monthly_report))
        .route("/dashboard", get(report_apis::dashboard));

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}
