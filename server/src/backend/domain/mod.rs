//! # Domain Module
//!
//! Business rules of the site ledger, independent of HTTP and of the
//! storage engine.
//!
//! ## Module Organization
//!
//! - **worker_service**: the worker directory
//! - **attendance_service**: recording weekly attendance, advances and recoveries
//! - **settlement_service**: turning a week into a payment, exactly once
//! - **report_service**: weekly and monthly reports, dashboard, worker profile
//! - **auth_service**: admin login and the [`models::admin::AdminContext`] capability
//!
//! ## Core Concepts
//!
//! - **Week key**: the Monday that identifies a ledger row and its payment
//! - **Advance**: cash handed to a worker, raising what they owe
//! - **Recovery**: an amount taken back out of gross pay
//! - **Settle**: freezing a week and journaling its payment

pub mod attendance_service;
pub mod auth_service;
pub mod commands;
pub mod credentials;
pub mod errors;
pub mod models;
pub mod report_service;
pub mod settlement_service;
pub mod worker_service;

pub use attendance_service::AttendanceService;
pub use auth_service::AuthService;
pub use errors::{LedgerError, LedgerResult};
pub use report_service::ReportService;
pub use settlement_service::SettlementService;
pub use worker_service::WorkerService;
