use chrono::Utc;
use log::{info, warn};

use crate::backend::domain::commands::workers::{CreateWorkerCommand, UpdateWorkerCommand, WorkerListQuery};
use crate::backend::domain::errors::{LedgerError, LedgerResult};
use crate::backend::domain::models::admin::AdminContext;
use crate::backend::domain::models::worker::Worker;
use crate::backend::storage::{DbConnection, WorkerRepository};

const MAX_NAME_LENGTH: usize = 100;

/// Service for the worker directory
#[derive(Clone)]
pub struct WorkerService {
    worker_repository: WorkerRepository,
}

impl WorkerService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            worker_repository: WorkerRepository::new(db),
        }
    }

    /// Add a worker. The opening balance is the only way to seed an
    /// advance balance outside of settlement.
    pub async fn create_worker(&self, ctx: &AdminContext, command: CreateWorkerCommand) -> LedgerResult<Worker> {
        info!(
            "Creating worker: name={}, daily_rate={} (by {})",
            command.name,
            command.daily_rate,
            ctx.username()
        );

        self.validate_name(&command.name)?;
        self.validate_phone(&command.phone)?;
        self.validate_daily_rate(command.daily_rate)?;
        if !command.opening_balance.is_finite() {
            return Err(LedgerError::validation("Opening balance must be a number"));
        }

        let worker = Worker {
            id: Worker::generate_id(),
            name: command.name.trim().to_string(),
            phone: command.phone.trim().to_string(),
            daily_rate: command.daily_rate,
            advance_balance: command.opening_balance,
            is_active: command.is_active,
            created_at: Utc::now(),
        };
        self.worker_repository.store_worker(&worker).await?;

        info!("Created worker: {} with ID: {}", worker.name, worker.id);
        Ok(worker)
    }

    pub async fn get_worker(&self, ctx: &AdminContext, worker_id: &str) -> LedgerResult<Worker> {
        info!("Getting worker: {} (by {})", worker_id, ctx.username());

        self.worker_repository.get_worker(worker_id).await?.ok_or_else(|| {
            warn!("Worker not found: {}", worker_id);
            LedgerError::not_found("Worker", worker_id)
        })
    }

    pub async fn list_workers(&self, ctx: &AdminContext, query: WorkerListQuery) -> LedgerResult<Vec<Worker>> {
        info!("Listing workers: {:?} (by {})", query, ctx.username());

        let workers = self
            .worker_repository
            .list_workers(query.search.as_deref(), query.active_only)
            .await?;

        info!("Found {} workers", workers.len());
        Ok(workers)
    }

    pub async fn update_worker(
        &self,
        ctx: &AdminContext,
        worker_id: &str,
        command: UpdateWorkerCommand,
    ) -> LedgerResult<Worker> {
        info!("Updating worker: {} (by {})", worker_id, ctx.username());

        let mut worker = self
            .worker_repository
            .get_worker(worker_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Worker", worker_id))?;

        if let Some(name) = command.name {
            self.validate_name(&name)?;
            worker.name = name.trim().to_string();
        }
        if let Some(phone) = command.phone {
            self.validate_phone(&phone)?;
            worker.phone = phone.trim().to_string();
        }
        if let Some(daily_rate) = command.daily_rate {
            self.validate_daily_rate(daily_rate)?;
            worker.daily_rate = daily_rate;
        }
        if let Some(is_active) = command.is_active {
            worker.is_active = is_active;
        }

        self.worker_repository.update_worker(&worker).await?;

        info!("Updated worker: {} with ID: {}", worker.name, worker.id);
        Ok(worker)
    }

    /// Hard delete. Ledger rows and payments for the worker stay in place
    /// and are skipped by reports.
    pub async fn delete_worker(&self, ctx: &AdminContext, worker_id: &str) -> LedgerResult<()> {
        info!("Deleting worker: {} (by {})", worker_id, ctx.username());

        if !self.worker_repository.delete_worker(worker_id).await? {
            warn!("Worker not found: {}", worker_id);
            return Err(LedgerError::not_found("Worker", worker_id));
        }

        info!("Deleted worker: {}", worker_id);
        Ok(())
    }

    fn validate_name(&self, name: &str) -> LedgerResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::validation("Worker name cannot be empty"));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(LedgerError::validation(format!(
                "Worker name cannot exceed {} characters",
                MAX_NAME_LENGTH
            )));
        }
        Ok(())
    }

    fn validate_phone(&self, phone: &str) -> LedgerResult<()> {
        if phone.trim().is_empty() {
            return Err(LedgerError::validation("Phone number cannot be empty"));
        }
        Ok(())
    }

    fn validate_daily_rate(&self, daily_rate: f64) -> LedgerResult<()> {
        if !daily_rate.is_finite() || daily_rate <= 0.0 {
            return Err(LedgerError::validation("Daily rate must be greater than zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::test_utils::TestDb;

    async fn setup_test() -> (TestDb, WorkerService, AdminContext) {
        let test_db = TestDb::new().await;
        let service = WorkerService::new(test_db.db.clone());
        let ctx = AdminContext::new("admin::test", "tester", "token");
        (test_db, service, ctx)
    }

    fn create_command(name: &str, daily_rate: f64) -> CreateWorkerCommand {
        CreateWorkerCommand {
            name: name.to_string(),
            phone: "9800000001".to_string(),
            daily_rate,
            opening_balance: 0.0,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_create_worker() {
        let (_db, service, ctx) = setup_test().await;

        let mut command = create_command("  Ramesh Kumar ", 500.0);
        command.opening_balance = 1200.0;
        let worker = service.create_worker(&ctx, command).await.expect("Failed to create worker");

        assert_eq!(worker.name, "Ramesh Kumar");
        assert_eq!(worker.advance_balance, 1200.0);
        assert!(worker.is_active);
        assert!(worker.id.starts_with("worker::"));

        let loaded = service.get_worker(&ctx, &worker.id).await.unwrap();
        assert_eq!(loaded, Worker {
            created_at: loaded.created_at,
            ..worker
        });
    }

    #[tokio::test]
    async fn test_create_worker_validation() {
        let (_db, service, ctx) = setup_test().await;

        let invalid = [
            create_command("", 500.0),
            create_command(&"x".repeat(101), 500.0),
            create_command("Ramesh", 0.0),
            create_command("Ramesh", -10.0),
            create_command("Ramesh", f64::NAN),
            CreateWorkerCommand {
                phone: "  ".to_string(),
                ..create_command("Ramesh", 500.0)
            },
        ];
        for command in invalid {
            assert!(matches!(
                service.create_worker(&ctx, command).await,
                Err(LedgerError::Validation(_))
            ));
        }

        assert!(service.create_worker(&ctx, create_command(&"x".repeat(100), 500.0)).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_worker() {
        let (_db, service, ctx) = setup_test().await;
        let mut command = create_command("Ramesh", 500.0);
        command.opening_balance = 300.0;
        let worker = service.create_worker(&ctx, command).await.unwrap();

        let updated = service
            .update_worker(
                &ctx,
                &worker.id,
                UpdateWorkerCommand {
                    daily_rate: Some(650.0),
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Ramesh");
        assert_eq!(updated.daily_rate, 650.0);
        assert!(!updated.is_active);
        assert_eq!(updated.advance_balance, 300.0);

        let bad_rate = UpdateWorkerCommand {
            daily_rate: Some(0.0),
            ..Default::default()
        };
        assert!(service.update_worker(&ctx, &worker.id, bad_rate).await.is_err());

        let missing = service
            .update_worker(&ctx, "worker::missing", UpdateWorkerCommand::default())
            .await;
        assert!(matches!(missing, Err(LedgerError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_and_delete_workers() {
        let (_db, service, ctx) = setup_test().await;
        let suresh = service.create_worker(&ctx, create_command("Suresh", 450.0)).await.unwrap();
        service.create_worker(&ctx, create_command("Anil", 500.0)).await.unwrap();

        let workers = service.list_workers(&ctx, WorkerListQuery::default()).await.unwrap();
        let names: Vec<&str> = workers.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Anil", "Suresh"]);

        let query = WorkerListQuery {
            search: Some("sur".to_string()),
            active_only: true,
        };
        assert_eq!(service.list_workers(&ctx, query).await.unwrap().len(), 1);

        service.delete_worker(&ctx, &suresh.id).await.unwrap();
        assert!(matches!(
            service.delete_worker(&ctx, &suresh.id).await,
            Err(LedgerError::NotFound { .. })
        ));
        assert!(matches!(
            service.get_worker(&ctx, &suresh.id).await,
            Err(LedgerError::NotFound { .. })
        ));
    }
}
