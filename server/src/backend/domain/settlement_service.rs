//! Settlement: the one-time conversion of a worker's week into a payment.
//!
//! Everything a settlement writes (the ledger row, the settled flag, the
//! worker's balance and the payment) goes through a single SQLite
//! transaction, so either all of it lands or none of it does. The
//! transaction takes the write lock up front, so concurrent settlements of
//! one week run one after another and the later ones find the payment.
//! Settling a week that is already paid returns the existing payment.

use chrono::Utc;
use log::{info, warn};

use crate::backend::domain::commands::settlement::{SettleCommand, SettlementResult};
use crate::backend::domain::errors::{LedgerError, LedgerResult};
use crate::backend::domain::models::admin::AdminContext;
use crate::backend::domain::models::attendance::{AttendanceDelta, WeekDays};
use crate::backend::domain::models::payment::{PayCalculation, PaymentRecord};
use crate::backend::domain::models::week::WeekKey;
use crate::backend::storage::{AttendanceRepository, DbConnection, PaymentRepository, WorkerRepository};

#[derive(Clone)]
pub struct SettlementService {
    db: DbConnection,
    payment_repository: PaymentRepository,
}

impl SettlementService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            payment_repository: PaymentRepository::new(db.clone()),
            db,
        }
    }

    pub async fn settle(&self, ctx: &AdminContext, command: SettleCommand) -> LedgerResult<SettlementResult> {
        let week = WeekKey::parse(&command.week_start)?;
        let delta = AttendanceDelta::new(command.advance, command.recovery)?;
        let days = command.days.map(WeekDays::sanitized);
        let worker_id = command.worker_id.as_str();

        info!("Settling week {} for {} (by {})", week, worker_id, ctx.username());

        let mut tx = self.db.begin_immediate().await?;

        if let Some(existing) = PaymentRepository::get_payment_in(tx.conn()?, worker_id, week).await? {
            info!("Week {} already paid for {}, returning payment {}", week, worker_id, existing.id);
            tx.rollback().await?;
            return Ok(SettlementResult {
                payment: existing,
                newly_settled: false,
            });
        }

        let worker = WorkerRepository::get_worker_in(tx.conn()?, worker_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Worker", worker_id))?;

        let now = Utc::now();
        let written = AttendanceRepository::accumulate_in(tx.conn()?, worker_id, week, days, delta, now).await?;
        if !written || !AttendanceRepository::mark_settled_in(tx.conn()?, worker_id, week).await? {
            // Someone else settled the week after this transaction looked
            tx.rollback().await?;
            return self.settled_elsewhere(worker_id, week).await;
        }

        let entry = AttendanceRepository::get_entry_in(tx.conn()?, worker_id, week)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Ledger entry missing after upsert: {} {}", worker_id, week))?;
        let pay = PayCalculation::for_entry(&entry, worker.daily_rate);

        let balance_change = delta.balance_change();
        if balance_change != 0.0 {
            WorkerRepository::adjust_balance_in(tx.conn()?, worker_id, balance_change).await?;
        }
        let balance_after = WorkerRepository::get_balance_in(tx.conn()?, worker_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Worker", worker_id))?;

        let payment = PaymentRecord::from_settlement(&entry, &pay, balance_after, now);
        PaymentRepository::insert_in(tx.conn()?, &payment).await?;

        tx.commit().await?;

        info!(
            "Settled week {} for {}: {} days, gross {}, recovered {}, net {}, balance now {}",
            week, worker.name, pay.total_days, pay.gross, pay.recovered, pay.net, balance_after
        );

        Ok(SettlementResult {
            payment,
            newly_settled: true,
        })
    }

    async fn settled_elsewhere(&self, worker_id: &str, week: WeekKey) -> LedgerResult<SettlementResult> {
        match self.payment_repository.get_payment(worker_id, week).await? {
            Some(payment) => {
                info!("Week {} for {} was settled concurrently", week, worker_id);
                Ok(SettlementResult {
                    payment,
                    newly_settled: false,
                })
            }
            None => {
                warn!("Week {} for {} is marked settled but has no payment", week, worker_id);
                Err(LedgerError::Storage(anyhow::anyhow!(
                    "Week {} for {} is settled without a payment record",
                    week,
                    worker_id
                )))
            }
        }
    }
}
