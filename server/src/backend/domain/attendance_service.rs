//! Weekly attendance ledger: recording days worked together with advances
//! handed out and recoveries taken, before a week is settled.

use chrono::Utc;
use log::{info, warn};
use std::collections::HashMap;

use crate::backend::domain::commands::attendance::{
    RecordAttendanceCommand, RecordOutcome, RecordRejection, WeekRecordResult, WeekSheet, WeekSheetRow,
};
use crate::backend::domain::errors::{LedgerError, LedgerResult};
use crate::backend::domain::models::admin::AdminContext;
use crate::backend::domain::models::attendance::AttendanceDelta;
use crate::backend::domain::models::week::WeekKey;
use crate::backend::storage::{AttendanceRepository, DbConnection, WorkerRepository};

#[derive(Clone)]
pub struct AttendanceService {
    worker_repository: WorkerRepository,
    attendance_repository: AttendanceRepository,
}

impl AttendanceService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            worker_repository: WorkerRepository::new(db.clone()),
            attendance_repository: AttendanceRepository::new(db),
        }
    }

    /// Save one worker's week. Day values replace what was stored; advance
    /// and recovery are added to the week's running totals. The worker's
    /// advance balance is left alone until the week is settled.
    pub async fn record_attendance(
        &self,
        ctx: &AdminContext,
        week_start: &str,
        command: RecordAttendanceCommand,
    ) -> LedgerResult<RecordOutcome> {
        let week = WeekKey::parse(week_start)?;
        self.record_for_week(ctx, week, command).await
    }

    /// Save the whole site's sheet for a week. A bad line is reported in
    /// `rejected` and does not stop the rest of the sheet.
    pub async fn record_week(
        &self,
        ctx: &AdminContext,
        week_start: &str,
        commands: Vec<RecordAttendanceCommand>,
    ) -> LedgerResult<WeekRecordResult> {
        let week = WeekKey::parse(week_start)?;
        info!(
            "Recording attendance for week {}: {} entries (by {})",
            week,
            commands.len(),
            ctx.username()
        );

        let mut result = WeekRecordResult {
            week,
            saved: Vec::new(),
            skipped_settled: Vec::new(),
            rejected: Vec::new(),
        };

        for command in commands {
            let worker_id = command.worker_id.clone();
            match self.record_for_week(ctx, week, command).await {
                Ok(RecordOutcome::Saved(entry)) => result.saved.push(entry),
                Ok(RecordOutcome::SkippedSettled(_)) => result.skipped_settled.push(worker_id),
                Err(LedgerError::Storage(e)) => return Err(LedgerError::Storage(e)),
                Err(e) => {
                    warn!("Rejected attendance for {}: {}", worker_id, e);
                    result.rejected.push(RecordRejection {
                        worker_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Week {}: saved {}, skipped {} settled, rejected {}",
            week,
            result.saved.len(),
            result.skipped_settled.len(),
            result.rejected.len()
        );
        Ok(result)
    }

    /// Active workers, by name, each with their entry for the week of `date`
    pub async fn week_sheet(&self, ctx: &AdminContext, date: &str) -> LedgerResult<WeekSheet> {
        let week = WeekKey::parse(date)?;
        info!("Loading attendance sheet for week {} (by {})", week, ctx.username());

        let workers = self.worker_repository.list_workers(None, true).await?;
        let mut entries: HashMap<String, _> = self
            .attendance_repository
            .list_for_week(week)
            .await?
            .into_iter()
            .map(|entry| (entry.worker_id.clone(), entry))
            .collect();

        let rows = workers
            .into_iter()
            .map(|worker| WeekSheetRow {
                entry: entries.remove(&worker.id),
                worker,
            })
            .collect();

        Ok(WeekSheet { week, rows })
    }

    async fn record_for_week(
        &self,
        ctx: &AdminContext,
        week: WeekKey,
        command: RecordAttendanceCommand,
    ) -> LedgerResult<RecordOutcome> {
        let delta = AttendanceDelta::new(command.advance, command.recovery)?;
        let days = command.days.sanitized();

        if self.worker_repository.get_worker(&command.worker_id).await?.is_none() {
            return Err(LedgerError::not_found("Worker", &command.worker_id));
        }

        let written = self
            .attendance_repository
            .accumulate(&command.worker_id, week, Some(days), delta, Utc::now())
            .await?;

        let entry = self
            .attendance_repository
            .get_entry(&command.worker_id, week)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Entry vanished after upsert: {} {}", command.worker_id, week))?;

        if written {
            info!(
                "Recorded {} days for {} in week {} (by {})",
                entry.total_days(),
                entry.worker_id,
                week,
                ctx.username()
            );
            Ok(RecordOutcome::Saved(entry))
        } else {
            info!("Week {} already settled for {}, leaving it unchanged", week, entry.worker_id);
            Ok(RecordOutcome::SkippedSettled(entry))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::commands::workers::CreateWorkerCommand;
    use crate::backend::domain::models::attendance::WeekDays;
    use crate::backend::domain::worker_service::WorkerService;
    use crate::backend::storage::test_utils::TestDb;

    struct Fixture {
        _db: TestDb,
        service: AttendanceService,
        workers: WorkerService,
        ctx: AdminContext,
    }

    async fn setup_test() -> Fixture {
        let test_db = TestDb::new().await;
        Fixture {
            service: AttendanceService::new(test_db.db.clone()),
            workers: WorkerService::new(test_db.db.clone()),
            ctx: AdminContext::new("admin::test", "tester", "token"),
            _db: test_db,
        }
    }

    async fn add_worker(fixture: &Fixture, name: &str, is_active: bool) -> String {
        let command = CreateWorkerCommand {
            name: name.to_string(),
            phone: "9800000001".to_string(),
            daily_rate: 500.0,
            opening_balance: 0.0,
            is_active,
        };
        fixture.workers.create_worker(&fixture.ctx, command).await.unwrap().id
    }

    fn line(worker_id: &str, mon: f64, advance: f64, recovery: f64) -> RecordAttendanceCommand {
        RecordAttendanceCommand {
            worker_id: worker_id.to_string(),
            days: WeekDays {
                mon,
                ..WeekDays::default()
            },
            advance,
            recovery,
        }
    }

    #[tokio::test]
    async fn test_advances_accumulate() {
        let f = setup_test().await;
        let worker_id = add_worker(&f, "Ramesh", true).await;

        f.service
            .record_attendance(&f.ctx, "2024-06-04", line(&worker_id, 1.0, 200.0, 0.0))
            .await
            .unwrap();
        let outcome = f
            .service
            .record_attendance(&f.ctx, "2024-06-07", line(&worker_id, 0.5, 150.0, 50.0))
            .await
            .unwrap();

        let entry = match outcome {
            RecordOutcome::Saved(entry) => entry,
            other => panic!("Expected Saved, got {:?}", other),
        };
        assert_eq!(entry.week.to_string(), "2024-06-03");
        assert_eq!(entry.cumulative_advance, 350.0);
        assert_eq!(entry.cumulative_recovery, 50.0);
        assert_eq!(entry.days.mon, 0.5);
        assert!(!entry.settled);

        // Recording never moves the balance
        let worker = f.workers.get_worker(&f.ctx, &worker_id).await.unwrap();
        assert_eq!(worker.advance_balance, 0.0);
    }

    #[tokio::test]
    async fn test_record_attendance_errors() {
        let f = setup_test().await;
        let worker_id = add_worker(&f, "Ramesh", true).await;

        assert!(matches!(
            f.service.record_attendance(&f.ctx, "2024-06-04", line("worker::missing", 1.0, 0.0, 0.0)).await,
            Err(LedgerError::NotFound { .. })
        ));
        assert!(matches!(
            f.service.record_attendance(&f.ctx, "2024-06-04", line(&worker_id, 1.0, -5.0, 0.0)).await,
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            f.service.record_attendance(&f.ctx, "not-a-date", line(&worker_id, 1.0, 0.0, 0.0)).await,
            Err(LedgerError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_record_week_reports_each_line() {
        let f = setup_test().await;
        let ramesh = add_worker(&f, "Ramesh", true).await;
        let suresh = add_worker(&f, "Suresh", true).await;

        let result = f
            .service
            .record_week(
                &f.ctx,
                "2024-06-09",
                vec![
                    line(&ramesh, 1.0, 100.0, 0.0),
                    line("worker::missing", 1.0, 0.0, 0.0),
                    line(&suresh, 1.0, -1.0, 0.0),
                ],
            )
            .await
            .unwrap();

        assert_eq!(result.week.to_string(), "2024-06-03");
        assert_eq!(result.saved.len(), 1);
        assert_eq!(result.saved[0].worker_id, ramesh);
        assert_eq!(result.rejected.len(), 2);
        assert_eq!(result.rejected[0].worker_id, "worker::missing");
        assert_eq!(result.rejected[1].worker_id, suresh);
        assert!(result.skipped_settled.is_empty());
    }

    #[tokio::test]
    async fn test_week_sheet_lists_active_workers() {
        let f = setup_test().await;
        let suresh = add_worker(&f, "Suresh", true).await;
        let anil = add_worker(&f, "Anil", true).await;
        add_worker(&f, "Mahesh", false).await;

        f.service
            .record_attendance(&f.ctx, "2024-06-03", line(&suresh, 1.0, 0.0, 0.0))
            .await
            .unwrap();

        let sheet = f.service.week_sheet(&f.ctx, "2024-06-06").await.unwrap();
        assert_eq!(sheet.week.to_string(), "2024-06-03");
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].worker.id, anil);
        assert!(sheet.rows[0].entry.is_none());
        assert_eq!(sheet.rows[1].worker.id, suresh);
        assert!(sheet.rows[1].entry.is_some());

        let next_week = f.service.week_sheet(&f.ctx, "2024-06-10").await.unwrap();
        assert!(next_week.rows.iter().all(|row| row.entry.is_none()));
    }
}
