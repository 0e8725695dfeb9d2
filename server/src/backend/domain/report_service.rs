//! Read-only reports over the ledger and the payment journal.
//!
//! Pay figures are always recomputed from ledger rows at the worker's
//! current daily rate. Ledger rows whose worker has been deleted are left
//! out.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use log::info;
use std::collections::HashMap;

use crate::backend::domain::errors::{LedgerError, LedgerResult};
use crate::backend::domain::models::admin::AdminContext;
use crate::backend::domain::models::attendance::LedgerEntry;
use crate::backend::domain::models::payment::PayCalculation;
use crate::backend::domain::models::week::{MonthKey, WeekKey};
use crate::backend::domain::models::worker::Worker;
use crate::backend::io::rest::mappers::{AttendanceMapper, PaymentMapper, WorkerMapper};
use crate::backend::storage::{AttendanceRepository, DbConnection, PaymentRepository, WorkerRepository};
use shared::{
    DashboardSummary, MonthlyReport, MonthlyReportRow, PaymentStatus, SiteTotals, WeeklyReport, WeeklyReportRow,
    WorkerProfile,
};

const TOP_ADVANCE_BALANCES: u32 = 5;

#[derive(Clone)]
pub struct ReportService {
    worker_repository: WorkerRepository,
    attendance_repository: AttendanceRepository,
    payment_repository: PaymentRepository,
}

impl ReportService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            worker_repository: WorkerRepository::new(db.clone()),
            attendance_repository: AttendanceRepository::new(db.clone()),
            payment_repository: PaymentRepository::new(db),
        }
    }

    /// Pay summary for the week containing `date`
    pub async fn weekly_report(&self, ctx: &AdminContext, date: &str) -> LedgerResult<WeeklyReport> {
        let week = WeekKey::parse(date)?;
        info!("Building weekly report for {} (by {})", week, ctx.username());

        let workers = self.workers_by_id().await?;
        let entries = self.attendance_repository.list_for_week(week).await?;

        let mut rows: Vec<WeeklyReportRow> = entries
            .iter()
            .filter_map(|entry| {
                let worker = workers.get(&entry.worker_id)?;
                let pay = PayCalculation::for_entry(entry, worker.daily_rate);
                Some(WeeklyReportRow {
                    worker_id: worker.id.clone(),
                    name: worker.name.clone(),
                    daily_rate: worker.daily_rate,
                    total_days: pay.total_days,
                    gross: pay.gross,
                    recovered: pay.recovered,
                    advance_given: pay.advance_given,
                    net: pay.net,
                    status: if entry.settled {
                        PaymentStatus::Paid
                    } else {
                        PaymentStatus::Pending
                    },
                })
            })
            .collect();
        rows.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        let site_total = rows.iter().fold(SiteTotals::default(), |total, row| SiteTotals {
            gross: total.gross + row.gross,
            recovered: total.recovered + row.recovered,
            advance_given: total.advance_given + row.advance_given,
            net: total.net + row.net,
        });

        Ok(WeeklyReport {
            week_start: week.to_string(),
            rows,
            site_total,
        })
    }

    /// Per-worker totals over every week that starts inside `month`
    pub async fn monthly_report(&self, ctx: &AdminContext, month: &str) -> LedgerResult<MonthlyReport> {
        let month = MonthKey::parse(month)?;
        info!("Building monthly report for {} (by {})", month, ctx.username());

        let workers = self.workers_by_id().await?;
        let entries = self
            .attendance_repository
            .list_between(month.first_day(), month.last_day())
            .await?;

        let mut by_worker: HashMap<String, MonthlyReportRow> = HashMap::new();
        for entry in &entries {
            let Some(worker) = workers.get(&entry.worker_id) else {
                continue;
            };
            let pay = PayCalculation::for_entry(entry, worker.daily_rate);
            let row = by_worker.entry(worker.id.clone()).or_insert_with(|| MonthlyReportRow {
                worker_id: worker.id.clone(),
                name: worker.name.clone(),
                total_days: 0.0,
                total_gross: 0.0,
                total_recovered: 0.0,
                total_advance_given: 0.0,
                total_net: 0.0,
            });
            row.total_days += pay.total_days;
            row.total_gross += pay.gross;
            row.total_recovered += pay.recovered;
            row.total_advance_given += pay.advance_given;
            row.total_net += pay.net;
        }

        let mut rows: Vec<MonthlyReportRow> = by_worker.into_values().collect();
        rows.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.worker_id.cmp(&b.worker_id))
        });

        let site_total = rows.iter().fold(SiteTotals::default(), |total, row| SiteTotals {
            gross: total.gross + row.total_gross,
            recovered: total.recovered + row.total_recovered,
            advance_given: total.advance_given + row.total_advance_given,
            net: total.net + row.total_net,
        });

        Ok(MonthlyReport {
            month: month.to_string(),
            rows,
            site_total,
        })
    }

    /// Site overview for the week containing `today`
    pub async fn dashboard(&self, ctx: &AdminContext, today: NaiveDate) -> LedgerResult<DashboardSummary> {
        let week = WeekKey::containing(today);
        info!("Building dashboard for week {} (by {})", week, ctx.username());

        let week_began = Utc.from_utc_datetime(&week.monday().and_time(NaiveTime::default()));
        let total_payout = self.payment_repository.sum_net_paid_since(week_began).await?;

        let entries = self.attendance_repository.list_for_week(week).await?;
        let paid_count = entries.iter().filter(|entry| entry.settled).count() as u32;
        let unpaid_count = entries.len() as u32 - paid_count;
        let total_advances = entries.iter().map(|entry| entry.cumulative_advance).sum();

        let active_workers = self.worker_repository.count_active().await?;
        let top_advance_balances = self
            .worker_repository
            .top_advance_balances(TOP_ADVANCE_BALANCES)
            .await?
            .into_iter()
            .map(WorkerMapper::to_dto)
            .collect();

        Ok(DashboardSummary {
            week_start: week.to_string(),
            active_workers,
            total_payout,
            total_advances,
            paid_count,
            unpaid_count,
            top_advance_balances,
        })
    }

    /// A worker with their full payment and attendance history
    pub async fn worker_profile(&self, ctx: &AdminContext, worker_id: &str) -> LedgerResult<WorkerProfile> {
        info!("Building profile for {} (by {})", worker_id, ctx.username());

        let worker = self
            .worker_repository
            .get_worker(worker_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Worker", worker_id))?;
        let payments = self.payment_repository.list_for_worker(worker_id).await?;
        let attendance = self.attendance_repository.list_for_worker(worker_id).await?;

        let total_earned = payments.iter().map(|payment| payment.gross_amount).sum();
        let total_paid = payments.iter().map(|payment| payment.net_paid).sum();
        let total_advances = attendance.iter().map(|entry| entry.cumulative_advance).sum();
        let pending_amount = pending_amount(&attendance, &worker);

        Ok(WorkerProfile {
            worker: WorkerMapper::to_dto(worker),
            payments: payments.into_iter().map(PaymentMapper::to_dto).collect(),
            attendance: attendance.into_iter().map(AttendanceMapper::to_dto).collect(),
            total_earned,
            total_paid,
            total_advances,
            pending_amount,
        })
    }

    async fn workers_by_id(&self) -> LedgerResult<HashMap<String, Worker>> {
        Ok(self
            .worker_repository
            .list_workers(None, false)
            .await?
            .into_iter()
            .map(|worker| (worker.id.clone(), worker))
            .collect())
    }
}

/// Net still owed for unsettled weeks at the worker's current rate
fn pending_amount(entries: &[LedgerEntry], worker: &Worker) -> f64 {
    entries
        .iter()
        .filter(|entry| !entry.settled)
        .map(|entry| PayCalculation::for_entry(entry, worker.daily_rate).net)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::attendance_service::AttendanceService;
    use crate::backend::domain::commands::attendance::RecordAttendanceCommand;
    use crate::backend::domain::commands::settlement::SettleCommand;
    use crate::backend::domain::commands::workers::CreateWorkerCommand;
    use crate::backend::domain::models::attendance::WeekDays;
    use crate::backend::domain::settlement_service::SettlementService;
    use crate::backend::domain::worker_service::WorkerService;
    use crate::backend::storage::test_utils::TestDb;

    struct Fixture {
        _db: TestDb,
        service: ReportService,
        workers: WorkerService,
        attendance: AttendanceService,
        settlement: SettlementService,
        ctx: AdminContext,
    }

    async fn setup_test() -> Fixture {
        let test_db = TestDb::new().await;
        Fixture {
            service: ReportService::new(test_db.db.clone()),
            workers: WorkerService::new(test_db.db.clone()),
            attendance: AttendanceService::new(test_db.db.clone()),
            settlement: SettlementService::new(test_db.db.clone()),
            ctx: AdminContext::new("admin::test", "tester", "token"),
            _db: test_db,
        }
    }

    async fn add_worker(f: &Fixture, name: &str, daily_rate: f64, opening_balance: f64) -> String {
        let command = CreateWorkerCommand {
            name: name.to_string(),
            phone: "9800000001".to_string(),
            daily_rate,
            opening_balance,
            is_active: true,
        };
        f.workers.create_worker(&f.ctx, command).await.unwrap().id
    }

    fn days(total_full_days: usize) -> WeekDays {
        let mut values = [0.0; 7];
        for value in values.iter_mut().take(total_full_days) {
            *value = 1.0;
        }
        WeekDays {
            mon: values[0],
            tue: values[1],
            wed: values[2],
            thu: values[3],
            fri: values[4],
            sat: values[5],
            sun: values[6],
        }
    }

    async fn record(f: &Fixture, worker_id: &str, week: &str, days: WeekDays, advance: f64, recovery: f64) {
        let command = RecordAttendanceCommand {
            worker_id: worker_id.to_string(),
            days,
            advance,
            recovery,
        };
        f.attendance.record_attendance(&f.ctx, week, command).await.unwrap();
    }

    async fn settle(f: &Fixture, worker_id: &str, week: &str) {
        let command = SettleCommand {
            worker_id: worker_id.to_string(),
            week_start: week.to_string(),
            days: None,
            advance: 0.0,
            recovery: 0.0,
        };
        f.settlement.settle(&f.ctx, command).await.unwrap();
    }

    #[tokio::test]
    async fn test_weekly_report() {
        let f = setup_test().await;
        let suresh = add_worker(&f, "Suresh", 500.0, 0.0).await;
        let anil = add_worker(&f, "Anil", 400.0, 0.0).await;

        record(&f, &suresh, "2024-06-03", days(5), 200.0, 100.0).await;
        record(&f, &anil, "2024-06-03", days(3), 0.0, 0.0).await;
        settle(&f, &anil, "2024-06-03").await;

        let report = f.service.weekly_report(&f.ctx, "2024-06-08").await.unwrap();
        assert_eq!(report.week_start, "2024-06-03");
        assert_eq!(report.rows.len(), 2);

        let first = &report.rows[0];
        assert_eq!(first.name, "Anil");
        assert_eq!(first.gross, 1200.0);
        assert_eq!(first.status, PaymentStatus::Paid);

        let second = &report.rows[1];
        assert_eq!(second.name, "Suresh");
        assert_eq!(second.total_days, 5.0);
        assert_eq!(second.gross, 2500.0);
        assert_eq!(second.recovered, 100.0);
        assert_eq!(second.advance_given, 200.0);
        assert_eq!(second.net, 2400.0);
        assert_eq!(second.status, PaymentStatus::Pending);

        assert_eq!(report.site_total.gross, 3700.0);
        assert_eq!(report.site_total.recovered, 100.0);
        assert_eq!(report.site_total.advance_given, 200.0);
        assert_eq!(report.site_total.net, 3600.0);
    }

    #[tokio::test]
    async fn test_reports_skip_deleted_workers() {
        let f = setup_test().await;
        let kept = add_worker(&f, "Kept", 500.0, 0.0).await;
        let removed = add_worker(&f, "Removed", 500.0, 0.0).await;

        record(&f, &kept, "2024-06-03", days(1), 0.0, 0.0).await;
        record(&f, &removed, "2024-06-03", days(2), 0.0, 0.0).await;
        f.workers.delete_worker(&f.ctx, &removed).await.unwrap();

        let weekly = f.service.weekly_report(&f.ctx, "2024-06-03").await.unwrap();
        assert_eq!(weekly.rows.len(), 1);
        assert_eq!(weekly.site_total.gross, 500.0);

        let monthly = f.service.monthly_report(&f.ctx, "2024-06").await.unwrap();
        assert_eq!(monthly.rows.len(), 1);
        assert_eq!(monthly.rows[0].worker_id, kept);
    }

    #[tokio::test]
    async fn test_monthly_report_aggregates_weeks() {
        let f = setup_test().await;
        let worker_id = add_worker(&f, "Ramesh", 500.0, 0.0).await;

        let mut first_week = days(4);
        first_week.sat = 0.5;
        record(&f, &worker_id, "2024-06-03", first_week, 0.0, 0.0).await;
        record(&f, &worker_id, "2024-06-10", days(4), 0.0, 0.0).await;
        // Starts in May, so it belongs to May's report
        record(&f, &worker_id, "2024-05-27", days(6), 0.0, 0.0).await;
        // Starts in July
        record(&f, &worker_id, "2024-07-01", days(6), 0.0, 0.0).await;

        let report = f.service.monthly_report(&f.ctx, "2024-06").await.unwrap();
        assert_eq!(report.month, "2024-06");
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].total_days, 8.5);
        assert_eq!(report.rows[0].total_gross, 4250.0);
        assert_eq!(report.site_total.gross, 4250.0);

        assert!(matches!(
            f.service.monthly_report(&f.ctx, "June").await,
            Err(LedgerError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_dashboard() {
        let f = setup_test().await;
        let ramesh = add_worker(&f, "Ramesh", 500.0, 700.0).await;
        let suresh = add_worker(&f, "Suresh", 500.0, 0.0).await;

        let today = Utc::now().date_naive();
        let this_week = WeekKey::containing(today).to_string();

        record(&f, &ramesh, &this_week, days(2), 300.0, 0.0).await;
        record(&f, &suresh, &this_week, days(1), 50.0, 0.0).await;
        settle(&f, &suresh, &this_week).await;

        let summary = f.service.dashboard(&f.ctx, today).await.unwrap();
        assert_eq!(summary.week_start, this_week);
        assert_eq!(summary.active_workers, 2);
        assert_eq!(summary.paid_count, 1);
        assert_eq!(summary.unpaid_count, 1);
        assert_eq!(summary.total_advances, 350.0);
        assert_eq!(summary.total_payout, 500.0);
        assert_eq!(summary.top_advance_balances.len(), 1);
        assert_eq!(summary.top_advance_balances[0].id, ramesh);
    }

    #[tokio::test]
    async fn test_worker_profile() {
        let f = setup_test().await;
        let worker_id = add_worker(&f, "Ramesh", 500.0, 0.0).await;

        record(&f, &worker_id, "2024-06-03", days(5), 200.0, 100.0).await;
        settle(&f, &worker_id, "2024-06-03").await;
        record(&f, &worker_id, "2024-06-10", days(2), 50.0, 30.0).await;

        let profile = f.service.worker_profile(&f.ctx, &worker_id).await.unwrap();
        assert_eq!(profile.worker.id, worker_id);
        assert_eq!(profile.payments.len(), 1);
        assert_eq!(profile.attendance.len(), 2);
        assert_eq!(profile.attendance[0].week_start, "2024-06-10");
        assert_eq!(profile.total_earned, 2500.0);
        assert_eq!(profile.total_paid, 2400.0);
        assert_eq!(profile.total_advances, 250.0);
        assert_eq!(profile.pending_amount, 970.0);

        assert!(matches!(
            f.service.worker_profile(&f.ctx, "worker::missing").await,
            Err(LedgerError::NotFound { .. })
        ));
    }
}
