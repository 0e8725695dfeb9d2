//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.

pub mod workers {
    /// Input for adding a worker to the directory.
    #[derive(Debug, Clone)]
    pub struct CreateWorkerCommand {
        pub name: String,
        pub phone: String,
        pub daily_rate: f64,
        pub opening_balance: f64,
        pub is_active: bool,
    }

    /// Partial update; `None` leaves the field as it is.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateWorkerCommand {
        pub name: Option<String>,
        pub phone: Option<String>,
        pub daily_rate: Option<f64>,
        pub is_active: Option<bool>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct WorkerListQuery {
        pub search: Option<String>,
        pub active_only: bool,
    }
}

pub mod attendance {
    use crate::backend::domain::models::attendance::{LedgerEntry, WeekDays};
    use crate::backend::domain::models::week::WeekKey;
    use crate::backend::domain::models::worker::Worker;

    /// One worker's line on the weekly attendance sheet.
    #[derive(Debug, Clone)]
    pub struct RecordAttendanceCommand {
        pub worker_id: String,
        pub days: WeekDays,
        pub advance: f64,
        pub recovery: f64,
    }

    /// What happened to a single attendance submission.
    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordOutcome {
        Saved(LedgerEntry),
        /// The week was already paid; the entry is returned unchanged.
        SkippedSettled(LedgerEntry),
    }

    impl RecordOutcome {
        pub fn entry(&self) -> &LedgerEntry {
            match self {
                RecordOutcome::Saved(entry) | RecordOutcome::SkippedSettled(entry) => entry,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordRejection {
        pub worker_id: String,
        pub reason: String,
    }

    /// Result of saving a whole week's sheet.
    #[derive(Debug, Clone)]
    pub struct WeekRecordResult {
        pub week: WeekKey,
        pub saved: Vec<LedgerEntry>,
        pub skipped_settled: Vec<String>,
        pub rejected: Vec<RecordRejection>,
    }

    #[derive(Debug, Clone)]
    pub struct WeekSheetRow {
        pub worker: Worker,
        pub entry: Option<LedgerEntry>,
    }

    #[derive(Debug, Clone)]
    pub struct WeekSheet {
        pub week: WeekKey,
        pub rows: Vec<WeekSheetRow>,
    }
}

pub mod settlement {
    use crate::backend::domain::models::attendance::WeekDays;
    use crate::backend::domain::models::payment::PaymentRecord;

    /// Pay one worker for one week, folding in any last changes first.
    #[derive(Debug, Clone)]
    pub struct SettleCommand {
        pub worker_id: String,
        /// Any date inside the week
        pub week_start: String,
        pub days: Option<WeekDays>,
        pub advance: f64,
        pub recovery: f64,
    }

    #[derive(Debug, Clone)]
    pub struct SettlementResult {
        pub payment: PaymentRecord,
        /// False when an earlier call had already paid this week
        pub newly_settled: bool,
    }
}
