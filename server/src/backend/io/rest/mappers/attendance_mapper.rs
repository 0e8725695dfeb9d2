use super::worker_mapper::WorkerMapper;
use crate::backend::domain::commands::attendance::{RecordAttendanceCommand, WeekRecordResult, WeekSheet};
use crate::backend::domain::models::attendance::{LedgerEntry, WeekDays as DomainWeekDays};
use crate::backend::storage::repositories::format_timestamp;
use shared::{
    AttendanceEntry, AttendanceInput, RecordAttendanceResponse, RejectedAttendance, WeekDays as SharedWeekDays,
    WeekSheetResponse, WeekSheetRow,
};

/// Mapper between shared attendance DTOs and ledger entries.
pub struct AttendanceMapper;

impl AttendanceMapper {
    pub fn days_to_domain(dto: SharedWeekDays) -> DomainWeekDays {
        DomainWeekDays {
            mon: dto.mon,
            tue: dto.tue,
            wed: dto.wed,
            thu: dto.thu,
            fri: dto.fri,
            sat: dto.sat,
            sun: dto.sun,
        }
    }

    pub fn days_to_dto(domain: DomainWeekDays) -> SharedWeekDays {
        SharedWeekDays {
            mon: domain.mon,
            tue: domain.tue,
            wed: domain.wed,
            thu: domain.thu,
            fri: domain.fri,
            sat: domain.sat,
            sun: domain.sun,
        }
    }

    pub fn to_dto(domain: LedgerEntry) -> AttendanceEntry {
        AttendanceEntry {
            total_days: domain.total_days(),
            week_start: domain.week.to_string(),
            updated_at: format_timestamp(&domain.updated_at),
            days: Self::days_to_dto(domain.days),
            id: domain.id,
            worker_id: domain.worker_id,
            cumulative_advance: domain.cumulative_advance,
            cumulative_recovery: domain.cumulative_recovery,
            settled: domain.settled,
        }
    }

    pub fn to_record_command(input: AttendanceInput) -> RecordAttendanceCommand {
        RecordAttendanceCommand {
            worker_id: input.worker_id,
            days: Self::days_to_domain(input.days),
            advance: input.advance,
            recovery: input.recovery,
        }
    }

    pub fn to_record_response_dto(domain: WeekRecordResult) -> RecordAttendanceResponse {
        RecordAttendanceResponse {
            week_start: domain.week.to_string(),
            saved: domain.saved.into_iter().map(Self::to_dto).collect(),
            skipped_settled: domain.skipped_settled,
            rejected: domain
                .rejected
                .into_iter()
                .map(|rejection| RejectedAttendance {
                    worker_id: rejection.worker_id,
                    reason: rejection.reason,
                })
                .collect(),
        }
    }

    pub fn to_week_sheet_dto(domain: WeekSheet) -> WeekSheetResponse {
        WeekSheetResponse {
            week_start: domain.week.to_string(),
            rows: domain
                .rows
                .into_iter()
                .map(|row| WeekSheetRow {
                    worker: WorkerMapper::to_dto(row.worker),
                    entry: row.entry.map(Self::to_dto),
                })
                .collect(),
        }
    }
}
