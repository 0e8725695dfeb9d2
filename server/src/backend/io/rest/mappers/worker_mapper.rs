use crate::backend::domain::commands::workers::{CreateWorkerCommand, UpdateWorkerCommand, WorkerListQuery};
use crate::backend::domain::models::worker::Worker as DomainWorker;
use crate::backend::storage::repositories::format_timestamp;
use shared::{
    CreateWorkerRequest, UpdateWorkerRequest, Worker as SharedWorker, WorkerListRequest, WorkerListResponse,
    WorkerResponse,
};

/// Mapper between shared worker DTOs and the domain worker model.
pub struct WorkerMapper;

impl WorkerMapper {
    pub fn to_dto(domain: DomainWorker) -> SharedWorker {
        SharedWorker {
            created_at: format_timestamp(&domain.created_at),
            id: domain.id,
            name: domain.name,
            phone: domain.phone,
            daily_rate: domain.daily_rate,
            advance_balance: domain.advance_balance,
            is_active: domain.is_active,
        }
    }

    pub fn to_response_dto(domain: DomainWorker, success_message: &str) -> WorkerResponse {
        WorkerResponse {
            worker: Self::to_dto(domain),
            success_message: success_message.to_string(),
        }
    }

    pub fn to_list_dto(domain_workers: Vec<DomainWorker>) -> WorkerListResponse {
        WorkerListResponse {
            workers: domain_workers.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_create_command(request: CreateWorkerRequest) -> CreateWorkerCommand {
        CreateWorkerCommand {
            name: request.name,
            phone: request.phone,
            daily_rate: request.daily_rate,
            opening_balance: request.opening_balance,
            is_active: request.is_active.unwrap_or(true),
        }
    }

    pub fn to_update_command(request: UpdateWorkerRequest) -> UpdateWorkerCommand {
        UpdateWorkerCommand {
            name: request.name,
            phone: request.phone,
            daily_rate: request.daily_rate,
            is_active: request.is_active,
        }
    }

    pub fn to_list_query(request: WorkerListRequest) -> WorkerListQuery {
        WorkerListQuery {
            search: request.search,
            active_only: request.active_only,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_to_dto() {
        let domain = DomainWorker {
            id: "worker::1".to_string(),
            name: "Ramesh".to_string(),
            phone: "9800000001".to_string(),
            daily_rate: 500.0,
            advance_balance: 100.0,
            is_active: true,
            created_at: Utc.with_ymd_and_hms(2024, 6, 3, 8, 30, 0).unwrap(),
        };

        let dto = WorkerMapper::to_dto(domain);
        assert_eq!(dto.id, "worker::1");
        assert_eq!(dto.created_at, "2024-06-03T08:30:00.000000Z");
        assert_eq!(dto.advance_balance, 100.0);
    }

    #[test]
    fn test_create_command_defaults_to_active() {
        let request = CreateWorkerRequest {
            name: "Ramesh".to_string(),
            phone: "9800000001".to_string(),
            daily_rate: 500.0,
            opening_balance: 0.0,
            is_active: None,
        };
        assert!(WorkerMapper::to_create_command(request).is_active);
    }
}
