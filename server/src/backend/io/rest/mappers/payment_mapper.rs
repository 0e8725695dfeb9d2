use super::attendance_mapper::AttendanceMapper;
use crate::backend::domain::commands::settlement::{SettleCommand, SettlementResult};
use crate::backend::domain::models::payment::PaymentRecord as DomainPayment;
use crate::backend::storage::repositories::format_timestamp;
use shared::{PaymentRecord as SharedPayment, SettleRequest, SettleResponse};

/// Mapper between shared settlement DTOs and payment journal records.
pub struct PaymentMapper;

impl PaymentMapper {
    pub fn to_dto(domain: DomainPayment) -> SharedPayment {
        SharedPayment {
            week_start: domain.week.to_string(),
            paid_at: format_timestamp(&domain.paid_at),
            id: domain.id,
            worker_id: domain.worker_id,
            gross_amount: domain.gross_amount,
            advance_recovered: domain.advance_recovered,
            advance_given: domain.advance_given,
            net_paid: domain.net_paid,
            balance_after: domain.balance_after,
        }
    }

    pub fn to_settle_command(request: SettleRequest) -> SettleCommand {
        SettleCommand {
            worker_id: request.worker_id,
            week_start: request.week_start,
            days: request.days.map(AttendanceMapper::days_to_domain),
            advance: request.advance,
            recovery: request.recovery,
        }
    }

    pub fn to_settle_response_dto(domain: SettlementResult) -> SettleResponse {
        let success_message = if domain.newly_settled {
            "Week settled successfully"
        } else {
            "Week was already settled"
        };
        SettleResponse {
            payment: Self::to_dto(domain.payment),
            newly_settled: domain.newly_settled,
            success_message: success_message.to_string(),
        }
    }
}
