pub mod attendance_mapper;
pub mod payment_mapper;
pub mod worker_mapper;

pub use attendance_mapper::AttendanceMapper;
pub use payment_mapper::PaymentMapper;
pub use worker_mapper::WorkerMapper;
