pub mod admin;
pub mod attendance;
pub mod payment;
pub mod week;
pub mod worker;
