//! # Storage Module
//!
//! Persistence for the site ledger: an SQLite pool behind one repository
//! per table, plus the admin session store.
//!
//! Repository methods that must take part in a settlement transaction come
//! in a `*_in` form taking `&mut SqliteConnection`; both a pooled connection
//! and an open [`WriteTransaction`] can be passed there.

pub mod connection;
pub mod repositories;
pub mod session_store;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use connection::{DbConnection, WriteTransaction};
pub use repositories::{AdminRepository, AttendanceRepository, PaymentRepository, WorkerRepository};
pub use session_store::InMemorySessionStore;
pub use traits::SessionStore;
