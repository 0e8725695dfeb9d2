//! # Storage Traits
//!
//! Abstractions the domain layer depends on where more than one backend
//! makes sense.

use anyhow::Result;
use async_trait::async_trait;

use crate::backend::domain::models::admin::Session;

/// Trait defining the interface for admin session storage
///
/// Sessions are short-lived, so the default implementation keeps them in
/// memory. A persistent store can be swapped in without touching the
/// auth service.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(&self, session: Session) -> Result<()>;

    /// Look up a session by token, expired ones included
    async fn get_session(&self, token: &str) -> Result<Option<Session>>;

    /// Returns true if a session was removed
    async fn delete_session(&self, token: &str) -> Result<bool>;
}
