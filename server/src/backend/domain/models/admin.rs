//! Admin accounts, sessions and the request-scoped admin capability.
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Stored admin credentials (PBKDF2-HMAC-SHA256, base64 encoded)
#[derive(Debug, Clone, PartialEq)]
pub struct Admin {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub salt: String,
    pub iterations: u32,
    pub created_at: DateTime<Utc>,
}

impl Admin {
    pub fn generate_id() -> String {
        format!("admin::{}", Uuid::new_v4().simple())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub admin_id: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn generate_token() -> String {
        Uuid::new_v4().simple().to_string()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Proof that the caller holds a live admin session.
///
/// Only the auth service mints these; every ledger operation takes one.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminContext {
    admin_id: String,
    username: String,
    session_token: String,
}

impl AdminContext {
    pub(crate) fn new(admin_id: &str, username: &str, session_token: &str) -> Self {
        Self {
            admin_id: admin_id.to_string(),
            username: username.to_string(),
            session_token: session_token.to_string(),
        }
    }

    pub fn admin_id(&self) -> &str {
        &self.admin_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn session_token(&self) -> &str {
        &self.session_token
    }
}
