//! Admin login and the session check that guards every ledger operation.

use chrono::{Duration, Utc};
use log::{info, warn};
use std::sync::Arc;

use crate::backend::domain::credentials::{hash_password, verify_password};
use crate::backend::domain::errors::{LedgerError, LedgerResult};
use crate::backend::domain::models::admin::{Admin, AdminContext, Session};
use crate::backend::storage::{AdminRepository, DbConnection, SessionStore};

const INVALID_LOGIN: &str = "Invalid username or password";

#[derive(Clone)]
pub struct AuthService {
    admin_repository: AdminRepository,
    sessions: Arc<dyn SessionStore>,
    session_ttl: Duration,
    iterations: u32,
}

impl AuthService {
    pub fn new(db: DbConnection, sessions: Arc<dyn SessionStore>, session_ttl: Duration, iterations: u32) -> Self {
        Self {
            admin_repository: AdminRepository::new(db),
            sessions,
            session_ttl,
            iterations,
        }
    }

    /// Create the configured admin if no admin account exists yet.
    /// Returns true if an account was created.
    pub async fn ensure_admin(&self, username: &str, password: &str) -> LedgerResult<bool> {
        if self.admin_repository.count_admins().await? > 0 {
            return Ok(false);
        }

        info!("No admin accounts found, creating bootstrap admin '{}'", username);
        self.create_admin(username, password).await?;
        Ok(true)
    }

    pub async fn create_admin(&self, username: &str, password: &str) -> LedgerResult<Admin> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LedgerError::validation("Username cannot be empty"));
        }
        if password.is_empty() {
            return Err(LedgerError::validation("Password cannot be empty"));
        }

        let hashed = hash_password(password, self.iterations);
        let admin = Admin {
            id: Admin::generate_id(),
            username: username.to_string(),
            password_hash: hashed.hash,
            salt: hashed.salt,
            iterations: hashed.iterations,
            created_at: Utc::now(),
        };
        self.admin_repository.store_admin(&admin).await?;

        info!("Created admin: {} with ID: {}", admin.username, admin.id);
        Ok(admin)
    }

    /// Verify credentials and open a session
    pub async fn login(&self, username: &str, password: &str) -> LedgerResult<Session> {
        info!("Login attempt for '{}'", username);

        let admin = match self.admin_repository.find_by_username(username.trim()).await? {
            Some(admin) => admin,
            None => {
                warn!("Login failed: unknown user '{}'", username);
                return Err(LedgerError::Unauthorized(INVALID_LOGIN.to_string()));
            }
        };

        if !verify_password(password, &admin.password_hash, &admin.salt, admin.iterations) {
            warn!("Login failed: wrong password for '{}'", admin.username);
            return Err(LedgerError::Unauthorized(INVALID_LOGIN.to_string()));
        }

        let session = Session {
            token: Session::generate_token(),
            admin_id: admin.id,
            username: admin.username,
            expires_at: Utc::now() + self.session_ttl,
        };
        self.sessions.create_session(session.clone()).await?;

        info!("Admin '{}' logged in", session.username);
        Ok(session)
    }

    /// Resolve a bearer token to the admin it belongs to
    pub async fn authenticate(&self, token: &str) -> LedgerResult<AdminContext> {
        let session = self
            .sessions
            .get_session(token)
            .await?
            .ok_or_else(|| LedgerError::Unauthorized("Invalid session".to_string()))?;

        if session.is_expired(Utc::now()) {
            self.sessions.delete_session(token).await?;
            return Err(LedgerError::Unauthorized("Session expired".to_string()));
        }

        Ok(AdminContext::new(&session.admin_id, &session.username, &session.token))
    }

    pub async fn logout(&self, ctx: &AdminContext) -> LedgerResult<()> {
        self.sessions.delete_session(ctx.session_token()).await?;
        info!("Admin '{}' logged out", ctx.username());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::test_utils::TestDb;
    use crate::backend::storage::InMemorySessionStore;

    async fn setup_test(ttl: Duration) -> (TestDb, AuthService) {
        let test_db = TestDb::new().await;
        let service = AuthService::new(test_db.db.clone(), Arc::new(InMemorySessionStore::new()), ttl, 1000);
        (test_db, service)
    }

    #[tokio::test]
    async fn test_bootstrap_admin_only_once() {
        let (_db, service) = setup_test(Duration::hours(1)).await;

        assert!(service.ensure_admin("site-office", "first").await.unwrap());
        assert!(!service.ensure_admin("someone-else", "second").await.unwrap());

        assert!(service.login("site-office", "first").await.is_ok());
        assert!(service.login("someone-else", "second").await.is_err());
    }

    #[tokio::test]
    async fn test_login_and_authenticate() {
        let (_db, service) = setup_test(Duration::hours(1)).await;
        service.create_admin("site-office", "s3cret").await.unwrap();

        let session = service.login("site-office", "s3cret").await.expect("Login should succeed");
        let ctx = service.authenticate(&session.token).await.expect("Token should be valid");
        assert_eq!(ctx.username(), "site-office");
        assert_eq!(ctx.session_token(), session.token);

        service.logout(&ctx).await.unwrap();
        assert!(matches!(
            service.authenticate(&session.token).await,
            Err(LedgerError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_bad_credentials_share_one_message() {
        let (_db, service) = setup_test(Duration::hours(1)).await;
        service.create_admin("site-office", "s3cret").await.unwrap();

        let wrong_password = service.login("site-office", "guess").await.unwrap_err();
        let unknown_user = service.login("nobody", "s3cret").await.unwrap_err();
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert!(matches!(unknown_user, LedgerError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected() {
        let (_db, service) = setup_test(Duration::seconds(-1)).await;
        service.create_admin("site-office", "s3cret").await.unwrap();

        let session = service.login("site-office", "s3cret").await.unwrap();
        assert!(matches!(
            service.authenticate(&session.token).await,
            Err(LedgerError::Unauthorized(_))
        ));
        assert!(service.authenticate("made-up-token").await.is_err());
    }

    #[tokio::test]
    async fn test_create_admin_validation() {
        let (_db, service) = setup_test(Duration::hours(1)).await;
        assert!(matches!(
            service.create_admin("  ", "pw").await,
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            service.create_admin("site-office", "").await,
            Err(LedgerError::Validation(_))
        ));
    }
}
