use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::traits::SessionStore;
use crate::backend::domain::models::admin::Session;

/// Process-local session store; sessions do not survive a restart
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    /// Also drops every expired session, so tokens that are never presented
    /// again do not pile up
    async fn create_session(&self, session: Session) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        let before = sessions.len();
        sessions.retain(|_, existing| !existing.is_expired(now));
        if sessions.len() < before {
            debug!("Pruned {} expired sessions", before - sessions.len());
        }
        sessions.insert(session.token.clone(), session);
        Ok(())
    }

    async fn get_session(&self, token: &str) -> Result<Option<Session>> {
        Ok(self.sessions.read().await.get(token).cloned())
    }

    async fn delete_session(&self, token: &str) -> Result<bool> {
        Ok(self.sessions.write().await.remove(token).is_some())
    }
}
