use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::Result,
    models::request::{RequestStatus, SessionKeyRequest},
    models::session::{SessionStatus, UserSession},
    repositories::store::{CompletionOutcome, SessionStore},
};

#[derive(Default)]
struct MemoryInner {
    requests: HashMap<Uuid, SessionKeyRequest>,
    sessions: HashMap<Uuid, UserSession>,
}

/// An in-process `SessionStore` over shared maps.
///
/// Substitutes for `PgSessionStore` in tests and embedded setups. The
/// single write lock gives each method the same atomicity the Postgres
/// implementation gets from transactions and conditional updates.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    inner: Arc<RwLock<MemoryInner>>,
}

impl MemorySessionStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a session row directly, bypassing the authorize flow.
    ///
    /// Test affordance of the double; production rows are born only
    /// through `complete_request_with_session`.
    pub async fn seed_session(&self, session: UserSession) {
        let mut inner = self.inner.write().await;
        inner.sessions.insert(session.id, session);
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert_request(&self, request: &SessionKeyRequest) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn find_request(&self, request_id: Uuid) -> Result<Option<SessionKeyRequest>> {
        let inner = self.inner.read().await;
        Ok(inner.requests.get(&request_id).cloned())
    }

    async fn complete_request_with_session(
        &self,
        request_id: Uuid,
        completed_at: DateTime<Utc>,
        session: &UserSession,
    ) -> Result<CompletionOutcome> {
        let mut inner = self.inner.write().await;

        let Some(request) = inner.requests.get_mut(&request_id) else {
            return Ok(CompletionOutcome::NotPending);
        };
        if request.status != RequestStatus::PendingAuth {
            return Ok(CompletionOutcome::NotPending);
        }

        request.status = RequestStatus::Completed;
        request.completed_at = Some(completed_at);
        inner.sessions.insert(session.id, session.clone());
        Ok(CompletionOutcome::Completed)
    }

    async fn revoke_sessions(
        &self,
        principal_id: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<u64> {
        let mut inner = self.inner.write().await;
        let mut revoked = 0;

        for session in inner
            .sessions
            .values_mut()
            .filter(|s| s.principal_id == principal_id && s.is_active)
        {
            session.is_active = false;
            session.status = SessionStatus::Revoked;
            session.revoked_at = Some(revoked_at);
            revoked += 1;
        }

        Ok(revoked)
    }

    async fn find_active_session(
        &self,
        principal_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UserSession>> {
        let inner = self.inner.read().await;
        Ok(inner
            .sessions
            .values()
            .filter(|s| s.principal_id == principal_id && s.is_live(now))
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    async fn record_usage(&self, session_id: Uuid, now: DateTime<Utc>) -> Result<bool> {
        let mut inner = self.inner.write().await;
        match inner.sessions.get_mut(&session_id) {
            Some(session)
                if session.is_live(now)
                    && session.transactions_used < session.max_transactions =>
            {
                session.transactions_used += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
