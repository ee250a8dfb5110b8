use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::error::Result;
use crate::models::request::SessionKeyRequest;
use crate::models::session::UserSession;

/// The result of the conditional request-completion write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The request was pending and is now completed; the session row exists.
    Completed,
    /// The request was no longer `PendingAuth` when the write ran; nothing
    /// changed and no session row exists.
    NotPending,
}

/// The storage port for the credential subsystem.
///
/// Every method is an atomic unit of work. `authorize`'s exactly-once
/// guarantee rests on `complete_request_with_session` re-checking the
/// pending status and inserting the session inside one transaction, and on
/// `revoke_sessions`/`record_usage` being single conditional updates.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persists a new request exactly as constructed.
    async fn insert_request(&self, request: &SessionKeyRequest) -> Result<()>;

    /// Looks up a request by id.
    async fn find_request(&self, request_id: Uuid) -> Result<Option<SessionKeyRequest>>;

    /// Atomically completes a pending request and inserts its session.
    ///
    /// If the request is no longer `PendingAuth` when the write runs,
    /// nothing happens and `NotPending` is returned. A crash can never
    /// leave a completed request without its session, and two racing
    /// callers can never both create one.
    async fn complete_request_with_session(
        &self,
        request_id: Uuid,
        completed_at: DateTime<Utc>,
        session: &UserSession,
    ) -> Result<CompletionOutcome>;

    /// Deactivates every active session of a principal.
    ///
    /// Returns the number of rows changed; 0 when nothing was left to
    /// revoke. Safe under arbitrary concurrent invocation: each call flips
    /// only rows it still observes active.
    async fn revoke_sessions(
        &self,
        principal_id: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<u64>;

    /// The most recently created session of the principal that is active
    /// and unexpired at `now`, if any.
    async fn find_active_session(
        &self,
        principal_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UserSession>>;

    /// Counts one executed transaction against the session, only while the
    /// session is live and under its ceiling. Returns whether the
    /// increment landed. The counter never moves backwards.
    async fn record_usage(&self, session_id: Uuid, now: DateTime<Utc>) -> Result<bool>;
}
