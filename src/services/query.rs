use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::models::session::SessionStatus;
use crate::repositories::store::SessionStore;

/// The projection of a live session returned by `get_info`.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveSessionView {
    pub session_public_key: String,
    pub expires_at: DateTime<Utc>,
    /// Whole days until expiry, rounded up.
    pub days_remaining: i64,
    pub transactions_used: i32,
    /// Transactions left under the ceiling. Not clamped: over-use shows up
    /// as a negative number rather than being hidden.
    pub transactions_remaining: i32,
    /// The per-transaction spend cap in display units (SOL).
    pub max_amount_display: f64,
    pub status: SessionStatus,
}

/// The answer to "does this principal currently hold a usable session?".
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub has_active_session: bool,
    /// Present only when `has_active_session` is true; flattened into the
    /// top level on serialization.
    #[serde(flatten)]
    pub session: Option<ActiveSessionView>,
}

/// Reports the live-session status of a principal.
///
/// Picks the most recently created session that is active and unexpired
/// right now; revoked and expired sessions are invisible here. A principal
/// without one gets `has_active_session: false`, never an error. Pure read.
pub async fn get_info<S: SessionStore>(store: &S, principal_id: &str) -> Result<SessionInfo> {
    let now = Utc::now();

    let Some(session) = store.find_active_session(principal_id, now).await? else {
        return Ok(SessionInfo {
            has_active_session: false,
            session: None,
        });
    };

    let days_remaining = session.days_remaining(now);
    let transactions_remaining = session.transactions_remaining();
    let max_amount_display = session.max_amount_display();

    Ok(SessionInfo {
        has_active_session: true,
        session: Some(ActiveSessionView {
            session_public_key: session.session_key_public,
            expires_at: session.expires_at,
            days_remaining,
            transactions_used: session.transactions_used,
            transactions_remaining,
            max_amount_display,
            status: session.status,
        }),
    })
}
