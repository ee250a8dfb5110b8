use chrono::{DateTime, Utc};
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lamports per SOL. Amounts are stored as integer base units and converted
/// to display units only at query boundaries.
pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

/// Milliseconds per day.
const MS_PER_DAY: i64 = 86_400_000;

/// Whole days from `now` until `deadline`, rounded up.
pub(crate) fn days_until(now: DateTime<Utc>, deadline: DateTime<Utc>) -> i64 {
    let ms = (deadline - now).num_milliseconds();
    ms / MS_PER_DAY + i64::from(ms % MS_PER_DAY > 0)
}

/// Converts integer base units (lamports) to display units (SOL).
pub(crate) fn lamports_to_sol(lamports: i64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL
}

/// The authorization status of a session-key request.
///
/// "Expired" is never a stored value; it is derived from `valid_until`
/// at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSql, FromSql)]
#[postgres(name = "request_status")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[postgres(name = "pending_auth")]
    PendingAuth,
    #[postgres(name = "completed")]
    Completed,
}

/// A proposal for delegation, not yet usable as a credential.
#[derive(Debug, Clone, Serialize)]
pub struct SessionKeyRequest {
    /// The unique identifier for the request.
    pub id: Uuid,
    /// The wallet address of the principal delegating authority.
    pub principal_id: String,
    /// The authorization status. Transitions `PendingAuth` → `Completed`
    /// at most once.
    pub status: RequestStatus,
    /// The deadline for authorizing the request; also becomes the expiry
    /// of the session created from it.
    pub valid_until: DateTime<Utc>,
    /// The maximum number of transactions the delegated key may execute.
    pub max_transactions: i32,
    /// The per-transaction spend cap in lamports.
    pub max_amount_per_tx: i64,
    /// The program identifiers the delegated key may interact with.
    pub allowed_programs: Vec<String>,
    /// The timestamp when the request was completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// The timestamp when the request was created.
    pub created_at: DateTime<Utc>,
}

impl SessionKeyRequest {
    /// Whether the request is expired: past its deadline while still pending.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.valid_until < now && self.status == RequestStatus::PendingAuth
    }

    /// Whole validity days remaining, rounded up.
    pub fn valid_days(&self, now: DateTime<Utc>) -> i64 {
        days_until(now, self.valid_until)
    }

    /// The spend cap converted to display units (SOL).
    pub fn max_amount_display(&self) -> f64 {
        lamports_to_sol(self.max_amount_per_tx)
    }
}

/// Parameters for opening a new session-key request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSessionKeyRequest {
    pub principal_id: String,
    pub valid_until: DateTime<Utc>,
    pub max_transactions: i32,
    pub max_amount_per_tx: i64,
    pub allowed_programs: Vec<String>,
}
