use chrono::{DateTime, Utc};
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::request::{days_until, lamports_to_sol};

/// The status of a delegated session.
///
/// There is no "expired" variant: expiry is derived from `expires_at`
/// wherever the session is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSql, FromSql)]
#[postgres(name = "session_status")]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[postgres(name = "authorized")]
    Authorized,
    #[postgres(name = "revoked")]
    Revoked,
}

/// An active or historical delegated credential.
///
/// ⚠️ IMPORTANT: `session_key_private` stores ONLY ciphertext, sealed with
/// AES-256-GCM under the principal's derived key; `encryption_iv` is the IV
/// it was sealed with. The plaintext key never touches this struct.
#[derive(Debug, Clone)]
pub struct UserSession {
    /// The unique identifier for the session.
    pub id: Uuid,
    /// The wallet address of the principal who delegated this session.
    pub principal_id: String,
    /// The public half of the session keypair.
    pub session_key_public: String,
    /// ⚠️ Encrypted session private key (ciphertext only).
    pub session_key_private: Vec<u8>,
    /// The AES-GCM IV used to seal `session_key_private`.
    pub encryption_iv: Vec<u8>,
    /// When the session stops being usable.
    pub expires_at: DateTime<Utc>,
    /// The maximum number of transactions this session may execute.
    pub max_transactions: i32,
    /// The per-transaction spend cap in lamports.
    pub max_amount_per_tx: i64,
    /// The program identifiers this session may interact with.
    pub allowed_programs: Vec<String>,
    /// The session status. Revocation is terminal.
    pub status: SessionStatus,
    /// Whether the session is active. Once false, never true again.
    pub is_active: bool,
    /// Transactions executed so far. Incremented only by the transaction
    /// executor; never decremented.
    pub transactions_used: i32,
    /// The IP the authorization came from, when known.
    pub request_ip: Option<String>,
    /// The user agent the authorization came from, when known.
    pub request_user_agent: Option<String>,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the session was revoked.
    pub revoked_at: Option<DateTime<Utc>>,
}

impl UserSession {
    /// Whether the session can still be used: active flag set and deadline
    /// not passed. A session past `expires_at` is inactive to every reader
    /// even though nothing flipped the flag (lazy expiry).
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at > now
    }

    /// Whole days until expiry, rounded up.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        days_until(now, self.expires_at)
    }

    /// Transactions left under the ceiling. Not clamped at zero; goes
    /// negative if the executor ever exceeded the ceiling.
    pub fn transactions_remaining(&self) -> i32 {
        self.max_transactions - self.transactions_used
    }

    /// The spend cap converted to display units (SOL).
    pub fn max_amount_display(&self) -> f64 {
        lamports_to_sol(self.max_amount_per_tx)
    }
}
