use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::crypto::session_key::KeyEncryption;
use crate::error::{AppError, Result};
use crate::models::request::RequestStatus;
use crate::models::session::{SessionStatus, UserSession};
use crate::repositories::store::{CompletionOutcome, SessionStore};
use crate::validation::session as validation;

/// Input for turning a pending request into an active session.
#[derive(Clone)]
pub struct AuthorizeSession {
    /// The request being authorized.
    pub request_id: Uuid,
    /// The public half of the freshly generated session keypair.
    pub session_key_public: String,
    /// The plaintext private half. Sealed before persistence; zeroized on
    /// drop and redacted from `Debug` output.
    pub session_key_private: Zeroizing<String>,
    /// The wallet of the principal giving consent. Must match the
    /// request's principal.
    pub principal_wallet: String,
    /// The IP the consent came from, when known.
    pub request_ip: Option<String>,
    /// The user agent the consent came from, when known.
    pub request_user_agent: Option<String>,
}

impl fmt::Debug for AuthorizeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizeSession")
            .field("request_id", &self.request_id)
            .field("session_key_public", &self.session_key_public)
            .field("session_key_private", &"[REDACTED]")
            .field("principal_wallet", &self.principal_wallet)
            .field("request_ip", &self.request_ip)
            .field("request_user_agent", &self.request_user_agent)
            .finish()
    }
}

/// The caller-facing receipt of a successful authorization.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizedSession {
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub max_transactions: i32,
}

/// The result of a bulk revocation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RevocationOutcome {
    /// How many sessions this call actually deactivated.
    pub revoked_count: u64,
}

/// Authorizes a pending request into an active session, exactly once.
///
/// Precondition order, each a distinct failure: required fields present
/// (`Validation`), request exists (`NotFound`), request still pending
/// (`InvalidState`), deadline not passed (`Expired`), consenting wallet
/// matches the request's principal (`Validation`).
///
/// The private key is sealed per principal before anything is written.
/// Request completion and session creation happen in one atomic store
/// operation, so a concurrent or retried authorize observes `InvalidState`
/// instead of minting a second credential.
///
/// # Arguments
///
/// * `store` - The session store.
/// * `keys` - The key-encryption service.
/// * `input` - The authorization input, including the plaintext key.
///
/// # Returns
///
/// A `Result` containing the `AuthorizedSession` receipt.
pub async fn authorize<S: SessionStore>(
    store: &S,
    keys: &KeyEncryption,
    input: AuthorizeSession,
) -> Result<AuthorizedSession> {
    validation::validate_principal_id(&input.principal_wallet)?;
    validation::validate_session_key_public(&input.session_key_public)?;
    validation::validate_session_key_private(&input.session_key_private)?;

    let request = store
        .find_request(input.request_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if request.status != RequestStatus::PendingAuth {
        return Err(AppError::InvalidState(
            "Request already completed".to_string(),
        ));
    }

    let now = Utc::now();
    if request.is_expired(now) {
        tracing::warn!("⚠️ Authorization attempted on expired request: {}", request.id);
        return Err(AppError::Expired);
    }

    if input.principal_wallet != request.principal_id {
        return Err(AppError::Validation(
            "Wallet does not match the requesting principal".to_string(),
        ));
    }

    let (ciphertext, iv) = keys.encrypt(&input.session_key_private, &request.principal_id)?;

    let session = UserSession {
        id: Uuid::new_v4(),
        principal_id: request.principal_id.clone(),
        session_key_public: input.session_key_public,
        session_key_private: ciphertext,
        encryption_iv: iv.to_vec(),
        expires_at: request.valid_until,
        max_transactions: request.max_transactions,
        max_amount_per_tx: request.max_amount_per_tx,
        allowed_programs: request.allowed_programs.clone(),
        status: SessionStatus::Authorized,
        is_active: true,
        transactions_used: 0,
        request_ip: input.request_ip,
        request_user_agent: input.request_user_agent,
        created_at: now,
        revoked_at: None,
    };

    match store
        .complete_request_with_session(request.id, now, &session)
        .await?
    {
        CompletionOutcome::Completed => {}
        CompletionOutcome::NotPending => {
            // Lost the race to another authorize of the same request; the
            // store wrote nothing.
            return Err(AppError::InvalidState(
                "Request already completed".to_string(),
            ));
        }
    }

    tracing::info!(
        "✅ Session {} authorized for principal {} (expires {})",
        session.id,
        session.principal_id,
        session.expires_at
    );

    Ok(AuthorizedSession {
        session_id: session.id,
        expires_at: session.expires_at,
        max_transactions: session.max_transactions,
    })
}

/// Revokes every active session of a principal.
///
/// Idempotent: repeating the call (or racing it against itself) is
/// harmless, later calls simply find nothing left to flip and report 0.
/// An unknown principal is not an error either.
pub async fn revoke<S: SessionStore>(store: &S, principal_id: &str) -> Result<RevocationOutcome> {
    let revoked_count = store.revoke_sessions(principal_id, Utc::now()).await?;

    if revoked_count > 0 {
        tracing::info!(
            "🔒 Revoked {} session(s) for principal {}",
            revoked_count,
            principal_id
        );
    }

    Ok(RevocationOutcome { revoked_count })
}
