use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::request::{NewSessionKeyRequest, RequestStatus, SessionKeyRequest};
use crate::repositories::store::SessionStore;
use crate::validation::session as validation;

/// The caller-facing view of a pending request's signing bounds.
#[derive(Debug, Clone, Serialize)]
pub struct RequestConfig {
    pub request_id: Uuid,
    /// Whole validity days remaining, rounded up.
    pub valid_days: i64,
    pub max_transactions: i32,
    /// The per-transaction spend cap in display units (SOL).
    pub max_amount_display: f64,
    pub allowed_programs: Vec<String>,
}

/// Opens a new session-key request in `pending_auth`.
///
/// # Arguments
///
/// * `store` - The session store.
/// * `new_request` - The delegation bounds proposed by the collaborator.
///
/// # Returns
///
/// A `Result` containing the persisted `SessionKeyRequest`.
pub async fn create_request<S: SessionStore>(
    store: &S,
    new_request: NewSessionKeyRequest,
) -> Result<SessionKeyRequest> {
    validation::validate_principal_id(&new_request.principal_id)?;

    let now = Utc::now();
    validation::validate_request_limits(
        new_request.valid_until,
        now,
        new_request.max_transactions,
        new_request.max_amount_per_tx,
    )?;
    validation::validate_allowed_programs(&new_request.allowed_programs)?;

    let request = SessionKeyRequest {
        id: Uuid::new_v4(),
        principal_id: new_request.principal_id,
        status: RequestStatus::PendingAuth,
        valid_until: new_request.valid_until,
        max_transactions: new_request.max_transactions,
        max_amount_per_tx: new_request.max_amount_per_tx,
        allowed_programs: new_request.allowed_programs,
        completed_at: None,
        created_at: now,
    };

    store.insert_request(&request).await?;

    tracing::info!(
        "📝 Session key request created: {} for principal {}",
        request.id,
        request.principal_id
    );
    Ok(request)
}

/// Fetches the signing bounds of a pending request for display to the
/// authorizing principal.
///
/// Failure order: `NotFound` for unknown ids, then `InvalidState` for
/// already-completed requests, then `Expired` for requests past their
/// deadline. Pure read; nothing changes state here.
pub async fn get_config<S: SessionStore>(store: &S, request_id: Uuid) -> Result<RequestConfig> {
    let request = store
        .find_request(request_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if request.status != RequestStatus::PendingAuth {
        return Err(AppError::InvalidState(
            "Request already completed".to_string(),
        ));
    }

    let now = Utc::now();
    if request.is_expired(now) {
        return Err(AppError::Expired);
    }

    Ok(RequestConfig {
        request_id: request.id,
        valid_days: request.valid_days(now),
        max_transactions: request.max_transactions,
        max_amount_display: request.max_amount_display(),
        allowed_programs: request.allowed_programs,
    })
}
