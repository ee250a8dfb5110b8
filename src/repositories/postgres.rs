use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::request::{RequestStatus, SessionKeyRequest},
    models::session::{SessionStatus, UserSession},
    repositories::store::{CompletionOutcome, SessionStore},
};

/// A helper function to map a `tokio_postgres::Row` to a `SessionKeyRequest`.
fn row_to_request(row: &Row) -> Result<SessionKeyRequest> {
    Ok(SessionKeyRequest {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        principal_id: row.try_get("principal_id").map_err(|_| AppError::MissingData("principal_id".to_string()))?,
        status: row.try_get("status").map_err(|_| AppError::MissingData("status".to_string()))?,
        valid_until: row.try_get("valid_until").map_err(|_| AppError::MissingData("valid_until".to_string()))?,
        max_transactions: row.try_get("max_transactions").map_err(|_| AppError::MissingData("max_transactions".to_string()))?,
        max_amount_per_tx: row.try_get("max_amount_per_tx").map_err(|_| AppError::MissingData("max_amount_per_tx".to_string()))?,
        allowed_programs: row.try_get("allowed_programs").map_err(|_| AppError::MissingData("allowed_programs".to_string()))?,
        completed_at: row.try_get("completed_at").map_err(|_| AppError::MissingData("completed_at".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

/// A helper function to map a `tokio_postgres::Row` to a `UserSession`.
fn row_to_session(row: &Row) -> Result<UserSession> {
    Ok(UserSession {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        principal_id: row.try_get("principal_id").map_err(|_| AppError::MissingData("principal_id".to_string()))?,
        session_key_public: row.try_get("session_key_public").map_err(|_| AppError::MissingData("session_key_public".to_string()))?,
        session_key_private: row.try_get("session_key_private").map_err(|_| AppError::MissingData("session_key_private".to_string()))?,
        encryption_iv: row.try_get("encryption_iv").map_err(|_| AppError::MissingData("encryption_iv".to_string()))?,
        expires_at: row.try_get("expires_at").map_err(|_| AppError::MissingData("expires_at".to_string()))?,
        max_transactions: row.try_get("max_transactions").map_err(|_| AppError::MissingData("max_transactions".to_string()))?,
        max_amount_per_tx: row.try_get("max_amount_per_tx").map_err(|_| AppError::MissingData("max_amount_per_tx".to_string()))?,
        allowed_programs: row.try_get("allowed_programs").map_err(|_| AppError::MissingData("allowed_programs".to_string()))?,
        status: row.try_get("status").map_err(|_| AppError::MissingData("status".to_string()))?,
        is_active: row.try_get("is_active").map_err(|_| AppError::MissingData("is_active".to_string()))?,
        transactions_used: row.try_get("transactions_used").map_err(|_| AppError::MissingData("transactions_used".to_string()))?,
        request_ip: row.try_get("request_ip").map_err(|_| AppError::MissingData("request_ip".to_string()))?,
        request_user_agent: row.try_get("request_user_agent").map_err(|_| AppError::MissingData("request_user_agent".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
        revoked_at: row.try_get("revoked_at").map_err(|_| AppError::MissingData("revoked_at".to_string()))?,
    })
}

/// The production `SessionStore` backed by PostgreSQL.
///
/// Timestamps always arrive as parameters so that the service layer's clock
/// is the only clock; no statement calls `NOW()`.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: Pool,
}

impl PgSessionStore {
    /// Creates a new store over the given connection pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn insert_request(&self, request: &SessionKeyRequest) -> Result<()> {
        let client = self.pool.get().await?;
        client
            .execute(
                r#"
                INSERT INTO session_key_requests (
                    id, principal_id, status, valid_until, max_transactions,
                    max_amount_per_tx, allowed_programs, completed_at, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
                &[
                    &request.id,
                    &request.principal_id,
                    &request.status,
                    &request.valid_until,
                    &request.max_transactions,
                    &request.max_amount_per_tx,
                    &request.allowed_programs,
                    &request.completed_at,
                    &request.created_at,
                ],
            )
            .await?;
        Ok(())
    }

    async fn find_request(&self, request_id: Uuid) -> Result<Option<SessionKeyRequest>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT *
                FROM session_key_requests
                WHERE id = $1
                "#,
                &[&request_id],
            )
            .await?;
        row.map(|r| row_to_request(&r)).transpose()
    }

    async fn complete_request_with_session(
        &self,
        request_id: Uuid,
        completed_at: DateTime<Utc>,
        session: &UserSession,
    ) -> Result<CompletionOutcome> {
        let mut client = self.pool.get().await?;
        let transaction = client.transaction().await?;

        let updated = transaction
            .execute(
                r#"
                UPDATE session_key_requests
                SET status = $2, completed_at = $3
                WHERE id = $1 AND status = $4
                "#,
                &[
                    &request_id,
                    &RequestStatus::Completed,
                    &completed_at,
                    &RequestStatus::PendingAuth,
                ],
            )
            .await?;

        if updated == 0 {
            // Dropping the transaction rolls it back.
            return Ok(CompletionOutcome::NotPending);
        }

        transaction
            .execute(
                r#"
                INSERT INTO user_sessions (
                    id, principal_id, session_key_public, session_key_private,
                    encryption_iv, expires_at, max_transactions, max_amount_per_tx,
                    allowed_programs, status, is_active, transactions_used,
                    request_ip, request_user_agent, created_at, revoked_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
                "#,
                &[
                    &session.id,
                    &session.principal_id,
                    &session.session_key_public,
                    &session.session_key_private,
                    &session.encryption_iv,
                    &session.expires_at,
                    &session.max_transactions,
                    &session.max_amount_per_tx,
                    &session.allowed_programs,
                    &session.status,
                    &session.is_active,
                    &session.transactions_used,
                    &session.request_ip,
                    &session.request_user_agent,
                    &session.created_at,
                    &session.revoked_at,
                ],
            )
            .await?;

        transaction.commit().await?;
        Ok(CompletionOutcome::Completed)
    }

    async fn revoke_sessions(
        &self,
        principal_id: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<u64> {
        let client = self.pool.get().await?;
        let revoked = client
            .execute(
                r#"
                UPDATE user_sessions
                SET is_active = false, status = $2, revoked_at = $3
                WHERE principal_id = $1 AND is_active = true
                "#,
                &[&principal_id, &SessionStatus::Revoked, &revoked_at],
            )
            .await?;
        Ok(revoked)
    }

    async fn find_active_session(
        &self,
        principal_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UserSession>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT *
                FROM user_sessions
                WHERE principal_id = $1 AND is_active = true AND expires_at > $2
                ORDER BY created_at DESC
                LIMIT 1
                "#,
                &[&principal_id, &now],
            )
            .await?;
        row.map(|r| row_to_session(&r)).transpose()
    }

    async fn record_usage(&self, session_id: Uuid, now: DateTime<Utc>) -> Result<bool> {
        let client = self.pool.get().await?;
        let updated = client
            .execute(
                r#"
                UPDATE user_sessions
                SET transactions_used = transactions_used + 1
                WHERE id = $1
                  AND is_active = true
                  AND expires_at > $2
                  AND transactions_used < max_transactions
                "#,
                &[&session_id, &now],
            )
            .await?;
        Ok(updated == 1)
    }
}
