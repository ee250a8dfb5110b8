use chrono::{DateTime, Utc};
use crate::error::{AppError, Result};

/// Upper bound for free-form identifier fields.
const MAX_FIELD_LEN: usize = 255;

/// Validates a principal (wallet) identifier.
///
/// # Arguments
///
/// * `principal_id` - The wallet address to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the identifier is acceptable.
pub fn validate_principal_id(principal_id: &str) -> Result<()> {
    if principal_id.trim().is_empty() {
        return Err(AppError::Validation(
            "Principal wallet is required".to_string(),
        ));
    }

    if principal_id.len() > MAX_FIELD_LEN {
        return Err(AppError::Validation(format!(
            "Principal wallet must be at most {} characters",
            MAX_FIELD_LEN
        )));
    }

    Ok(())
}

/// Validates the public half of a session keypair.
pub fn validate_session_key_public(session_key_public: &str) -> Result<()> {
    if session_key_public.trim().is_empty() {
        return Err(AppError::Validation(
            "Session public key is required".to_string(),
        ));
    }

    if session_key_public.len() > MAX_FIELD_LEN {
        return Err(AppError::Validation(format!(
            "Session public key must be at most {} characters",
            MAX_FIELD_LEN
        )));
    }

    Ok(())
}

/// Validates the private half of a session keypair.
///
/// Only shape is checked; the value itself never reaches an error message.
pub fn validate_session_key_private(session_key_private: &str) -> Result<()> {
    if session_key_private.is_empty() {
        return Err(AppError::Validation(
            "Session private key is required".to_string(),
        ));
    }

    if session_key_private.len() > MAX_FIELD_LEN {
        return Err(AppError::Validation(format!(
            "Session private key must be at most {} characters",
            MAX_FIELD_LEN
        )));
    }

    Ok(())
}

/// Validates the delegation window and ceilings of a new request.
pub fn validate_request_limits(
    valid_until: DateTime<Utc>,
    now: DateTime<Utc>,
    max_transactions: i32,
    max_amount_per_tx: i64,
) -> Result<()> {
    if valid_until <= now {
        return Err(AppError::Validation(
            "Validity deadline must be in the future".to_string(),
        ));
    }

    if max_transactions < 0 {
        return Err(AppError::Validation(
            "Transaction ceiling cannot be negative".to_string(),
        ));
    }

    if max_amount_per_tx < 0 {
        return Err(AppError::Validation(
            "Amount ceiling cannot be negative".to_string(),
        ));
    }

    Ok(())
}

/// Validates a program allowlist: every entry must be a non-empty identifier.
pub fn validate_allowed_programs(allowed_programs: &[String]) -> Result<()> {
    for program in allowed_programs {
        if program.trim().is_empty() {
            return Err(AppError::Validation(
                "Allowed program identifiers cannot be empty".to_string(),
            ));
        }

        if program.len() > MAX_FIELD_LEN {
            return Err(AppError::Validation(format!(
                "Allowed program identifiers must be at most {} characters",
                MAX_FIELD_LEN
            )));
        }
    }

    Ok(())
}
