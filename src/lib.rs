//! Delegated session-key custody for automated agents.
//!
//! A principal opens a [`models::request::SessionKeyRequest`] bounding what
//! a delegated signing key may do (validity window, transaction count,
//! per-transaction spend in lamports, program allowlist), authorizes it
//! exactly once into a [`models::session::UserSession`] whose private key
//! is sealed per principal with AES-256-GCM, and can revoke every one of
//! its sessions on demand. The transaction executor that actually signs
//! with the delegated key lives outside this crate and consumes the store
//! and crypto seams exposed here.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod config;
pub mod error;
pub mod state;
pub mod db;

pub mod crypto {
    pub mod aes;
    pub mod session_key;
}

pub mod models {
    pub mod request;
    pub mod session;
}

pub mod repositories {
    pub mod memory;
    pub mod postgres;
    pub mod store;
}

pub mod services {
    pub mod lifecycle;
    pub mod query;
    pub mod registry;
}

pub mod validation {
    pub mod session;
}

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;

/// Initializes tracing with an env-filter taken from `RUST_LOG`
/// (defaulting to `info`). Call once from the embedding process.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
