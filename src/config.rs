use std::env;
use anyhow::{Context, Result};
use zeroize::{Zeroize, Zeroizing};

/// Default size of the PostgreSQL connection pool.
const DEFAULT_POOL_SIZE: usize = 16;

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The maximum number of pooled PostgreSQL connections.
    pub pool_size: usize,
    /// The master secret for per-principal key derivation.
    pub master_key: Zeroizing<Vec<u8>>,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut master_key_hex = env::var("MASTER_KEY")
            .context("MASTER_KEY must be set (generate with: openssl rand -hex 32)")?;

        let master_key_bytes = hex::decode(&master_key_hex)
            .context("MASTER_KEY must be valid hexadecimal")?;

        master_key_hex.zeroize();

        if master_key_bytes.len() != 32 {
            anyhow::bail!("MASTER_KEY must be exactly 32 bytes (64 hex characters)");
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            pool_size: env::var("PG_POOL_SIZE")
                .unwrap_or_else(|_| DEFAULT_POOL_SIZE.to_string())
                .parse()
                .context("Invalid PG_POOL_SIZE")?,
            master_key: Zeroizing::new(master_key_bytes),
        })
    }
}
