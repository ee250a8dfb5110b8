use crate::config::Config;
use crate::crypto::session_key::KeyEncryption;
use crate::error::Result;
use crate::repositories::postgres::PgSessionStore;

/// The application's state.
///
/// Wired once at process start and cloned into whatever surface embeds the
/// subsystem; every component receives its dependencies from here instead
/// of reaching for globals.
#[derive(Clone)]
pub struct AppState {
    /// The production session store backed by the connection pool.
    pub store: PgSessionStore,
    /// The per-principal key-encryption service.
    pub keys: KeyEncryption,
    /// The application's configuration.
    pub config: Config,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub fn new(config: &Config) -> Result<Self> {
        let db = crate::db::create_pool(&config.database_url, config.pool_size)?;
        tracing::info!("✅ PostgreSQL Pool initialized with deadpool-postgres");

        let keys = KeyEncryption::new(config.master_key.as_ref())?;
        tracing::info!("✅ Key encryption initialized (per-principal derivation)");

        let store = PgSessionStore::new(db);
        tracing::info!("✅ Session store initialized");

        Ok(AppState {
            store,
            keys,
            config: config.clone(),
        })
    }
}
