use std::sync::Arc;

use sqlx::PgPool;

use stockroom_infra::{
    AppConfig, AppEnvironment, InMemoryInventoryStore, InventoryRepository, InventoryStore,
    PostgresInventoryStore, db,
};

/// Repository over whichever store the process was configured with.
pub type Repository = InventoryRepository<Arc<dyn InventoryStore>>;

/// Shared, request-independent application state.
pub struct AppServices {
    repository: Repository,
    environment: AppEnvironment,
    pool: Option<PgPool>,
}

impl AppServices {
    /// In-memory store (dev/test).
    pub fn in_memory(environment: AppEnvironment) -> Self {
        let store: Arc<dyn InventoryStore> = Arc::new(InMemoryInventoryStore::new());
        Self {
            repository: InventoryRepository::new(store),
            environment,
            pool: None,
        }
    }

    /// Postgres store over an already-connected pool.
    pub fn persistent(pool: PgPool, environment: AppEnvironment) -> Self {
        let store: Arc<dyn InventoryStore> = Arc::new(PostgresInventoryStore::new(pool.clone()));
        Self {
            repository: InventoryRepository::new(store),
            environment,
            pool: Some(pool),
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Close the database pool, if any. Called once at shutdown.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
            tracing::info!("database pool closed");
        }
    }
}

/// Select and initialize the store from configuration.
///
/// With `DATABASE_URL` set this blocks until the database accepts a
/// connection (retrying at a fixed delay), then ensures the schema.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match &config.database_url {
        Some(url) => {
            let pool = db::connect_with_retry(url, db::RECONNECT_DELAY).await;
            db::ensure_schema(&pool).await?;
            Ok(AppServices::persistent(pool, config.environment))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (data is lost on exit)");
            Ok(AppServices::in_memory(config.environment))
        }
    }
}
