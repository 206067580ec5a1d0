//! Database bootstrap: pool creation with fixed-delay retry and schema setup.
//!
//! The pool is created once at process start and closed once at shutdown;
//! request handling never opens connections itself.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Delay between connection attempts at startup.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

const MAX_CONNECTIONS: u32 = 10;

/// Idempotent schema statements, executed in order.
pub const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS inventory_items (
        id UUID PRIMARY KEY,
        sku TEXT NOT NULL,
        name TEXT NOT NULL,
        description TEXT,
        quantity BIGINT NOT NULL DEFAULT 0 CHECK (quantity >= 0),
        price DOUBLE PRECISION NOT NULL CHECK (price >= 0),
        category TEXT NOT NULL DEFAULT 'Other'
            CHECK (category IN ('Electronics', 'Clothing', 'Food', 'Books', 'Tools', 'Other')),
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        CHECK (updated_at >= created_at)
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS inventory_items_sku_key ON inventory_items (sku)",
    "CREATE INDEX IF NOT EXISTS inventory_items_category_quantity_idx ON inventory_items (category, quantity)",
    "CREATE INDEX IF NOT EXISTS inventory_items_created_at_idx ON inventory_items (created_at)",
];

/// Connect to Postgres, retrying every `delay` until the first connection
/// succeeds. Each failed attempt is logged.
pub async fn connect_with_retry(database_url: &str, delay: Duration) -> PgPool {
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await
        {
            Ok(pool) => {
                tracing::info!(attempt, "connected to database");
                return pool;
            }
            Err(e) => {
                tracing::warn!(
                    attempt,
                    error = %e,
                    retry_in_secs = delay.as_secs(),
                    "database connection failed; retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Create the table and indexes if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!(statements = SCHEMA.len(), "database schema ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_declares_the_unique_sku_index() {
        assert!(
            SCHEMA
                .iter()
                .any(|s| s.contains("UNIQUE INDEX") && s.contains("(sku)"))
        );
        assert!(SCHEMA.iter().any(|s| s.contains("(category, quantity)")));
    }
}
