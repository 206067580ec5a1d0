//! Postgres-backed inventory store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `DuplicateKey` |
//! | Database (other) | Any other | `Unavailable` |
//! | PoolClosed / PoolTimedOut / Io | N/A | `Unavailable` |
//! | Row decode failure | N/A | `Corrupt` |
//!
//! The unique index on `sku` (see `crate::db::SCHEMA`) is the authoritative
//! uniqueness guard; the repository's pre-check only produces a nicer error
//! earlier.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use stockroom_core::ItemId;
use stockroom_inventory::{Category, CategoryStats, InventoryItem, InventorySummary, ListQuery};

use super::{InventoryStore, StoreError};

const ITEM_COLUMNS: &str =
    "id, sku, name, description, quantity, price, category, created_at, updated_at";

/// Postgres-backed store for inventory items.
///
/// `PgPool` is internally reference-counted, so clones share the same pool.
/// The pool re-establishes dropped connections on its own.
#[derive(Debug, Clone)]
pub struct PostgresInventoryStore {
    pool: PgPool,
}

impl PostgresInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl InventoryStore for PostgresInventoryStore {
    #[instrument(skip(self), err)]
    async fn list(&self, query: &ListQuery) -> Result<Vec<InventoryItem>, StoreError> {
        // Column and direction come from closed enums, never from raw input.
        let sql = format!(
            r#"
            SELECT {ITEM_COLUMNS}
            FROM inventory_items
            WHERE ($1::text IS NULL OR category = $1)
                AND ($2::bool = FALSE OR quantity < $3)
            ORDER BY {column} {direction} {nulls}, id {direction}
            "#,
            column = query.sort_by.column(),
            direction = query.order.as_sql(),
            nulls = query.order.nulls_sql(),
        );

        let rows = sqlx::query(&sql)
            .bind(query.category.as_deref())
            .bind(query.low_stock)
            .bind(stockroom_inventory::LOW_STOCK_THRESHOLD)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))?;

        rows.iter().map(decode_item).collect()
    }

    #[instrument(skip(self), fields(item_id = %id), err)]
    async fn get(&self, id: ItemId) -> Result<Option<InventoryItem>, StoreError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM inventory_items WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?;

        row.as_ref().map(decode_item).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_by_sku(
        &self,
        sku: &str,
        excluding: Option<ItemId>,
    ) -> Result<Option<InventoryItem>, StoreError> {
        let sql = format!(
            r#"
            SELECT {ITEM_COLUMNS}
            FROM inventory_items
            WHERE sku = $1 AND ($2::uuid IS NULL OR id <> $2)
            LIMIT 1
            "#
        );
        let row = sqlx::query(&sql)
            .bind(sku)
            .bind(excluding.map(|id| *id.as_uuid()))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_sku", e))?;

        row.as_ref().map(decode_item).transpose()
    }

    #[instrument(skip(self, item), fields(item_id = %item.id, sku = %item.sku), err)]
    async fn insert(&self, item: &InventoryItem) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO inventory_items (
                id, sku, name, description, quantity, price, category, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(&item.sku)
        .bind(&item.name)
        .bind(item.description.as_deref())
        .bind(item.quantity)
        .bind(item.price)
        .bind(item.category.as_str())
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        Ok(())
    }

    #[instrument(skip(self, item), fields(item_id = %item.id, sku = %item.sku), err)]
    async fn replace(&self, item: &InventoryItem) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE inventory_items
            SET sku = $2,
                name = $3,
                description = $4,
                quantity = $5,
                price = $6,
                category = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(&item.sku)
        .bind(&item.name)
        .bind(item.description.as_deref())
        .bind(item.quantity)
        .bind(item.price)
        .bind(item.category.as_str())
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("replace", e))?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self), fields(item_id = %id), err)]
    async fn delete(&self, id: ItemId) -> Result<Option<InventoryItem>, StoreError> {
        let sql = format!("DELETE FROM inventory_items WHERE id = $1 RETURNING {ITEM_COLUMNS}");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        row.as_ref().map(decode_item).transpose()
    }

    #[instrument(skip(self), err)]
    async fn summarize(&self) -> Result<InventorySummary, StoreError> {
        // Both aggregates read one snapshot, so the totals always agree with
        // the per-category counts.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("summarize_begin", e))?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("summarize_isolation", e))?;

        let totals = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_items,
                COUNT(*) FILTER (WHERE quantity < $1) AS low_stock_items
            FROM inventory_items
            "#,
        )
        .bind(stockroom_inventory::LOW_STOCK_THRESHOLD)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("summarize_totals", e))?;

        let total_items: i64 = totals.try_get("total_items").map_err(corrupt)?;
        let low_stock_items: i64 = totals.try_get("low_stock_items").map_err(corrupt)?;

        let groups = sqlx::query(
            r#"
            SELECT
                category,
                COUNT(*) AS count,
                COALESCE(SUM(quantity::double precision * price), 0) AS total_value
            FROM inventory_items
            GROUP BY category
            "#,
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("summarize_groups", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("summarize_commit", e))?;

        let mut stats = Vec::with_capacity(groups.len());
        for row in &groups {
            let category: String = row.try_get("category").map_err(corrupt)?;
            let count: i64 = row.try_get("count").map_err(corrupt)?;
            let total_value: f64 = row.try_get("total_value").map_err(corrupt)?;
            stats.push(CategoryStats {
                category: category
                    .parse::<Category>()
                    .map_err(|e| StoreError::Corrupt(e.to_string()))?,
                count: count.max(0) as u64,
                total_value,
            });
        }

        Ok(InventorySummary {
            total_items: total_items.max(0) as u64,
            low_stock_items: low_stock_items.max(0) as u64,
            category_stats: Vec::new(),
        }
        .with_category_stats(stats))
    }
}

fn corrupt(err: sqlx::Error) -> StoreError {
    StoreError::Corrupt(err.to_string())
}

fn decode_item(row: &sqlx::postgres::PgRow) -> Result<InventoryItem, StoreError> {
    ItemRow::from_row(row)
        .map_err(|e| StoreError::Corrupt(format!("failed to deserialize item row: {e}")))?
        .try_into()
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code() {
                Some(code) if code.as_ref() == "23505" => StoreError::DuplicateKey(msg),
                _ => StoreError::Unavailable(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool timed out in {operation}"))
        }
        _ => StoreError::Unavailable(format!("sqlx error in {operation}: {err}")),
    }
}

// SQLx row types

#[derive(Debug)]
struct ItemRow {
    id: uuid::Uuid,
    sku: String,
    name: String,
    description: Option<String>,
    quantity: i64,
    price: f64,
    category: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ItemRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(ItemRow {
            id: row.try_get("id")?,
            sku: row.try_get("sku")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            quantity: row.try_get("quantity")?,
            price: row.try_get("price")?,
            category: row.try_get("category")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl TryFrom<ItemRow> for InventoryItem {
    type Error = StoreError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .parse::<Category>()
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        Ok(InventoryItem {
            id: ItemId::from_uuid(row.id),
            sku: row.sku,
            name: row.name,
            description: row.description,
            quantity: row.quantity,
            price: row.price,
            category,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
