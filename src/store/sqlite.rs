use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use crate::models::{generate_id, PriceEntry, Product};
use crate::store::RecordStore;
use crate::utils::error::{AppError, Result};

/// SQLite-backed [`RecordStore`].
///
/// Prices are persisted as normalized decimal text so that the
/// latest-matching-price lookup is an exact equality, never a float
/// comparison.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .connect(url)
            .await?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL UNIQUE,
                stock       INTEGER NOT NULL,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS price_entries (
                id          TEXT PRIMARY KEY,
                product_id  TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
                price       TEXT NOT NULL,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_price_entries_product_price
             ON price_entries (product_id, price)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn encode_price(price: Decimal) -> String {
        // normalize() drops trailing zeros so 1200, 1200.0 and 1200.00
        // store and match as the same value.
        price.normalize().to_string()
    }

    fn decode_entry(row: SqliteRow) -> Result<PriceEntry> {
        let price_text: String = row.try_get("price")?;
        let price = price_text.parse::<Decimal>().map_err(|e| {
            AppError::Internal(format!("corrupt price value {:?}: {}", price_text, e))
        })?;

        Ok(PriceEntry {
            id: row.try_get("id")?,
            product_id: row.try_get("product_id")?,
            price,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn find_product_by_name(&self, name: &str) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, stock, created_at, updated_at FROM products WHERE name = ?1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn create_product(&self, name: &str, stock: i64) -> Result<Product> {
        let now = Utc::now();
        let product = Product {
            id: generate_id(),
            name: name.to_string(),
            stock,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO products (id, name, stock, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    async fn update_product_stock(&self, id: &str, stock: i64) -> Result<()> {
        sqlx::query("UPDATE products SET stock = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(stock)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_latest_price_entry(
        &self,
        product_id: &str,
        price: Decimal,
    ) -> Result<Option<PriceEntry>> {
        let row = sqlx::query(
            "SELECT id, product_id, price, created_at, updated_at
             FROM price_entries
             WHERE product_id = ?1 AND price = ?2
             ORDER BY updated_at DESC
             LIMIT 1",
        )
        .bind(product_id)
        .bind(Self::encode_price(price))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::decode_entry).transpose()
    }

    async fn create_price_entry(&self, product_id: &str, price: Decimal) -> Result<PriceEntry> {
        let now = Utc::now();
        let entry = PriceEntry {
            id: generate_id(),
            product_id: product_id.to_string(),
            price,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO price_entries (id, product_id, price, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&entry.id)
        .bind(&entry.product_id)
        .bind(Self::encode_price(entry.price))
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn touch_price_entry(&self, id: &str) -> Result<()> {
        sqlx::query("UPDATE price_entries SET updated_at = ?1 WHERE id = ?2")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn count_price_entries(&self, product_id: &str) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM price_entries WHERE product_id = ?1")
                .bind(product_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
