use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::models::{PriceEntry, Product};
use crate::utils::error::Result;

pub mod sqlite;

pub use sqlite::SqliteStore;

/// The persistence surface the reconciler works against.
///
/// Implementations provide keyed lookups and blocking saves; they are not
/// expected to provide transactional isolation, which is why the reconciler
/// serializes its own writes.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_product_by_name(&self, name: &str) -> Result<Option<Product>>;

    async fn create_product(&self, name: &str, stock: i64) -> Result<Product>;

    async fn update_product_stock(&self, id: &str, stock: i64) -> Result<()>;

    /// The single most recent entry for this product carrying exactly this
    /// price, ties broken by `updated_at` descending. Older identical-price
    /// entries are never considered; history is append-only.
    async fn find_latest_price_entry(
        &self,
        product_id: &str,
        price: Decimal,
    ) -> Result<Option<PriceEntry>>;

    async fn create_price_entry(&self, product_id: &str, price: Decimal) -> Result<PriceEntry>;

    /// Advance an entry's `updated_at` to now (coalescing a repeated reading).
    async fn touch_price_entry(&self, id: &str) -> Result<()>;

    async fn count_price_entries(&self, product_id: &str) -> Result<i64>;
}
