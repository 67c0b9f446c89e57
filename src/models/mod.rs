use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One scraped (name, stock, price) fact at a point in time. Ephemeral:
/// consumed by the reconciler, never persisted directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub name: String,
    /// Item count reported by the page; 0 when the page carried no stock
    /// phrase ("unknown").
    pub stock: i64,
    pub price: Decimal,
    pub observed_at: DateTime<Utc>,
}

impl Observation {
    pub fn new(name: String, stock: i64, price: Decimal) -> Self {
        Self {
            name,
            stock,
            price,
            observed_at: Utc::now(),
        }
    }
}

/// A tracked wishlist item. One row per distinct name; `stock` mirrors the
/// most recent observation in place and carries no history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One price episode for a product. Consecutive identical readings coalesce
/// into the same entry (its `updated_at` advances); a different price opens
/// a new entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceEntry {
    pub id: String,
    pub product_id: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Helper function to generate UUIDs in the format expected by the database
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}
