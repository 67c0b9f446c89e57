use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::error::Result;

pub mod webhook;

pub use webhook::{LogNotifier, WebhookNotifier};

/// The fully resolved product+price fact handed to the notifier when a
/// genuine price change lands: the product's name and current stock plus the
/// new price entry's value and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceChange {
    pub name: String,
    pub stock: i64,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Delivers a human-visible alert for one price change.
///
/// Fire-and-forget from the reconciler's perspective: delivery failure is
/// logged and never rolls back the record-store write that preceded it.
#[async_trait]
pub trait ChangeNotifier: Send + Sync {
    async fn notify(&self, change: &PriceChange) -> Result<()>;
}
