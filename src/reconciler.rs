use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::models::Observation;
use crate::notify::{ChangeNotifier, PriceChange};
use crate::store::RecordStore;
use crate::utils::error::Result;

/// Outcome tally for one reconciliation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub observations: usize,
    pub entries_created: usize,
    pub entries_coalesced: usize,
    pub notifications_sent: usize,
    pub failures: usize,
}

enum Outcome {
    Created { notified: bool },
    Coalesced,
}

/// Matches scraped observations against stored products and price history.
///
/// Repeated identical readings coalesce into the existing price entry; a new
/// price value appends a new entry and, past the product's first entry,
/// fires the notifier exactly once. Store and notifier handles are injected
/// so runs can be tested against doubles.
pub struct Reconciler {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn ChangeNotifier>,
    // The store offers no transactional isolation, so overlapping runs on
    // one engine serialize behind this guard instead of racing the
    // find-latest-then-insert sequence into duplicate entries.
    write_guard: Mutex<()>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn ChangeNotifier>) -> Self {
        Self {
            store,
            notifier,
            write_guard: Mutex::new(()),
        }
    }

    /// Reconcile a batch of observations sequentially.
    ///
    /// A store failure aborts only the observation it hit; the rest of the
    /// batch proceeds. Re-running an unchanged observation coalesces rather
    /// than duplicating, so a pass is safe to repeat.
    pub async fn reconcile(&self, observations: &[Observation]) -> ReconcileSummary {
        let _guard = self.write_guard.lock().await;

        let mut summary = ReconcileSummary {
            observations: observations.len(),
            ..ReconcileSummary::default()
        };

        for observation in observations {
            match self.reconcile_one(observation).await {
                Ok(Outcome::Created { notified }) => {
                    summary.entries_created += 1;
                    if notified {
                        summary.notifications_sent += 1;
                    }
                }
                Ok(Outcome::Coalesced) => summary.entries_coalesced += 1,
                Err(e) => {
                    summary.failures += 1;
                    warn!(product = %observation.name, error = %e, "reconciliation failed for observation");
                }
            }
        }

        info!(
            observations = summary.observations,
            created = summary.entries_created,
            coalesced = summary.entries_coalesced,
            notified = summary.notifications_sent,
            failures = summary.failures,
            "reconciliation pass complete"
        );
        summary
    }

    async fn reconcile_one(&self, observation: &Observation) -> Result<Outcome> {
        let (product, first_seen) = match self.store.find_product_by_name(&observation.name).await?
        {
            Some(product) => (product, false),
            None => {
                let product = self
                    .store
                    .create_product(&observation.name, observation.stock)
                    .await?;
                (product, true)
            }
        };

        if let Some(entry) = self
            .store
            .find_latest_price_entry(&product.id, observation.price)
            .await?
        {
            // Same price as the current episode: extend it.
            self.store.touch_price_entry(&entry.id).await?;
            if product.stock != observation.stock {
                self.store
                    .update_product_stock(&product.id, observation.stock)
                    .await?;
            }
            debug!(product = %product.name, price = %observation.price, "coalesced repeated price");
            return Ok(Outcome::Coalesced);
        }

        let entry = self
            .store
            .create_price_entry(&product.id, observation.price)
            .await?;

        // Notification starts with a product's second entry: the count is
        // taken after the insert and must exceed 1, which also keeps a
        // first-ever price silent. Matches the observed behavior of the
        // source system.
        let count = self.store.count_price_entries(&product.id).await?;
        let mut notified = false;
        if !first_seen && count > 1 {
            let change = PriceChange {
                name: product.name.clone(),
                stock: product.stock,
                price: entry.price,
                created_at: entry.created_at,
                updated_at: entry.updated_at,
            };
            // Delivery failure never rolls back the write that landed above.
            match self.notifier.notify(&change).await {
                Ok(()) => notified = true,
                Err(e) => {
                    warn!(product = %product.name, error = %e, "notification delivery failed")
                }
            }
        }

        debug!(product = %product.name, price = %entry.price, notified, "created price entry");
        Ok(Outcome::Created { notified })
    }
}
