use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info};

use crate::config::NotifierConfig;
use crate::notify::{ChangeNotifier, PriceChange};
use crate::utils::error::{AppError, Result};

/// Posts price changes to a webhook endpoint as a JSON payload.
pub struct WebhookNotifier {
    client: Client,
    webhook_url: String,
    username: String,
}

impl WebhookNotifier {
    pub fn new(webhook_url: String, config: &NotifierConfig) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
            username: config.username.clone(),
        }
    }

    fn create_payload(&self, change: &PriceChange) -> serde_json::Value {
        json!({
            "username": self.username,
            "content": format!("{} is now {} ({} in stock)", change.name, change.price, change.stock),
            "data": change,
        })
    }
}

#[async_trait]
impl ChangeNotifier for WebhookNotifier {
    async fn notify(&self, change: &PriceChange) -> Result<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&self.create_payload(change))
            .send()
            .await
            .map_err(|e| AppError::Notify(format!("webhook request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Notify(format!(
                "webhook returned status {}",
                status
            )));
        }

        debug!(product = %change.name, "pushed notification");
        Ok(())
    }
}

/// Fallback notifier used when no webhook is configured: changes land in the
/// log instead of being delivered.
pub struct LogNotifier;

#[async_trait]
impl ChangeNotifier for LogNotifier {
    async fn notify(&self, change: &PriceChange) -> Result<()> {
        info!(
            product = %change.name,
            price = %change.price,
            stock = change.stock,
            "price change (no webhook configured)"
        );
        Ok(())
    }
}
