use std::time::Duration;

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::config::ScraperConfig;
use crate::extractor::extract_row;
use crate::models::Observation;
use crate::utils::error::{AppError, Result};

/// Fetches one wishlist page and turns its data table into observations.
///
/// Read-only: the only side effect is the network GET. Malformed rows are
/// logged and skipped so one broken listing never drops the rest of the page.
pub struct PageScraper {
    client: Client,
}

impl PageScraper {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub async fn scrape(&self, url: &str) -> Result<Vec<Observation>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| AppError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let body = response.text().await.map_err(|source| AppError::Fetch {
            url: url.to_string(),
            source,
        })?;

        self.parse_document(url, &body)
    }

    /// Parse a fetched document body into observations.
    ///
    /// When the document carries several `<tbody>` elements the LAST one in
    /// document order wins. The source system scans the whole document and
    /// keeps overwriting its candidate, so on multi-table pages the final
    /// table is the data table; that behavior is kept on purpose.
    pub fn parse_document(&self, url: &str, body: &str) -> Result<Vec<Observation>> {
        let document = Html::parse_document(body);
        let tbody_selector = Selector::parse("tbody")
            .map_err(|e| AppError::Internal(format!("invalid selector: {:?}", e)))?;

        let tbody = document
            .select(&tbody_selector)
            .last()
            .ok_or_else(|| AppError::Parse {
                url: url.to_string(),
                message: "no table body in document".to_string(),
            })?;

        let mut observations = Vec::new();
        for row in tbody
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "tr")
        {
            match extract_row(row) {
                Ok(observation) => observations.push(observation),
                Err(e) => warn!(url, error = %e, "skipping row"),
            }
        }

        debug!(url, count = observations.len(), "scraped page");
        Ok(observations)
    }
}
