use futures::stream::{self, StreamExt};
use tracing::warn;

use crate::models::Observation;
use crate::scraper::PageScraper;

/// Scrape every URL concurrently and merge the results into one unordered
/// batch.
///
/// At most `max_concurrent` fetches are in flight at once; the call returns
/// only after the last task finishes. A failing URL logs a warning and
/// contributes nothing — a scheduled run prefers partial results over an
/// aborted batch. No retry is attempted; the next scheduled pass is the
/// retry.
pub async fn fetch_all(
    scraper: &PageScraper,
    urls: &[String],
    max_concurrent: usize,
) -> Vec<Observation> {
    let results: Vec<(&str, crate::Result<Vec<Observation>>)> = stream::iter(urls)
        .map(|url| async move { (url.as_str(), scraper.scrape(url).await) })
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

    let mut observations = Vec::new();
    for (url, result) in results {
        match result {
            Ok(batch) => observations.extend(batch),
            Err(e) => warn!(url, error = %e, "page contributed no observations"),
        }
    }
    observations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScraperConfig;

    #[tokio::test]
    async fn test_empty_url_list_yields_empty_batch() {
        let scraper = PageScraper::new(&ScraperConfig {
            max_concurrent_fetches: 2,
            request_timeout: 5,
            user_agent: "wishwatch-test/1.0".to_string(),
        })
        .unwrap();

        let observations = fetch_all(&scraper, &[], 2).await;
        assert!(observations.is_empty());
    }
}
