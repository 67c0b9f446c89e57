use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use wishwatch::notify::{ChangeNotifier, LogNotifier, WebhookNotifier};
use wishwatch::pipeline::fetch_all;
use wishwatch::reconciler::Reconciler;
use wishwatch::scraper::PageScraper;
use wishwatch::store::SqliteStore;
use wishwatch::AppConfig;

/// One scrape-and-reconcile pass over the configured wishlist pages.
/// Scheduling is external: point an hourly timer (cron, systemd) at this
/// binary.
#[derive(Parser, Debug)]
#[command(name = "wishwatch", version, about)]
struct Cli {
    /// Extra wishlist URLs to scrape in addition to the configured ones.
    #[arg(long = "url", value_name = "URL")]
    urls: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wishwatch=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    let mut urls = config.watch.urls.clone();
    urls.extend(cli.urls);
    for url in &urls {
        url::Url::parse(url).map_err(|e| anyhow::anyhow!("invalid URL {}: {}", url, e))?;
    }
    if urls.is_empty() {
        info!("no wishlist URLs configured, nothing to do");
        return Ok(());
    }

    let store = SqliteStore::connect(&config.database.url, config.database.max_connections).await?;
    let notifier: Arc<dyn ChangeNotifier> = match &config.notifier.webhook_url {
        Some(webhook_url) => Arc::new(WebhookNotifier::new(
            webhook_url.clone(),
            &config.notifier,
        )),
        None => Arc::new(LogNotifier),
    };
    let scraper = PageScraper::new(&config.scraper)?;
    let reconciler = Reconciler::new(Arc::new(store), notifier);

    info!(urls = urls.len(), "starting scrape pass");
    let observations = fetch_all(
        &scraper,
        &urls,
        config.scraper.max_concurrent_fetches,
    )
    .await;

    let summary = reconciler.reconcile(&observations).await;
    info!(
        created = summary.entries_created,
        coalesced = summary.entries_coalesced,
        notified = summary.notifications_sent,
        "pass finished"
    );

    Ok(())
}
