use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use pricewatch::config::AppConfig;
use pricewatch::extractor::PriceExtractor;
use pricewatch::fetch::{HttpFetcher, PriceProbe};
use pricewatch::messages;
use pricewatch::notifier::{Notifier, TelegramNotifier};
use pricewatch::store::SqliteStore;
use pricewatch::tracker::PriceTracker;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pricewatch=info")),
        )
        .init();

    info!("Starting price check...");

    // Only a failure to even read the configuration is log-only; once the
    // Telegram section is deserialized, every fault gets a best-effort alert.
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "configuration could not be read");
            std::process::exit(1);
        }
    };

    let notifier = Arc::new(TelegramNotifier::new(&config.telegram));

    if let Err(err) = config.validate() {
        error!(error = %err, "configuration is invalid");
        report_run_fault(notifier.as_ref(), &err.to_string()).await;
        std::process::exit(1);
    }

    if let Err(err) = run(&config, notifier.clone()).await {
        error!(error = %err, "critical failure");
        report_run_fault(notifier.as_ref(), &err.to_string()).await;
        std::process::exit(1);
    }
}

async fn report_run_fault(notifier: &dyn Notifier, error: &str) -> bool {
    notifier.send(&messages::critical_failure(error), false).await
}

async fn run(config: &AppConfig, notifier: Arc<TelegramNotifier>) -> Result<()> {
    let store = SqliteStore::connect(&config.database.url, config.database.max_connections).await?;

    let fetcher = HttpFetcher::new(config.request_timeout())?;
    let extractor = PriceExtractor::new(config.plausibility_bounds());
    let probe = PriceProbe::new(Box::new(fetcher), extractor);

    let tracker = PriceTracker::new(probe, Arc::new(store), notifier, config.tracker.clone());
    let summary = tracker.run(&config.products).await;

    info!(
        checked = summary.checked,
        new = summary.new_products,
        drops = summary.price_drops,
        errors = summary.errors,
        "price check finished"
    );

    Ok(())
}
