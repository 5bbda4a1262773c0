//! Orchestrates the per-product pipeline: fetch -> extract -> compare
//! against stored state -> persist -> notify. Products are processed
//! strictly sequentially; every per-product failure is isolated to that
//! product and the run continues.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::TrackerConfig;
use crate::fetch::PriceProbe;
use crate::messages;
use crate::models::{NewPriceHistoryEntry, NewPriceRecord, PriceRecord, TrackedProduct};
use crate::notifier::Notifier;
use crate::store::PriceStore;
use crate::utils::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingOutcome {
    /// All strategies and profiles exhausted without a plausible price.
    NoPriceFound,
    NewProductTracked { price: Decimal },
    PriceUnchanged,
    PriceIncreased,
    PriceDecreased {
        discount: Decimal,
        discount_percent: f64,
        new_low: bool,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub checked: u32,
    pub new_products: u32,
    pub price_drops: u32,
    pub errors: u32,
}

impl RunSummary {
    fn record(&mut self, outcome: &ProcessingOutcome) {
        match outcome {
            ProcessingOutcome::NoPriceFound => self.errors += 1,
            ProcessingOutcome::NewProductTracked { .. } => {
                self.checked += 1;
                self.new_products += 1;
            }
            ProcessingOutcome::PriceUnchanged | ProcessingOutcome::PriceIncreased => {
                self.checked += 1;
            }
            ProcessingOutcome::PriceDecreased { .. } => {
                self.checked += 1;
                self.price_drops += 1;
            }
        }
    }

    fn worth_announcing(&self) -> bool {
        self.price_drops > 0 || self.new_products > 0
    }
}

/// Compares an observed price against the stored record. Pure; all store
/// and notification effects happen in the tracker.
fn classify(observed: Decimal, record: &PriceRecord) -> ProcessingOutcome {
    if observed < record.current_price {
        let discount = record.current_price - observed;
        let discount_percent = (discount / record.current_price * Decimal::from(100))
            .to_f64()
            .unwrap_or(0.0);
        ProcessingOutcome::PriceDecreased {
            discount,
            discount_percent,
            new_low: observed < record.lowest_price,
        }
    } else if observed > record.current_price {
        ProcessingOutcome::PriceIncreased
    } else {
        ProcessingOutcome::PriceUnchanged
    }
}

pub struct PriceTracker {
    probe: PriceProbe,
    store: Arc<dyn PriceStore>,
    notifier: Arc<dyn Notifier>,
    settings: TrackerConfig,
}

impl PriceTracker {
    pub fn new(
        probe: PriceProbe,
        store: Arc<dyn PriceStore>,
        notifier: Arc<dyn Notifier>,
        settings: TrackerConfig,
    ) -> Self {
        Self {
            probe,
            store,
            notifier,
            settings,
        }
    }

    /// Runs the full pipeline for one product. Store errors propagate to
    /// the caller; extraction failure is a counted outcome, not an error.
    pub async fn process_product(&self, product: &TrackedProduct) -> Result<ProcessingOutcome> {
        let Some(observed) = self.probe.fetch_price(&product.url).await else {
            warn!(product = %product.name, "price could not be determined");
            self.notifier
                .send(&messages::price_not_found(product), false)
                .await;
            return Ok(ProcessingOutcome::NoPriceFound);
        };

        info!(product = %product.name, price = %observed, "current price");

        let Some(record) = self.store.find_by_url(&product.url).await? else {
            return self.track_new_product(product, observed).await;
        };

        let outcome = classify(observed, &record);
        match &outcome {
            ProcessingOutcome::PriceDecreased {
                discount,
                discount_percent,
                new_low,
            } => {
                info!(
                    product = %product.name,
                    old = %record.current_price,
                    new = %observed,
                    percent = discount_percent,
                    "price drop"
                );
                self.notifier
                    .send(
                        &messages::price_drop(
                            product,
                            record.current_price,
                            observed,
                            *discount,
                            *discount_percent,
                        ),
                        true,
                    )
                    .await;
                if *new_low {
                    info!(product = %product.name, "new all-time low");
                    self.notifier
                        .send(&messages::new_all_time_low(product, observed), true)
                        .await;
                }
            }
            ProcessingOutcome::PriceIncreased => {
                info!(product = %product.name, old = %record.current_price, new = %observed, "price went up");
            }
            ProcessingOutcome::PriceUnchanged => {
                info!(product = %product.name, "price unchanged");
            }
            _ => {}
        }

        let lowest = observed.min(record.lowest_price);
        self.store
            .update_price(record.id, observed, lowest, chrono::Utc::now())
            .await?;
        self.store
            .append_history(NewPriceHistoryEntry::now(record.id, observed))
            .await?;

        Ok(outcome)
    }

    async fn track_new_product(
        &self,
        product: &TrackedProduct,
        observed: Decimal,
    ) -> Result<ProcessingOutcome> {
        info!(product = %product.name, price = %observed, "now tracking");

        let record = self
            .store
            .insert(NewPriceRecord {
                url: product.url.clone(),
                name: product.name.clone(),
                observed_price: observed,
                observed_at: chrono::Utc::now(),
            })
            .await?;

        if self.settings.history_on_create {
            self.store
                .append_history(NewPriceHistoryEntry::now(record.id, observed))
                .await?;
        }

        self.notifier
            .send(&messages::new_product(product, observed), false)
            .await;

        Ok(ProcessingOutcome::NewProductTracked { price: observed })
    }

    /// Processes the whole product list sequentially, pausing between
    /// products, and sends one aggregate summary when anything noteworthy
    /// happened.
    pub async fn run(&self, products: &[TrackedProduct]) -> RunSummary {
        let mut summary = RunSummary::default();

        for (index, product) in products.iter().enumerate() {
            if index > 0 && self.settings.delay_between_products_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.settings.delay_between_products_ms))
                    .await;
            }

            match self.process_product(product).await {
                Ok(outcome) => summary.record(&outcome),
                Err(err) => {
                    error!(product = %product.name, error = %err, "product check failed");
                    summary.errors += 1;
                }
            }
        }

        info!(
            checked = summary.checked,
            new = summary.new_products,
            drops = summary.price_drops,
            errors = summary.errors,
            "run complete"
        );

        if summary.worth_announcing() {
            self.notifier
                .send(&messages::run_summary(&summary), false)
                .await;
        }

        summary
    }
}
