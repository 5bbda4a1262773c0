use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use url::Url;

use crate::extractor::PlausibilityBounds;
use crate::models::TrackedProduct;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub scraper: ScraperConfig,
    pub telegram: TelegramConfig,
    pub tracker: TrackerConfig,
    /// Static product list; immutable for a run.
    pub products: Vec<TrackedProduct>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Per-attempt fetch timeout in seconds.
    pub request_timeout: u64,
    /// Storefront-specific sanity range, exclusive on both ends.
    pub min_plausible_price: Decimal,
    pub max_plausible_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Whether the first-ever observation of a product also gets a history
    /// row, for a complete time series.
    pub history_on_create: bool,
    /// Politeness pause between products, to stay under bot-detection radar.
    pub delay_between_products_ms: u64,
}

impl AppConfig {
    /// Reads and validates the layered configuration.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the layered configuration without validating it. Callers that
    /// want to announce a validation failure can still reach the Telegram
    /// credentials this way.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default"))
            // Add environment-specific config
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add local config (ignored by git)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix "PRICEWATCH_"
            .add_source(Environment::with_prefix("PRICEWATCH").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "Database max_connections must be greater than 0".into(),
            ));
        }

        if self.scraper.request_timeout == 0 {
            return Err(ConfigError::Message(
                "Scraper request_timeout must be greater than 0".into(),
            ));
        }

        if self.scraper.min_plausible_price >= self.scraper.max_plausible_price {
            return Err(ConfigError::Message(
                "min_plausible_price must be below max_plausible_price".into(),
            ));
        }

        if self.telegram.bot_token.is_empty() {
            return Err(ConfigError::Message("Telegram bot_token is required".into()));
        }

        if self.telegram.chat_id.is_empty() {
            return Err(ConfigError::Message("Telegram chat_id is required".into()));
        }

        if self.products.is_empty() {
            return Err(ConfigError::Message(
                "At least one product must be configured".into(),
            ));
        }

        for product in &self.products {
            if Url::parse(&product.url).is_err() {
                return Err(ConfigError::Message(format!(
                    "Invalid product URL for '{}'",
                    product.name
                )));
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.scraper.request_timeout)
    }

    pub fn plausibility_bounds(&self) -> PlausibilityBounds {
        PlausibilityBounds {
            min: self.scraper.min_plausible_price,
            max: self.scraper.max_plausible_price,
        }
    }
}
