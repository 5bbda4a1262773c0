use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Append-only observation log, one row per successful extraction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceHistoryEntry {
    pub id: i64,
    pub product_id: i64,
    pub price: Decimal,
    pub observed_at: DateTime<Utc>,
}

/// Insert payload for a history row; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewPriceHistoryEntry {
    pub product_id: i64,
    pub price: Decimal,
    pub observed_at: DateTime<Utc>,
}

impl NewPriceHistoryEntry {
    pub fn now(product_id: i64, price: Decimal) -> Self {
        Self {
            product_id,
            price,
            observed_at: Utc::now(),
        }
    }
}
