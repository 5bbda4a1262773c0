use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Persisted state for one tracked URL.
///
/// Invariant maintained by the tracker: `lowest_price <= current_price`
/// after every update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceRecord {
    pub id: i64,
    pub url: String,
    pub name: String,
    pub current_price: Decimal,
    pub lowest_price: Decimal,
    pub last_checked: DateTime<Utc>,
}

/// Insert payload for a URL seen for the first time. The store assigns the id;
/// both price fields are seeded from the first observation.
#[derive(Debug, Clone)]
pub struct NewPriceRecord {
    pub url: String,
    pub name: String,
    pub observed_price: Decimal,
    pub observed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_record_invariant_holds_for_seeded_values() {
        let price = Decimal::from_str("499.99").unwrap();
        let record = PriceRecord {
            id: 7,
            url: "https://www.example.com/dp/B0ABC".to_string(),
            name: "PlayStation 5".to_string(),
            current_price: price,
            lowest_price: price,
            last_checked: Utc::now(),
        };

        assert!(record.lowest_price <= record.current_price);
    }
}
