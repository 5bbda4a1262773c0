use serde::{Deserialize, Serialize};

pub mod price_history;
pub mod price_record;

// Re-exports for convenience
pub use price_history::*;
pub use price_record::*;

/// One entry of the static product list. Supplied by configuration,
/// never persisted by the tracker itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackedProduct {
    pub name: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracked_product_deserialization() {
        let product: TrackedProduct = serde_json::from_str(
            r#"{"name": "PlayStation 5", "url": "https://www.example.com/dp/B0ABC"}"#,
        )
        .unwrap();

        assert_eq!(product.name, "PlayStation 5");
        assert_eq!(product.url, "https://www.example.com/dp/B0ABC");
    }
}
