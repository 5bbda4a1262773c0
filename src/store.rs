//! Persistence behind the change detector: one record per tracked URL plus
//! an append-only history table. Prices are stored as TEXT and round-trip
//! through `rust_decimal` (SQLite has no exact decimal type).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use tracing::info;

use crate::models::{NewPriceHistoryEntry, NewPriceRecord, PriceRecord};
use crate::utils::{AppError, Result};

/// Store operations consumed by the tracker. No transactions: each call is
/// independent, and one run has no concurrent writers.
#[async_trait]
pub trait PriceStore: Send + Sync {
    async fn find_by_url(&self, url: &str) -> Result<Option<PriceRecord>>;
    async fn insert(&self, record: NewPriceRecord) -> Result<PriceRecord>;
    async fn update_price(
        &self,
        id: i64,
        current_price: Decimal,
        lowest_price: Decimal,
        last_checked: DateTime<Utc>,
    ) -> Result<()>;
    async fn append_history(&self, entry: NewPriceHistoryEntry) -> Result<()>;
}

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        info!(%database_url, "store ready");
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                current_price TEXT NOT NULL,
                lowest_price TEXT NOT NULL,
                last_checked TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS price_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_id INTEGER NOT NULL REFERENCES products(id),
                price TEXT NOT NULL,
                observed_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn record_from_row(row: &SqliteRow) -> Result<PriceRecord> {
        Ok(PriceRecord {
            id: row.get("id"),
            url: row.get("url"),
            name: row.get("name"),
            current_price: parse_stored_price(row.get("current_price"))?,
            lowest_price: parse_stored_price(row.get("lowest_price"))?,
            last_checked: row.get("last_checked"),
        })
    }
}

fn parse_stored_price(raw: String) -> Result<Decimal> {
    Decimal::from_str(&raw).map_err(|_| AppError::Parse {
        message: format!("stored price is not a decimal: {raw}"),
    })
}

#[async_trait]
impl PriceStore for SqliteStore {
    async fn find_by_url(&self, url: &str) -> Result<Option<PriceRecord>> {
        let row = sqlx::query(
            r"
            SELECT id, url, name, current_price, lowest_price, last_checked
            FROM products WHERE url = ?
            ",
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::record_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, record: NewPriceRecord) -> Result<PriceRecord> {
        let result = sqlx::query(
            r"
            INSERT INTO products (url, name, current_price, lowest_price, last_checked)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(&record.url)
        .bind(&record.name)
        .bind(record.observed_price.to_string())
        .bind(record.observed_price.to_string())
        .bind(record.observed_at)
        .execute(&self.pool)
        .await?;

        Ok(PriceRecord {
            id: result.last_insert_rowid(),
            url: record.url,
            name: record.name,
            current_price: record.observed_price,
            lowest_price: record.observed_price,
            last_checked: record.observed_at,
        })
    }

    async fn update_price(
        &self,
        id: i64,
        current_price: Decimal,
        lowest_price: Decimal,
        last_checked: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r"
            UPDATE products
            SET current_price = ?, lowest_price = ?, last_checked = ?
            WHERE id = ?
            ",
        )
        .bind(current_price.to_string())
        .bind(lowest_price.to_string())
        .bind(last_checked)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn append_history(&self, entry: NewPriceHistoryEntry) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO price_history (product_id, price, observed_at)
            VALUES (?, ?, ?)
            ",
        )
        .bind(entry.product_id)
        .bind(entry.price.to_string())
        .bind(entry.observed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
