//! Page fetching with an ordered chain of request header profiles.
//!
//! Different header profiles can elicit different server responses
//! (bot-detection variance), so a failed or fruitless fetch with one
//! profile advances to the next instead of failing the product. This is
//! best-effort resilience, not guaranteed correctness.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, warn};

use crate::extractor::PriceExtractor;
use crate::utils::Result;

/// One way of presenting the request to the remote server.
#[derive(Debug, Clone)]
pub struct HeaderProfile {
    pub name: &'static str,
    pub user_agent: &'static str,
    pub accept_language: &'static str,
    pub accept: &'static str,
}

impl HeaderProfile {
    /// Built-in profiles, tried in order.
    pub fn defaults() -> Vec<HeaderProfile> {
        vec![
            HeaderProfile {
                name: "chrome-windows",
                user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                             (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
                accept_language: "de-DE,de;q=0.9,en;q=0.8",
                accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            },
            HeaderProfile {
                name: "firefox-linux",
                user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 \
                             Firefox/121.0",
                accept_language: "de,en-US;q=0.7,en;q=0.3",
                accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            },
            HeaderProfile {
                name: "safari-mac",
                user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                             AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 \
                             Safari/605.1.15",
                accept_language: "de-DE,de;q=0.9",
                accept: "text/html,application/xhtml+xml",
            },
        ]
    }
}

#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

/// Single HTTP GET for a URL with one header profile. Seam for tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn get(&self, url: &str, profile: &HeaderProfile) -> Result<FetchedPage>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn get(&self, url: &str, profile: &HeaderProfile) -> Result<FetchedPage> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, profile.user_agent)
            .header(ACCEPT_LANGUAGE, profile.accept_language)
            .header(ACCEPT, profile.accept)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(FetchedPage { status, body })
    }
}

/// Retries the extractor across header profiles and returns the first
/// plausible price.
pub struct PriceProbe {
    fetcher: Box<dyn PageFetcher>,
    extractor: PriceExtractor,
    profiles: Vec<HeaderProfile>,
}

impl PriceProbe {
    pub fn new(fetcher: Box<dyn PageFetcher>, extractor: PriceExtractor) -> Self {
        Self {
            fetcher,
            extractor,
            profiles: HeaderProfile::defaults(),
        }
    }

    pub fn with_profiles(mut self, profiles: Vec<HeaderProfile>) -> Self {
        self.profiles = profiles;
        self
    }

    /// All profiles exhausted without a plausible price means `None`; a
    /// transport failure on one profile is recovered by trying the next.
    pub async fn fetch_price(&self, url: &str) -> Option<Decimal> {
        for profile in &self.profiles {
            let page = match self.fetcher.get(url, profile).await {
                Ok(page) => page,
                Err(err) => {
                    debug!(profile = profile.name, %url, error = %err, "fetch failed");
                    continue;
                }
            };

            if page.status != 200 {
                debug!(
                    profile = profile.name,
                    %url,
                    status = page.status,
                    "non-200 response"
                );
                continue;
            }

            if let Some(price) = self.extractor.extract(&page.body) {
                debug!(profile = profile.name, %url, %price, "price extracted");
                return Some(price);
            }
        }

        warn!(%url, "no plausible price with any header profile");
        None
    }
}
