//! Outbound notifications. Delivery failures are logged and swallowed: a
//! failed alert must never abort price tracking.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::TelegramConfig;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Sends a pre-rendered HTML message to the single configured destination.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Returns whether delivery succeeded. Never errors.
    async fn send(&self, text: &str, allow_link_preview: bool) -> bool;
}

pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            client: Client::new(),
            api_base: TELEGRAM_API_BASE.to_string(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
        }
    }

    /// Points the notifier at a different API host. Used by tests.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str, allow_link_preview: bool) -> bool {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let payload = json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": !allow_link_preview,
        });

        match self.client.post(&url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("telegram message delivered");
                true
            }
            Ok(response) => {
                warn!(status = %response.status(), "telegram rejected the message");
                false
            }
            Err(err) => {
                warn!(error = %err, "telegram delivery failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> TelegramConfig {
        TelegramConfig {
            bot_token: "123:abc".to_string(),
            chat_id: "42".to_string(),
        }
    }

    #[tokio::test]
    async fn send_posts_html_message_to_the_bot_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_partial_json(json!({
                "chat_id": "42",
                "parse_mode": "HTML",
                "disable_web_page_preview": true,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = TelegramNotifier::new(&test_config()).with_api_base(server.uri());
        assert!(notifier.send("<b>hello</b>", false).await);
    }

    #[tokio::test]
    async fn delivery_failure_is_reported_but_not_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let notifier = TelegramNotifier::new(&test_config()).with_api_base(server.uri());
        assert!(!notifier.send("hello", false).await);
    }

    #[tokio::test]
    async fn link_preview_flag_is_passed_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"disable_web_page_preview": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = TelegramNotifier::new(&test_config()).with_api_base(server.uri());
        assert!(notifier.send("with preview", true).await);
    }
}
