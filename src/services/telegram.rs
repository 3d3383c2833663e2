// src/services/telegram.rs

//! Telegram Bot API notifier.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::TelegramConfig;
use crate::utils::http::base_url;
use crate::utils::markdown::escape;

const PARSE_MODE: &str = "MarkdownV2";

/// Outbound chat channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send raw text. Implementations escape it for the transport.
    async fn send_text(&self, text: &str) -> Result<()>;

    /// Send an image with an already-formatted caption.
    async fn send_photo(&self, caption: &str, image_url: &str) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Debug, Serialize)]
struct SendPhoto<'a> {
    chat_id: &'a str,
    photo: &'a str,
    caption: &'a str,
    parse_mode: &'a str,
}

/// Sends messages to a single Telegram chat.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    api: Url,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(client: Client, config: &TelegramConfig) -> Result<Self> {
        Ok(Self {
            client,
            api: base_url(&config.api_url)?,
            token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
        })
    }

    async fn call<T: Serialize + ?Sized>(&self, method: &str, body: &T) -> Result<()> {
        // Leading "./" keeps the colon in the token from parsing as a scheme.
        let url = self.api.join(&format!("./bot{}/{}", self.token, method))?;

        // The URL carries the token, so errors are reported without it.
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::notification(format!("{method}: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::notification(format!(
                "{method} returned HTTP {status}: {}",
                detail.chars().take(300).collect::<String>()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_text(&self, text: &str) -> Result<()> {
        let escaped = escape(text);
        self.call(
            "sendMessage",
            &SendMessage {
                chat_id: &self.chat_id,
                text: &escaped,
                parse_mode: PARSE_MODE,
            },
        )
        .await
    }

    async fn send_photo(&self, caption: &str, image_url: &str) -> Result<()> {
        self.call(
            "sendPhoto",
            &SendPhoto {
                chat_id: &self.chat_id,
                photo: image_url,
                caption,
                parse_mode: PARSE_MODE,
            },
        )
        .await
    }
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("api", &self.api.as_str())
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}
