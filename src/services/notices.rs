// src/services/notices.rs

//! Operator-facing status messages sent through the chat channel.

use crate::error::AppError;

/// Builds status notices prefixed with the bot's display name.
#[derive(Debug, Clone)]
pub struct Notices {
    bot_name: String,
}

impl Notices {
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self {
            bot_name: bot_name.into(),
        }
    }

    /// Sent once the loop is about to start.
    pub fn up(&self) -> String {
        format!("[{}] [✅ Up] Running", self.bot_name)
    }

    /// Sent when SIGINT/SIGTERM stops the process.
    pub fn shutdown(&self) -> String {
        format!("[{}] [🔴 Down] Shutting down by SIGINT/SIGTERM ..", self.bot_name)
    }

    /// Sent when every comic has been delivered and the cycle restarts.
    pub fn exhausted(&self) -> String {
        format!(
            "[{}] Finally, we have exhausted the comics. Let's start over!",
            self.bot_name
        )
    }

    /// Sent when a delivery fails for good.
    pub fn failure(&self, error: &AppError) -> String {
        format!("[{}] [🔴 Down] Error encountered: {}", self.bot_name, error)
    }

    /// Sent when startup validation rejects the configuration.
    pub fn invalid_config(&self, error: &AppError) -> String {
        let detail = match error {
            AppError::Config(detail) => detail.clone(),
            other => other.to_string(),
        };
        format!("[{}] [🔴 Error] {}", self.bot_name, detail)
    }
}

impl Default for Notices {
    fn default() -> Self {
        Self::new("xkcd Random Bot")
    }
}
