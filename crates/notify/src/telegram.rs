use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tracing::debug;

use common::{Error, Notifier, Result};

/// Telegram delivery channel. The destination string is a chat id.
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            bot: Bot::new(token.into()),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, destination: &str, message: &str) -> Result<()> {
        let chat_id: i64 = destination.parse().map_err(|_| {
            Error::Notify(format!("destination '{destination}' is not a numeric chat id"))
        })?;

        debug!(chat_id, "Sending Telegram message");
        self.bot
            .send_message(ChatId(chat_id), message)
            .await
            .map_err(|e| Error::Notify(e.to_string()))?;
        Ok(())
    }
}
