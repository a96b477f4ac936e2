use async_trait::async_trait;

use crate::Result;

/// Abstraction over the notification channel.
///
/// Best effort: no delivery confirmation, no retry contract. The
/// dispatcher catches and logs failures; they never abort a run.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `message` to `destination` (channel-specific identifier,
    /// e.g. a Telegram chat id).
    async fn send(&self, destination: &str, message: &str) -> Result<()>;
}
