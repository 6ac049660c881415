mod bot;
mod reconcile;
mod schedule;

pub use bot::*;
pub use reconcile::*;
pub use schedule::*;

use telegram_client::{ChatId, ParseMode, TelegramClient};

use crate::error::Result;

/// Send report messages in order, stopping at the first failure.
pub async fn deliver(telegram: &TelegramClient, chat_id: &ChatId, messages: &[String]) -> Result<()> {
    for message in messages {
        telegram.send_message(chat_id, message, Some(ParseMode::MarkdownV2)).await?;
    }
    tracing::info!("Delivered {} messages to {}", messages.len(), chat_id);
    Ok(())
}
