use std::time::Duration;

use tokio::{task, time};

use relay_agent::{reconcile_request, summarize, DexScreener, FAILURE_MESSAGE};
use relay_util::{parse_fetch_command, FetchCommand, ParsingError};
use telegram_client::{ChatId, TelegramClient};

use crate::{error::Result, state::AppState, util::DEFAULT_RETRY_DELAY_MS};

use super::{deliver, send_reconcile};

const POLL_TIMEOUT_SECS: u32 = 30;

const USAGE: &str = "Send /fetch to get the projects mentioned in recent tweets.

Examples:
/fetch summary
/fetch 1 hr summary
/fetch 5 tweets 2 hours
/fetch 30m";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Help,
    Fetch(FetchCommand),
    Invalid(ParsingError),
}

/// `None` for messages that are not addressed to the bot.
fn parse_command(text: &str) -> Option<Command> {
    let name = text.split_whitespace().next()?.to_lowercase();
    let name = name.split('@').next().unwrap_or_default();
    match name {
        "/start" | "/help" => Some(Command::Help),
        "/fetch" => Some(match parse_fetch_command(text) {
            Ok(command) => Command::Fetch(command),
            Err(e) => Command::Invalid(e),
        }),
        _ => None,
    }
}

/// Set up before server started. Long-poll the bot's updates and answer its commands.
pub fn listen_bot(app_state: AppState, telegram: TelegramClient) {
    task::spawn(async move {
        let mut offset = None;
        loop {
            let updates = match telegram.get_updates(offset, POLL_TIMEOUT_SECS).await {
                Ok(updates) => updates,
                Err(e) => {
                    tracing::error!("Cannot poll bot updates: {}", e);
                    time::sleep(Duration::from_millis(DEFAULT_RETRY_DELAY_MS)).await;
                    continue;
                }
            };

            for update in updates {
                offset = Some(update.update_id + 1);
                let Some(message) = update.message else {
                    continue;
                };
                let Some(text) = message.text.as_deref() else {
                    continue;
                };
                let chat_id = ChatId::from(message.chat.id);
                if let Err(e) = handle_message(&app_state, &telegram, &chat_id, text).await {
                    tracing::error!("Bot command `{}` from {} failed: {}", text, chat_id, e);
                    if let Err(e) = telegram.send_message(&chat_id, FAILURE_MESSAGE, None).await {
                        tracing::error!("Cannot send failure message to {}: {}", chat_id, e);
                    }
                }
            }
        }
    });
}

async fn handle_message(app_state: &AppState, telegram: &TelegramClient, chat_id: &ChatId, text: &str) -> Result<()> {
    let Some(command) = parse_command(text) else {
        return Ok(());
    };

    match command {
        Command::Help => {
            telegram.send_message(chat_id, USAGE, None).await?;
        }
        Command::Invalid(e) => {
            tracing::info!("Invalid bot command `{}`: {}", text, e);
            telegram.send_message(chat_id, &format!("{}\n\n{}", e, USAGE), None).await?;
        }
        Command::Fetch(command) => {
            tracing::info!("Bot fetch from {}: {:?}", chat_id, command);
            let records = send_reconcile(app_state, reconcile_request(&command)).await?;
            let messages = summarize(&DexScreener, &records).await;
            deliver(telegram, chat_id, &messages).await?;
        }
    }
    Ok(())
}
