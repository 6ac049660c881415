mod error;
mod result;

use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;

pub use crate::error::Error;
use crate::error::Result;
pub use crate::result::*;

const BASE_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    base_url: Url,
}

impl TelegramClient {
    pub fn new(bot_token: &str) -> Result<TelegramClient> {
        if bot_token.is_empty() || bot_token.contains('/') {
            return Err(Error::InvalidToken);
        }
        let base_url = Url::parse(&format!("{}/bot{}/", BASE_URL, bot_token))?;
        let client = Client::builder().build()?;
        Ok(TelegramClient { client, base_url })
    }

    pub async fn send_message(&self, chat_id: &ChatId, text: &str, parse_mode: Option<ParseMode>) -> Result<Message> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
            "disable_web_page_preview": true,
        });
        if let Some(parse_mode) = parse_mode {
            body["parse_mode"] = serde_json::to_value(parse_mode)?;
        }
        self.call("sendMessage", &body).await
    }

    /// Long-poll for updates after `offset`, waiting up to `timeout` seconds.
    pub async fn get_updates(&self, offset: Option<i64>, timeout: u32) -> Result<Vec<Update>> {
        let body = json!({
            "offset": offset,
            "timeout": timeout,
            "allowed_updates": ["message"],
        });
        self.call("getUpdates", &body).await
    }
}

impl TelegramClient {
    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.base_url.join(method)?;
        let response = self.client.post(url).json(body).send().await?;

        // Failures come with a JSON envelope and a non-success status, so the envelope is read first
        let status_error = response.error_for_status_ref().err();
        let content = response.text().await?;
        log(method, &content).await?;
        match serde_json::from_str::<ApiResponse<R>>(&content) {
            Ok(response) => response.into_result(),
            Err(e) => match status_error {
                Some(status_error) => Err(status_error.into()),
                None => Err(e.into()),
            },
        }
    }
}

async fn log(name: &str, content: &str) -> Result<()> {
    use std::path::PathBuf;
    use tokio::{fs::File, io::AsyncWriteExt};

    if let Ok(dir) = std::env::var("CLIENT_LOG_DIR") {
        let time = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let filepath = PathBuf::from(dir).join(format!("telegram_{}_{}.json", name, time));
        let mut file = File::create(filepath).await?;
        file.write_all(content.as_bytes()).await?;
    }
    Ok(())
}
