use serde::{Deserialize, Serialize};

use relay_agent::ProjectSummary;
use relay_core::TweetRecord;
use telegram_client::{ChatId, ParseMode};

/// Request for looking up the projects mentioned by tweets.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectsRequest {
    pub tweets: Vec<TweetRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportRequest {
    pub projects: Vec<ProjectSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub messages: Vec<String>,
}

/// Request for sending a message through the bot. Report messages are MarkdownV2, so that is the
/// default; an explicit `null` sends plain text.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub chat_id: ChatId,
    pub message: String,
    #[serde(default = "default_parse_mode")]
    pub parse_mode: Option<ParseMode>,
}

fn default_parse_mode() -> Option<ParseMode> {
    Some(ParseMode::MarkdownV2)
}
