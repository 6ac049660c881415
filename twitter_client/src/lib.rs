mod consts;
mod error;
mod response;
mod result;
#[cfg(test)]
mod test;
mod util;

use reqwest::{header, Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use consts::*;
use response::{ProblemResponse, TimelineResponse, UserResponse};
pub use result::*;
pub use util::{format_end_time, format_start_time};

pub use crate::error::Error;
use crate::error::Result;

use relay_util::build_params;

/// Client of the Twitter API v2 with app-only bearer authentication.
#[derive(Debug, Clone)]
pub struct TwitterClient {
    client: reqwest::Client,
}

impl TwitterClient {
    pub fn new(bearer_token: &str) -> Result<TwitterClient> {
        let mut headers = header::HeaderMap::new();
        let authorization =
            header::HeaderValue::from_str(&format!("Bearer {}", bearer_token)).map_err(|_| Error::InvalidToken)?;
        headers.insert(header::AUTHORIZATION, authorization);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;
        Ok(TwitterClient { client })
    }

    pub async fn user_by_username(&self, username: &str) -> Result<User> {
        let response: UserResponse = self
            .get(&format!("/users/by/username/{}", username), &[], "user_by_username")
            .await?;
        response.try_into()
    }

    /// One page of a user's tweets, newest first.
    pub async fn user_tweets(&self, user_id: u64, params: &TimelineParams) -> Result<Timeline> {
        let max_results = params
            .max_results
            .unwrap_or(TIMELINE_MAX_RESULTS)
            .clamp(TIMELINE_MIN_RESULTS, TIMELINE_MAX_RESULTS);
        let start_time = params.start_time.map(format_start_time);
        let end_time = params.end_time.map(format_end_time);
        let query = build_params! {
            required max_results,
            optional start_time,
            optional end_time,
            optional since_id => params.since_id,
            optional until_id => params.until_id,
            optional pagination_token => params.pagination_token,
            joined tweet.fields => ["created_at", "author_id"],
        };

        let response: TimelineResponse = self
            .get(&format!("/users/{}/tweets", user_id), &query, "user_tweets")
            .await?;
        response.try_into()
    }
}

impl TwitterClient {
    async fn get<R>(&self, path: &str, params: &[(String, String)], name: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = Url::parse_with_params(&format!("{}{}", API, path), params)?;
        let response: Response = self.client.get(url).send().await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let reset = response
                .headers()
                .get(RATE_LIMIT_RESET_HEADER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<i64>().ok());
            return Err(Error::RateLimit(reset));
        }

        let status_error = response.error_for_status_ref().err();
        let content = response.text().await?;
        log(name, &content).await?;
        if let Some(status_error) = status_error {
            return match serde_json::from_str::<ProblemResponse>(&content) {
                Ok(problem) => Err(Error::Api(match problem.detail {
                    Some(detail) => format!("{}: {}", problem.title, detail),
                    None => problem.title,
                })),
                Err(_) => Err(status_error.into()),
            };
        }

        serde_json::from_str(&content).map_err(|e| e.into())
    }
}

async fn log(name: &str, content: &str) -> Result<()> {
    use std::path::PathBuf;
    use tokio::{fs::File, io::AsyncWriteExt};

    if let Ok(dir) = std::env::var("CLIENT_LOG_DIR") {
        let time = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let filepath = PathBuf::from(dir).join(format!("twitter_{}_{}.json", name, time));
        let mut file = File::create(filepath).await?;
        file.write_all(content.as_bytes()).await?;
    }
    Ok(())
}
