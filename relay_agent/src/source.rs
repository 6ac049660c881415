use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use relay_core::{Error, Page, PageQuery, RawTweet, Result, TweetSource};
use twitter_client::{TimelineParams, Tweet, TwitterClient};

use crate::cache::TwitterCache;

/// The timeline endpoint rejects end times closer to now than this.
const END_TIME_MARGIN_SECS: i64 = 10;

/// [`TweetSource`] over the Twitter API v2 user timeline. The account id of a query is the
/// username of the tracked account.
pub struct TwitterSource {
    client: TwitterClient,
    cache: RwLock<TwitterCache>,
}

impl TwitterSource {
    pub fn new(client: TwitterClient) -> Self {
        Self {
            client,
            cache: RwLock::new(TwitterCache::new()),
        }
    }

    /// Resolve a username to its user id, once per process.
    pub async fn user_id(&self, username: &str) -> Result<u64> {
        let key = username.to_lowercase();
        if let Some(id) = self.cache.read().await.user_ids.get(&key) {
            return Ok(*id);
        }

        let user = self.client.user_by_username(username).await.map_err(source_error)?;
        tracing::info!("Resolved @{} to user {}", user.username, user.id);
        self.cache.write().await.user_ids.insert(key, user.id);
        Ok(user.id)
    }
}

#[async_trait]
impl TweetSource for TwitterSource {
    async fn fetch_page(&self, query: &PageQuery) -> Result<Page> {
        let Some(params) = timeline_params(query, Utc::now()) else {
            tracing::debug!("Range {}..{} is too recent to query", query.start_time, query.end_time);
            return Ok(Page::default());
        };
        let user_id = self.user_id(&query.account_id).await?;
        let timeline = self.client.user_tweets(user_id, &params).await.map_err(source_error)?;
        Ok(Page {
            tweets: timeline.tweets.into_iter().map(raw_tweet).collect(),
            next_cursor: timeline.next_token,
        })
    }

    fn queryable_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::seconds(END_TIME_MARGIN_SECS)
    }
}

/// Map a page query to timeline params. Id anchors take precedence over the time bound on the
/// same side. Returns `None` when nothing of the range can be queried yet.
fn timeline_params(query: &PageQuery, now: DateTime<Utc>) -> Option<TimelineParams> {
    let latest_end = now - Duration::seconds(END_TIME_MARGIN_SECS);
    let start_time = query.since_id.is_none().then_some(query.start_time);
    let end_time = query.until_id.is_none().then_some(query.end_time.min(latest_end));
    if let (Some(start), Some(end)) = (start_time, end_time) {
        if end <= start {
            return None;
        }
    }
    Some(TimelineParams {
        start_time,
        end_time,
        since_id: query.since_id.clone(),
        until_id: query.until_id.clone(),
        pagination_token: query.cursor.clone(),
        max_results: Some(query.max_results),
    })
}

fn raw_tweet(tweet: Tweet) -> RawTweet {
    RawTweet {
        id: tweet.id,
        text: tweet.text,
        created_at: tweet.created_at.unwrap_or_default(),
    }
}

fn source_error(e: twitter_client::Error) -> Error {
    match e {
        twitter_client::Error::RateLimit(reset) => Error::RateLimit(match reset {
            Some(reset) => format!("Twitter API resets at {}", reset),
            None => "Twitter API".to_string(),
        }),
        e => Error::Upstream(anyhow::Error::from(e)),
    }
}
