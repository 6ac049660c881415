use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::RawTweet;

/// One request for a page of an account's tweets. Both time bounds are inclusive.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub account_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Continuation token from the previous page of the same range.
    pub cursor: Option<String>,
    /// Only tweets newer than this id.
    pub since_id: Option<String>,
    /// Only tweets older than this id.
    pub until_id: Option<String>,
    pub max_results: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub tweets: Vec<RawTweet>,
    pub next_cursor: Option<String>,
}

/// A paginated upstream source of tweets. Pages go from newest to oldest.
#[async_trait]
pub trait TweetSource {
    async fn fetch_page(&self, query: &PageQuery) -> Result<Page>;

    /// Latest instant the source can serve as of `now`. Coverage never advances past it.
    fn queryable_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now
    }
}
