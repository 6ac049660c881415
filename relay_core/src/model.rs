use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One ticker mention of one tweet. A tweet mentioning N tickers becomes N records
/// sharing `id`, `text` and `timestamp`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TweetRecord {
    pub id: String,
    pub text: String,
    pub ticker: String,
    /// Milliseconds since epoch.
    pub timestamp: i64,
}

impl TweetRecord {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    pub fn same_mention(&self, other: &TweetRecord) -> bool {
        self.id == other.id && self.ticker == other.ticker
    }
}

/// A tweet as the upstream source returns it, before ticker extraction.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RawTweet {
    pub id: String,
    pub text: String,
    /// RFC 3339 timestamp. Tweets whose timestamp does not parse are dropped.
    pub created_at: String,
}

impl RawTweet {
    pub fn timestamp(&self) -> Option<i64> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|t| t.with_timezone(&Utc).timestamp_millis())
    }
}

/// The contiguous time range the cache is known to fully cover, with the tweet ids
/// at its edges for upstream anchoring.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CoverageState {
    pub earliest_time: Option<DateTime<Utc>>,
    pub latest_time: Option<DateTime<Utc>>,
    pub earliest_id: Option<String>,
    pub latest_id: Option<String>,
}

impl CoverageState {
    /// Never populated: the next reconciliation is a full backfill.
    pub fn is_initial(&self) -> bool {
        self.earliest_time.is_none() && self.latest_time.is_none()
    }

    /// Both bounds set and ordered, or both unset.
    pub fn is_valid(&self) -> bool {
        match (self.earliest_time, self.latest_time) {
            (Some(earliest), Some(latest)) => earliest <= latest,
            (None, None) => true,
            _ => false,
        }
    }

    /// The covered interval, if any.
    pub fn bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.earliest_time?, self.latest_time?))
    }

    pub fn covers(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.bounds()
            .map(|(earliest, latest)| earliest <= start && end <= latest)
            .unwrap_or(false)
    }
}
