use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::model::TweetRecord;

/// Rolling window of tweet records, newest at the front and oldest at the back.
///
/// Timestamps are non-increasing from front to back. Pushes that would break the
/// order are rejected with [`Error::OutOfOrder`]; peeks and pops on an empty cache
/// fail with [`Error::EmptyCache`] instead of returning a sentinel.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct TweetCache {
    records: VecDeque<TweetRecord>,
}

impl TweetCache {
    pub fn new() -> Self {
        Self { records: VecDeque::new() }
    }

    /// Build a cache from records in any order.
    pub fn from_records(records: impl IntoIterator<Item = TweetRecord>) -> Self {
        let mut records: Vec<_> = records.into_iter().collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Self { records: records.into() }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push_front(&mut self, record: TweetRecord) -> Result<()> {
        if let Some(front) = self.records.front() {
            if record.timestamp < front.timestamp {
                return Err(Error::OutOfOrder {
                    id: record.id,
                    timestamp: record.timestamp,
                    end: "front",
                });
            }
        }
        self.records.push_front(record);
        Ok(())
    }

    pub fn push_back(&mut self, record: TweetRecord) -> Result<()> {
        if let Some(back) = self.records.back() {
            if record.timestamp > back.timestamp {
                return Err(Error::OutOfOrder {
                    id: record.id,
                    timestamp: record.timestamp,
                    end: "back",
                });
            }
        }
        self.records.push_back(record);
        Ok(())
    }

    pub fn peek_front(&self) -> Result<&TweetRecord> {
        self.records.front().ok_or(Error::EmptyCache("peek front"))
    }

    pub fn peek_back(&self) -> Result<&TweetRecord> {
        self.records.back().ok_or(Error::EmptyCache("peek back"))
    }

    pub fn pop_front(&mut self) -> Result<TweetRecord> {
        self.records.pop_front().ok_or(Error::EmptyCache("pop front"))
    }

    pub fn pop_back(&mut self) -> Result<TweetRecord> {
        self.records.pop_back().ok_or(Error::EmptyCache("pop back"))
    }

    /// Insert at the position that keeps the order, after any records with an equal timestamp
    /// when seen from the front.
    pub fn insert_sorted(&mut self, record: TweetRecord) {
        let index = self.records.partition_point(|r| r.timestamp >= record.timestamp);
        self.records.insert(index, record);
    }

    /// Whether a record for the same tweet and ticker is already cached.
    /// Only the run of records sharing the timestamp is inspected.
    pub fn contains(&self, record: &TweetRecord) -> bool {
        let start = self.records.partition_point(|r| r.timestamp > record.timestamp);
        self.records
            .range(start..)
            .take_while(|r| r.timestamp == record.timestamp)
            .any(|r| r.same_mention(record))
    }

    /// Drop records older than `retention` before now. Returns how many were removed.
    pub fn prune(&mut self, retention: Duration) -> usize {
        self.prune_at(Utc::now(), retention)
    }

    /// Drop records older than `now - retention`, trimming from the back only.
    pub fn prune_at(&mut self, now: DateTime<Utc>, retention: Duration) -> usize {
        let horizon = (now - retention).timestamp_millis();
        let mut pruned = 0;
        while self.records.back().is_some_and(|r| r.timestamp < horizon) {
            self.records.pop_back();
            pruned += 1;
        }
        if pruned > 0 {
            tracing::info!("Pruned {} records older than {}", pruned, now - retention);
        }
        pruned
    }

    pub fn iter(&self) -> impl Iterator<Item = &TweetRecord> + '_ {
        self.records.iter()
    }

    /// Snapshot of the records, newest first.
    pub fn to_sequence(&self) -> Vec<TweetRecord> {
        self.records.iter().cloned().collect()
    }

    /// Records with `start <= timestamp <= end`, newest first.
    pub fn range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<TweetRecord> {
        let (start, end) = (start.timestamp_millis(), end.timestamp_millis());
        let from = self.records.partition_point(|r| r.timestamp > end);
        self.records
            .range(from..)
            .take_while(|r| r.timestamp >= start)
            .cloned()
            .collect()
    }

    pub fn is_ordered(&self) -> bool {
        self.records
            .iter()
            .zip(self.records.iter().skip(1))
            .all(|(a, b)| a.timestamp >= b.timestamp)
    }
}
