// The rolling tweet window of one account.
// A reconciliation loads the cache and its coverage state, fetches only the time ranges the
// coverage is missing, merges them into the cache, prunes it to the retention horizon and
// stores everything back.
// At most one reconciliation per account may run at a time; callers serialize them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::TweetCache;
use crate::error::{Error, Result};
use crate::merge;
use crate::model::{CoverageState, RawTweet, TweetRecord};
use crate::source::{PageQuery, TweetSource};
use crate::store::{self, BlobStore, StateKeys};
use crate::ticker;

#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Records older than this are pruned at the end of every run.
    pub retention: Duration,
    /// Page limit for filling a single gap.
    pub max_pages: usize,
    pub default_time_range_hours: f64,
    pub page_size: u32,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            retention: Duration::hours(24),
            max_pages: 50,
            default_time_range_hours: 24.0,
            page_size: 100,
        }
    }
}

impl ReconcileConfig {
    /// Fall back to the default range unless the requested one is a finite positive number.
    pub fn time_range_hours(&self, requested: Option<f64>) -> f64 {
        match requested {
            Some(hours) if hours.is_finite() && hours > 0.0 => hours,
            _ => self.default_time_range_hours,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReconcileRequest {
    /// Return at most this many records. All records in range when unset.
    pub max_count: Option<usize>,
    /// How far back from now to look. Defaults to 24 hours.
    pub time_range_hours: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Towards newer tweets, records go to the front of the cache.
    Forward,
    /// Towards older tweets, records go to the back of the cache.
    Backward,
}

/// A time range missing from the coverage, bounds inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gap {
    pub direction: Direction,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Work out which ranges must be fetched to cover `[cutoff, end]`, where `end` is the latest
/// instant the source can serve.
///
/// An uninitialized coverage needs a single backfill over the whole window, or nothing when the
/// window lies entirely past `end`. Otherwise there may be an older gap below the earliest covered
/// time and a newer gap above the latest one.
pub fn plan(coverage: &CoverageState, cutoff: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Gap> {
    let Some((earliest, latest)) = coverage.bounds() else {
        if end <= cutoff {
            return vec![];
        }
        return vec![Gap {
            direction: Direction::Backward,
            start: cutoff,
            end,
        }];
    };
    let mut gaps = Vec::new();
    if cutoff < earliest {
        gaps.push(Gap {
            direction: Direction::Backward,
            start: cutoff,
            end: earliest,
        });
    }
    if latest < end {
        gaps.push(Gap {
            direction: Direction::Forward,
            start: latest,
            end,
        });
    }
    gaps
}

pub struct Reconciler<'a, S, B> {
    source: &'a S,
    store: &'a mut B,
    config: &'a ReconcileConfig,
}

impl<'a, S, B> Reconciler<'a, S, B>
where
    S: TweetSource + Sync,
    B: BlobStore + Send,
{
    pub fn new(source: &'a S, store: &'a mut B, config: &'a ReconcileConfig) -> Self {
        Self { source, store, config }
    }

    /// Reconcile the account's window up to the current time.
    pub async fn reconcile(&mut self, account_id: &str, request: &ReconcileRequest) -> Result<Vec<TweetRecord>> {
        self.reconcile_at(account_id, request, Utc::now()).await
    }

    /// Reconcile the account's window up to `now`, returning the records within the requested
    /// range, newest first.
    pub async fn reconcile_at(
        &mut self,
        account_id: &str,
        request: &ReconcileRequest,
        now: DateTime<Utc>,
    ) -> Result<Vec<TweetRecord>> {
        let hours = self.config.time_range_hours(request.time_range_hours);
        let cutoff = now
            .checked_sub_signed(hours_to_duration(hours))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let keys = StateKeys::new(account_id);

        // 1. Load state, starting over if either blob is unusable
        let (mut cache, mut coverage) = store::load_state(self.store, &keys)?;
        if coverage.latest_time.is_some_and(|latest| latest < cutoff) {
            tracing::info!(
                "Coverage of {} ends at {:?}, before the cutoff {}. Starting a new window",
                account_id,
                coverage.latest_time,
                cutoff
            );
            coverage = CoverageState::default();
        }

        // 2. Fill the gaps, up to where the source can serve
        let end = self.source.queryable_end(now).min(now);
        let gaps = plan(&coverage, cutoff, end);
        tracing::info!(
            "Reconciling {} for the last {} hours: {} cached records, {} gaps",
            account_id,
            hours,
            cache.len(),
            gaps.len()
        );
        for gap in gaps {
            match gap.direction {
                Direction::Backward => {
                    self.fill_older(account_id, &keys, &gap, &mut cache, &mut coverage)
                        .await?
                }
                Direction::Forward => {
                    self.fill_newer(account_id, &keys, &gap, &mut cache, &mut coverage)
                        .await?
                }
            }
        }

        // 3. Collect the response before pruning, so a range wider than the retention still gets
        // everything that was fetched
        let mut records = cache.range(cutoff, now);
        if let Some(max_count) = request.max_count {
            records.truncate(max_count);
        }

        // 4. Prune and store
        cache.prune_at(now, self.config.retention);
        retain_coverage(&mut coverage, now - self.config.retention);
        store::save_cache(self.store, &keys.cache, &cache)?;
        store::save_coverage(self.store, &keys.coverage, &coverage)?;

        tracing::info!(
            "Reconciled {}: returning {} records, {} cached, coverage {:?}..{:?}",
            account_id,
            records.len(),
            cache.len(),
            coverage.earliest_time,
            coverage.latest_time
        );
        Ok(records)
    }

    /// Walk backward through `[gap.start, gap.end]`, committing cache and coverage after every
    /// page so an interrupted run resumes below the last committed page.
    async fn fill_older(
        &mut self,
        account_id: &str,
        keys: &StateKeys,
        gap: &Gap,
        cache: &mut TweetCache,
        coverage: &mut CoverageState,
    ) -> Result<()> {
        let until_id = coverage.earliest_id.clone();
        let mut cursor = None;
        let mut pages = 0;
        let mut fetched = 0;
        loop {
            if pages >= self.config.max_pages {
                return Err(Error::RunawayPagination(pages));
            }
            let query = PageQuery {
                account_id: account_id.to_string(),
                start_time: gap.start,
                end_time: gap.end,
                cursor: cursor.take(),
                since_id: None,
                until_id: until_id.clone(),
                max_results: self.config.page_size,
            };
            let page = self.source.fetch_page(&query).await?;
            pages += 1;

            let exhausted = page.next_cursor.is_none() || page.tweets.is_empty();
            let batch = PageBatch::new(&page.tweets);
            fetched += merge::merge_older(cache, batch.records);

            // Advance the boundary. Pages come newest first, so everything down to the oldest
            // tweet seen so far is covered.
            if coverage.latest_time.is_none() {
                coverage.latest_time = Some(gap.end);
                coverage.latest_id = batch.newest.as_ref().map(|(_, id)| id.clone());
            }
            let current = coverage.earliest_time.unwrap_or(gap.end);
            if exhausted {
                coverage.earliest_time = Some(gap.start.min(current));
            } else if let Some((oldest, _)) = &batch.oldest {
                coverage.earliest_time = Some((*oldest).max(gap.start).min(current));
            } else {
                coverage.earliest_time = Some(current);
            }
            if let Some((_, id)) = batch.oldest {
                coverage.earliest_id = Some(id);
            }

            store::save_cache(self.store, &keys.cache, cache)?;
            store::save_coverage(self.store, &keys.coverage, coverage)?;
            tracing::debug!(
                "Older page {} of {}: {} tweets, earliest covered {:?}",
                pages,
                account_id,
                page.tweets.len(),
                coverage.earliest_time
            );

            if exhausted {
                break;
            }
            cursor = page.next_cursor;
        }
        tracing::info!(
            "Filled older gap {}..{} of {}: {} pages, {} new records",
            gap.start,
            gap.end,
            account_id,
            pages,
            fetched
        );
        Ok(())
    }

    /// Walk through `[gap.start, gap.end]` from the newest tweet down, then commit the whole range
    /// at once. Pages arrive newest first, so coverage can only advance once the range is complete.
    async fn fill_newer(
        &mut self,
        account_id: &str,
        keys: &StateKeys,
        gap: &Gap,
        cache: &mut TweetCache,
        coverage: &mut CoverageState,
    ) -> Result<()> {
        let since_id = coverage.latest_id.clone();
        let mut cursor = None;
        let mut pages = 0;
        let mut records = Vec::new();
        let mut newest: Option<(DateTime<Utc>, String)> = None;
        loop {
            if pages >= self.config.max_pages {
                return Err(Error::RunawayPagination(pages));
            }
            let query = PageQuery {
                account_id: account_id.to_string(),
                start_time: gap.start,
                end_time: gap.end,
                cursor: cursor.take(),
                since_id: since_id.clone(),
                until_id: None,
                max_results: self.config.page_size,
            };
            let page = self.source.fetch_page(&query).await?;
            pages += 1;

            let batch = PageBatch::new(&page.tweets);
            tracing::debug!("Newer page {} of {}: {} tweets", pages, account_id, page.tweets.len());
            records.extend(batch.records);
            if let Some(candidate) = batch.newest {
                if newest.as_ref().map_or(true, |(time, _)| candidate.0 > *time) {
                    newest = Some(candidate);
                }
            }

            if page.next_cursor.is_none() || page.tweets.is_empty() {
                break;
            }
            cursor = page.next_cursor;
        }

        let fetched = merge::merge_newer(cache, records);
        coverage.latest_time = Some(gap.end);
        if let Some((_, id)) = newest {
            coverage.latest_id = Some(id);
        }
        store::save_cache(self.store, &keys.cache, cache)?;
        store::save_coverage(self.store, &keys.coverage, coverage)?;
        tracing::info!(
            "Filled newer gap {}..{} of {}: {} pages, {} new records",
            gap.start,
            gap.end,
            account_id,
            pages,
            fetched
        );
        Ok(())
    }
}

/// Records of one page plus the time and id of its oldest and newest datable tweets,
/// including tweets without tickers.
struct PageBatch {
    records: Vec<TweetRecord>,
    oldest: Option<(DateTime<Utc>, String)>,
    newest: Option<(DateTime<Utc>, String)>,
}

impl PageBatch {
    fn new(tweets: &[RawTweet]) -> Self {
        let mut records = Vec::new();
        let mut oldest: Option<(DateTime<Utc>, String)> = None;
        let mut newest: Option<(DateTime<Utc>, String)> = None;
        for tweet in tweets {
            records.extend(ticker::expand(tweet));
            let Some(time) = tweet.timestamp().and_then(DateTime::<Utc>::from_timestamp_millis) else {
                continue;
            };
            if oldest.as_ref().map_or(true, |(t, _)| time < *t) {
                oldest = Some((time, tweet.id.clone()));
            }
            if newest.as_ref().map_or(true, |(t, _)| time > *t) {
                newest = Some((time, tweet.id.clone()));
            }
        }
        Self { records, oldest, newest }
    }
}

/// Shrink the coverage to what survives pruning at `horizon`.
fn retain_coverage(coverage: &mut CoverageState, horizon: DateTime<Utc>) {
    let Some((earliest, latest)) = coverage.bounds() else {
        return;
    };
    if latest < horizon {
        *coverage = CoverageState::default();
    } else if earliest < horizon {
        coverage.earliest_time = Some(horizon);
        coverage.earliest_id = None;
    }
}

/// Ranges past roughly 30000 years are capped.
fn hours_to_duration(hours: f64) -> Duration {
    let millis = (hours * 3_600_000.0).round().min(1e15);
    Duration::milliseconds(millis as i64)
}
