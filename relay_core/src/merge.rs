use crate::cache::TweetCache;
use crate::model::TweetRecord;

/// Merge records fetched for a range newer than the cache. Records are pushed oldest first so the
/// newest one ends up at the front; anything that already exists is skipped.
/// Returns the number of records added.
pub fn merge_newer(cache: &mut TweetCache, mut batch: Vec<TweetRecord>) -> usize {
    batch.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    let mut added = 0;
    for record in batch {
        if cache.contains(&record) {
            continue;
        }
        if let Err(e) = cache.push_front(record.clone()) {
            tracing::debug!("{}, inserting in order", e);
            cache.insert_sorted(record);
        }
        added += 1;
    }
    added
}

/// Merge records fetched for a range older than the cache. Records are pushed newest first so the
/// oldest one ends up at the back; anything that already exists is skipped.
/// Returns the number of records added.
pub fn merge_older(cache: &mut TweetCache, mut batch: Vec<TweetRecord>) -> usize {
    batch.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    let mut added = 0;
    for record in batch {
        if cache.contains(&record) {
            continue;
        }
        if let Err(e) = cache.push_back(record.clone()) {
            tracing::debug!("{}, inserting in order", e);
            cache.insert_sorted(record);
        }
        added += 1;
    }
    added
}
