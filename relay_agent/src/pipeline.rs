// From reconciled records to messages ready to send.

use relay_core::{ReconcileRequest, TweetRecord};
use relay_util::FetchCommand;

use crate::project::{lookup_projects, PairSearch};
use crate::report::generate_report;

/// The only failure text shown on a messaging channel.
pub const FAILURE_MESSAGE: &str = "Failed to fetch tweets. Please try again later.";

pub fn reconcile_request(command: &FetchCommand) -> ReconcileRequest {
    ReconcileRequest {
        max_count: command.max_count,
        time_range_hours: command.time_range_hours,
    }
}

/// Look up the projects mentioned by `records` and render them as report messages.
pub async fn summarize(search: &(impl PairSearch + Sync), records: &[TweetRecord]) -> Vec<String> {
    let projects = lookup_projects(search, records).await;
    generate_report(&projects)
}
