use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;

use telegram_client::TelegramClient;

use crate::background_job::ReconcileJobQueue;

pub type DatabasePool = Pool<ConnectionManager<SqliteConnection>>;

#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: DatabasePool,

    /// Username of the tracked account
    pub account: String,
    /// Reconcile job queue, the only writer of the account's tweet window
    pub reconcile_queue: ReconcileJobQueue,
    /// Bot client, absent when no bot token is configured
    pub telegram: Option<TelegramClient>,
}
