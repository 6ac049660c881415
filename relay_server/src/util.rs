use std::{future::Future, result::Result, time::Duration};

use diesel::{connection::SimpleConnection, SqliteConnection};

use relay_core::Error as RelayError;

use crate::error::ServerError;

/// A reconciliation may page through a whole backfill.
pub const DEFAULT_TIMEOUT_MS: u64 = 300000;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
pub const DEFAULT_RETRY_COUNT: usize = 5;

pub fn timeout<T, E: Into<ServerError>>(
    f: impl Future<Output = Result<T, E>>,
) -> impl Future<Output = Result<T, ServerError>> {
    use futures::FutureExt;
    tokio::time::timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS), f).map(move |result| {
        result
            .map(|r| r.map_err(Into::into))
            .unwrap_or_else(|_| Err(RelayError::Timeout(format!("after {} ms", DEFAULT_TIMEOUT_MS)).into()))
    })
}

pub fn retry<R, T: Future<Output = Result<R, ServerError>>, F: FnMut() -> T>(
    f: F,
) -> impl Future<Output = Result<R, ServerError>> {
    use tokio_retry::{strategy::FixedInterval, RetryIf};
    let strategy = FixedInterval::from_millis(DEFAULT_RETRY_DELAY_MS).take(DEFAULT_RETRY_COUNT);
    RetryIf::spawn(strategy, f, |e: &ServerError| e.retryable())
}

/// Read an optional variable, falling back to `default` when it is unset or does not parse.
pub fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={}", key, value);
            default
        }),
        Err(_) => default,
    }
}

// MARK: Database

/// https://stackoverflow.com/questions/57123453/how-to-use-diesel-with-sqlite-connections-and-avoid-database-is-locked-type-of
#[derive(Debug)]
pub struct ConnectionOptions {
    pub enable_wal: bool,
    pub busy_timeout: Option<Duration>,
}

impl diesel::r2d2::CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        (|| {
            if let Some(d) = self.busy_timeout {
                conn.batch_execute(&format!("PRAGMA busy_timeout = {};", d.as_millis()))?;
            }
            if self.enable_wal {
                conn.batch_execute("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
            }
            Ok(())
        })()
        .map_err(diesel::r2d2::Error::QueryError)
    }
}
