use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Upstream fetch failed: {0}")]
    Upstream(#[source] anyhow::Error),
    #[error("Rate Limit: {0}")]
    RateLimit(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Pagination did not terminate after {0} pages")]
    RunawayPagination(usize),

    #[error("Corrupt state `{key}`: {reason}")]
    CorruptState { key: String, reason: String },
    #[error("Cannot {0} on an empty cache")]
    EmptyCache(&'static str),
    #[error("Record {id} at {timestamp} breaks the order at the {end} of the cache")]
    OutOfOrder {
        id: String,
        timestamp: i64,
        end: &'static str,
    },

    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] diesel::ConnectionError),

    #[error("Cannot encode/decode JSON: {0}")]
    JSONError(#[from] serde_json::Error),
    #[error("Cannot parse date: {0}")]
    DateError(#[from] chrono::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Whether a later attempt of the same reconciliation may succeed.
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            Error::Upstream(_) | Error::RateLimit(_) | Error::Timeout(_) | Error::RunawayPagination(_)
        )
    }
}
