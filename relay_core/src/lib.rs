pub mod cache;
pub mod error;
pub mod merge;
pub mod model;
pub mod reconcile;
pub mod schema;
pub mod source;
pub mod store;
pub mod ticker;

pub use cache::TweetCache;
pub use error::*;
pub use model::{CoverageState, RawTweet, TweetRecord};
pub use reconcile::{ReconcileConfig, ReconcileRequest, Reconciler};
pub use source::{Page, PageQuery, TweetSource};
pub use store::{BlobStore, StateKeys};
