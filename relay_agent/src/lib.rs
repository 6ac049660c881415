pub mod cache;
pub mod pipeline;
pub mod project;
pub mod report;
pub mod source;

pub use cache::TwitterCache;
pub use pipeline::{reconcile_request, summarize, FAILURE_MESSAGE};
pub use project::{best_match, lookup_projects, DexScreener, PairSearch, ProjectSummary};
pub use report::{escape_markdown, generate_report};
pub use source::TwitterSource;
