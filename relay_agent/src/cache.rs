use std::collections::HashMap;

/// Lookups that never change for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct TwitterCache {
    /// Lowercased username to user id.
    pub(crate) user_ids: HashMap<String, u64>,
}

impl TwitterCache {
    pub fn new() -> Self {
        Self { user_ids: HashMap::new() }
    }
}
