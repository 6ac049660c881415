pub const API: &str = "https://api.twitter.com/2";
pub const USER_AGENT: &str = "relay/0.1";

pub const TIMELINE_MIN_RESULTS: u32 = 5;
pub const TIMELINE_MAX_RESULTS: u32 = 100;

pub const RATE_LIMIT_RESET_HEADER: &str = "x-rate-limit-reset";
