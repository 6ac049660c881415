use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, VecSkipError};

// Entities

#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UserData {
    #[serde_as(as = "DisplayFromStr")]
    pub id: u64,
    pub name: String,
    pub username: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TweetData {
    pub id: String,
    pub text: String,
    /// Only present when requested through `tweet.fields`.
    pub created_at: Option<String>,
    pub author_id: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct TimelineMeta {
    #[serde(default)]
    pub result_count: u32,
    pub newest_id: Option<String>,
    pub oldest_id: Option<String>,
    pub next_token: Option<String>,
}

/// An entry of `errors`. Requests can fail as a whole or partially, next to `data`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ApiError {
    pub title: String,
    pub detail: Option<String>,
    #[serde(rename = "type")]
    pub type_: Option<String>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.title, detail),
            None => write!(f, "{}", self.title),
        }
    }
}

// Responses

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UserResponse {
    pub data: Option<UserData>,
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimelineResponse {
    #[serde_as(as = "Option<VecSkipError<_>>")]
    pub data: Option<Vec<TweetData>>,
    #[serde(default)]
    pub meta: TimelineMeta,
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

/// Body of a non-success status.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ProblemResponse {
    pub title: String,
    pub detail: Option<String>,
    pub status: Option<u16>,
}
