use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::response::{ApiError, TimelineResponse, UserResponse};
pub use crate::response::{TweetData as Tweet, UserData as User};

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Timeline {
    /// Newest first.
    pub tweets: Vec<Tweet>,
    pub next_token: Option<String>,
    pub newest_id: Option<String>,
    pub oldest_id: Option<String>,
}

/// Query params of the user timeline endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineParams {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub since_id: Option<String>,
    pub until_id: Option<String>,
    pub pagination_token: Option<String>,
    pub max_results: Option<u32>,
}

fn join_errors(errors: &[ApiError]) -> String {
    errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ")
}

impl TryFrom<UserResponse> for User {
    type Error = Error;

    fn try_from(response: UserResponse) -> Result<Self, Self::Error> {
        match response.data {
            Some(user) => Ok(user),
            None if response.errors.is_empty() => Err(Error::NotFound("user".to_string())),
            None => Err(Error::NotFound(join_errors(&response.errors))),
        }
    }
}

impl TryFrom<TimelineResponse> for Timeline {
    type Error = Error;

    fn try_from(response: TimelineResponse) -> Result<Self, Self::Error> {
        // An empty timeline has neither data nor errors, only `result_count: 0`
        let tweets = match response.data {
            Some(tweets) => {
                if !response.errors.is_empty() {
                    tracing::warn!("Partial timeline errors: {}", join_errors(&response.errors));
                }
                tweets
            }
            None if response.errors.is_empty() => vec![],
            None => return Err(Error::Api(join_errors(&response.errors))),
        };
        Ok(Timeline {
            tweets,
            next_token: response.meta.next_token,
            newest_id: response.meta.newest_id,
            oldest_id: response.meta.oldest_id,
        })
    }
}
