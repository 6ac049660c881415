use chrono::{TimeZone, Utc};

use crate::response::{TimelineResponse, UserResponse};
use crate::result::{Timeline, User};
use crate::util::{format_end_time, format_start_time};
use crate::Error;

#[test]
fn test_parse_user_by_username() {
    let content = r#"{"data":{"id":"1852674305517342720","name":"aixbt","username":"aixbt_agent"}}"#;
    let response: UserResponse = serde_json::from_str(content).unwrap();
    let user: User = response.try_into().unwrap();
    assert_eq!(user.id, 1852674305517342720);
    assert_eq!(user.username, "aixbt_agent");
}

#[test]
fn test_parse_missing_user() {
    let content = r#"{"errors":[{"value":"nobody","detail":"Could not find user with username: [nobody].","title":"Not Found Error","resource_type":"user","parameter":"username","resource_id":"nobody","type":"https://api.twitter.com/2/problems/resource-not-found"}]}"#;
    let response: UserResponse = serde_json::from_str(content).unwrap();
    let result: Result<User, Error> = response.try_into();
    match result {
        Err(Error::NotFound(message)) => assert!(message.contains("Could not find user")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_parse_user_tweets() {
    let content = r#"{
        "data": [
            {"id": "1866", "text": "$SOL ecosystem heating up", "created_at": "2024-12-11T09:30:00.000Z", "author_id": "1852674305517342720", "edit_history_tweet_ids": ["1866"]},
            {"id": 1865, "text": "malformed id"},
            {"id": "1864", "text": "gm", "created_at": "2024-12-11T09:00:00.000Z"}
        ],
        "meta": {"result_count": 3, "newest_id": "1866", "oldest_id": "1864", "next_token": "7140dibdnow9c7btw4"}
    }"#;
    let response: TimelineResponse = serde_json::from_str(content).unwrap();
    let timeline: Timeline = response.try_into().unwrap();

    let ids: Vec<_> = timeline.tweets.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["1866", "1864"]);
    assert_eq!(timeline.tweets[0].created_at.as_deref(), Some("2024-12-11T09:30:00.000Z"));
    assert_eq!(timeline.next_token.as_deref(), Some("7140dibdnow9c7btw4"));
}

#[test]
fn test_parse_empty_timeline() {
    let response: TimelineResponse = serde_json::from_str(r#"{"meta":{"result_count":0}}"#).unwrap();
    let timeline: Timeline = response.try_into().unwrap();
    assert!(timeline.tweets.is_empty());
    assert_eq!(timeline.next_token, None);
}

#[test]
fn test_parse_timeline_error() {
    let content = r#"{"errors":[{"title":"Invalid Request","detail":"The `start_time` query parameter value must be before the `end_time`.","type":"about:blank"}]}"#;
    let response: TimelineResponse = serde_json::from_str(content).unwrap();
    let result: Result<Timeline, Error> = response.try_into();
    assert!(matches!(result, Err(Error::Api(message)) if message.starts_with("Invalid Request")));
}

#[test]
fn test_format_query_time() {
    let exact = Utc.with_ymd_and_hms(2024, 12, 11, 9, 30, 0).unwrap();
    let partial = exact + chrono::Duration::milliseconds(250);
    assert_eq!(format_start_time(exact), "2024-12-11T09:30:00Z");
    assert_eq!(format_end_time(exact), "2024-12-11T09:30:00Z");
    assert_eq!(format_start_time(partial), "2024-12-11T09:30:00Z");
    assert_eq!(format_end_time(partial), "2024-12-11T09:30:01Z");
}
