use crate::model::{RawTweet, TweetRecord};

/// Extract `$`-prefixed symbols from text, in order of appearance, without the `$`.
/// A symbol starts with an ASCII letter followed by ASCII letters or digits.
pub fn extract_tickers(text: &str) -> Vec<String> {
    let mut tickers = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find('$') {
        rest = &rest[pos + 1..];
        let len = rest
            .char_indices()
            .take_while(|(i, c)| if *i == 0 { c.is_ascii_alphabetic() } else { c.is_ascii_alphanumeric() })
            .count();
        if len > 0 {
            tickers.push(rest[..len].to_string());
            rest = &rest[len..];
        }
    }
    tickers
}

/// Expand a raw tweet into one record per ticker. Tweets without a parsable
/// timestamp or without tickers yield nothing.
pub fn expand(tweet: &RawTweet) -> Vec<TweetRecord> {
    let Some(timestamp) = tweet.timestamp() else {
        tracing::warn!("Dropped tweet {} with unparsable timestamp {:?}", tweet.id, tweet.created_at);
        return vec![];
    };
    extract_tickers(&tweet.text)
        .into_iter()
        .map(|ticker| TweetRecord {
            id: tweet.id.clone(),
            text: tweet.text.clone(),
            ticker,
            timestamp,
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_extract_tickers() {
        assert_eq!(extract_tickers("bullish on $FOO and $BAR"), vec!["FOO", "BAR"]);
        assert_eq!(extract_tickers("$eth2 looks good"), vec!["eth2"]);
        assert_eq!(extract_tickers("$SOL, $JUP."), vec!["SOL", "JUP"]);
        assert_eq!(extract_tickers("a$B"), vec!["B"]);
    }

    #[test]
    fn test_extract_tickers_rejects_malformed() {
        assert!(extract_tickers("").is_empty());
        assert!(extract_tickers("no tickers here").is_empty());
        assert!(extract_tickers("price is $100").is_empty());
        assert!(extract_tickers("$ $$ $_X").is_empty());
        assert_eq!(extract_tickers("$$DOGE"), vec!["DOGE"]);
        assert_eq!(extract_tickers("€$ÄBC $Ok"), vec!["Ok"]);
    }

    #[test]
    fn test_expand_fans_out() {
        let tweet = RawTweet {
            id: "42".to_string(),
            text: "bullish on $FOO and $BAR".to_string(),
            created_at: "2024-05-01T12:00:00Z".to_string(),
        };
        let records = expand(&tweet);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "42");
        assert_eq!(records[0].ticker, "FOO");
        assert_eq!(records[1].id, "42");
        assert_eq!(records[1].ticker, "BAR");
        assert_eq!(records[0].timestamp, records[1].timestamp);
    }

    #[test]
    fn test_expand_drops_unusable() {
        let tweet = RawTweet {
            id: "1".to_string(),
            text: "gm".to_string(),
            created_at: "2024-05-01T12:00:00Z".to_string(),
        };
        assert!(expand(&tweet).is_empty());

        let tweet = RawTweet {
            id: "2".to_string(),
            text: "$FOO".to_string(),
            created_at: "not a date".to_string(),
        };
        assert!(expand(&tweet).is_empty());
    }
}
