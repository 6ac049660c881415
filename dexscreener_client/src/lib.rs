mod error;
mod result;

use reqwest::{StatusCode, Url};

use relay_util::build_params;

pub use crate::error::Error;
use crate::error::Result;
pub use crate::result::*;

const BASE_URL: &str = "https://api.dexscreener.com";

/// Search trading pairs matching a token symbol, name or address.
pub async fn search_pairs(query: &str) -> Result<Vec<Pair>> {
    let params = build_params! {
        required q => query,
    };
    let url = Url::parse_with_params(&format!("{}/latest/dex/search", BASE_URL), &params)?;

    let response = reqwest::get(url).await?;
    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        return Err(Error::RateLimit);
    }
    let response = response.error_for_status()?;
    let content = response.text().await?;

    log(query, &content).await?;
    let result: SearchResult = serde_json::from_str(&content)?;
    tracing::debug!("Found {} pairs for {}", result.pairs.len(), query);
    Ok(result.pairs)
}

async fn log(name: &str, content: &str) -> Result<()> {
    use std::path::PathBuf;
    use tokio::{fs::File, io::AsyncWriteExt};

    if let Ok(dir) = std::env::var("CLIENT_LOG_DIR") {
        let name: String = name.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        let time = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let filepath = PathBuf::from(dir).join(format!("dexscreener_{}_{}.json", name, time));
        let mut file = File::create(filepath).await?;
        file.write_all(content.as_bytes()).await?;
    }
    Ok(())
}
