use async_trait::async_trait;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use dexscreener_client::Pair;
use relay_core::TweetRecord;

/// Trading pair search, [`DexScreener`] in production.
#[async_trait]
pub trait PairSearch {
    async fn search(&self, query: &str) -> anyhow::Result<Vec<Pair>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DexScreener;

#[async_trait]
impl PairSearch for DexScreener {
    async fn search(&self, query: &str) -> anyhow::Result<Vec<Pair>> {
        Ok(dexscreener_client::search_pairs(query).await?)
    }
}

/// A mentioned project with the market data of its best trading pair.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub tweet_text: String,
    pub ticker: String,
    #[serde(rename = "dexScreenerLink")]
    pub dexscreener_link: String,
    pub twitter_link: Option<String>,
    pub telegram_link: Option<String>,
    #[serde(default)]
    pub websites: Vec<String>,
    pub token_name: String,
    pub token_symbol: String,
    pub chain_id: String,
    pub dex_id: String,
    pub liquidity: String,
    pub price_usd: String,
    pub volume_24h: String,
}

impl ProjectSummary {
    /// `None` when the pair misses its link, token name or symbol.
    pub fn new(record: &TweetRecord, pair: &Pair) -> Option<Self> {
        let link = pair.url.clone().filter(|url| !url.is_empty())?;
        if pair.base_token.name.is_empty() || pair.base_token.symbol.is_empty() {
            return None;
        }
        Some(Self {
            tweet_text: record.text.clone(),
            ticker: record.ticker.clone(),
            dexscreener_link: link,
            twitter_link: pair.social("twitter").map(|s| s.to_string()),
            telegram_link: pair.social("telegram").map(|s| s.to_string()),
            websites: pair.websites().into_iter().map(|s| s.to_string()).collect(),
            token_name: pair.base_token.name.clone(),
            token_symbol: pair.base_token.symbol.clone(),
            chain_id: pair.chain_id.clone(),
            dex_id: pair.dex_id.clone(),
            liquidity: format_usd(pair.liquidity_usd()),
            price_usd: format_usd(pair.price_usd.unwrap_or(0.0)),
            volume_24h: format_usd(pair.volume_24h()),
        })
    }
}

/// Pick the pair that most likely belongs to `ticker`: the most liquid pair whose base token
/// symbol equals the ticker or whose name contains it, else the most liquid pair overall.
pub fn best_match(ticker: &str, pairs: Vec<Pair>) -> Option<Pair> {
    let ticker = ticker.to_lowercase();
    let (matching, others): (Vec<_>, Vec<_>) = pairs.into_iter().partition(|pair| {
        pair.base_token.symbol.to_lowercase() == ticker || pair.base_token.name.to_lowercase().contains(&ticker)
    });
    let candidates = if matching.is_empty() { others } else { matching };
    candidates
        .into_iter()
        .max_by(|a, b| a.liquidity_usd().total_cmp(&b.liquidity_usd()))
}

/// Look up the project of every distinct ticker, in the order the records come in. A ticker whose
/// lookup fails or finds nothing usable is skipped.
pub async fn lookup_projects(search: &(impl PairSearch + Sync), records: &[TweetRecord]) -> Vec<ProjectSummary> {
    let mut projects = Vec::new();
    for record in records.iter().unique_by(|r| r.ticker.as_str()) {
        let pairs = match search.search(&record.ticker).await {
            Ok(pairs) => pairs,
            Err(e) => {
                tracing::error!("Cannot look up ${}: {:?}", record.ticker, e);
                continue;
            }
        };
        let Some(pair) = best_match(&record.ticker, pairs) else {
            tracing::info!("No pairs found for ${}", record.ticker);
            continue;
        };
        match ProjectSummary::new(record, &pair) {
            Some(project) => projects.push(project),
            None => tracing::info!("Incomplete project data for ${}, skipped", record.ticker),
        }
    }
    tracing::info!("Found {} projects for {} records", projects.len(), records.len());
    projects
}

/// Format a USD amount with thousands separators, like `$1,234.56`. Amounts below one dollar keep
/// up to eight decimals.
pub fn format_usd(amount: f64) -> String {
    if !amount.is_finite() {
        return "N/A".to_string();
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    let amount = amount.abs();
    if amount < 1.0 && amount > 0.0 {
        let decimals = format!("{:.8}", amount);
        let decimals = decimals.trim_end_matches('0');
        let decimals = if decimals.len() < 4 { format!("{:.2}", amount) } else { decimals.to_string() };
        return format!("{}${}", sign, decimals);
    }

    let fixed = format!("{:.2}", amount);
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let grouped = whole
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .join(",");
    format!("{}${}.{}", sign, grouped, fraction)
}
