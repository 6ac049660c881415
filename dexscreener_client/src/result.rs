use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull, DisplayFromStr, VecSkipError};

#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub schema_version: Option<String>,
    /// `null` when nothing matches. Pairs that do not parse are skipped.
    #[serde_as(as = "DefaultOnNull<VecSkipError<_>>")]
    #[serde(default)]
    pub pairs: Vec<Pair>,
}

#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Pair {
    pub chain_id: String,
    pub dex_id: String,
    pub url: Option<String>,
    pub pair_address: String,
    pub base_token: Token,
    pub quote_token: Option<Token>,
    pub price_native: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub price_usd: Option<f64>,
    pub liquidity: Option<Liquidity>,
    pub volume: Option<Volume>,
    pub fdv: Option<f64>,
    pub market_cap: Option<f64>,
    pub pair_created_at: Option<i64>,
    pub info: Option<PairInfo>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Token {
    pub address: String,
    pub name: String,
    pub symbol: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Liquidity {
    pub usd: Option<f64>,
    pub base: Option<f64>,
    pub quote: Option<f64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Volume {
    pub h24: Option<f64>,
    pub h6: Option<f64>,
    pub h1: Option<f64>,
    pub m5: Option<f64>,
}

#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PairInfo {
    pub image_url: Option<String>,
    #[serde_as(as = "DefaultOnNull<VecSkipError<_>>")]
    #[serde(default)]
    pub websites: Vec<Website>,
    #[serde_as(as = "DefaultOnNull<VecSkipError<_>>")]
    #[serde(default)]
    pub socials: Vec<Social>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Website {
    pub label: Option<String>,
    pub url: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Social {
    #[serde(rename = "type")]
    pub type_: String,
    pub url: String,
}

impl Pair {
    pub fn liquidity_usd(&self) -> f64 {
        self.liquidity.as_ref().and_then(|l| l.usd).unwrap_or(0.0)
    }

    pub fn volume_24h(&self) -> f64 {
        self.volume.as_ref().and_then(|v| v.h24).unwrap_or(0.0)
    }

    /// URL of the first social link of a kind such as `twitter` or `telegram`.
    pub fn social(&self, kind: &str) -> Option<&str> {
        self.info
            .as_ref()?
            .socials
            .iter()
            .find(|s| s.type_.eq_ignore_ascii_case(kind))
            .map(|s| s.url.as_str())
    }

    pub fn websites(&self) -> Vec<&str> {
        self.info
            .as_ref()
            .map(|info| info.websites.iter().map(|w| w.url.as_str()).collect())
            .unwrap_or_default()
    }
}
