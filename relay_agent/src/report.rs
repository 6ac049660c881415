// Telegram MarkdownV2 reports of project summaries.

use itertools::Itertools;

use crate::project::ProjectSummary;

/// Longest text a single Telegram message may carry, in UTF-16 code units.
pub const MAX_MESSAGE_LENGTH: usize = 4096;

/// Tweets longer than this are cut before escaping, so a section always fits one message.
const MAX_TWEET_CHARS: usize = 1000;

const SEPARATOR: &str = "\n\n\\-\\-\\-\n\n";
const SPECIAL_CHARS: &str = "_*[]()~`>#+-=|{}.!\\";

/// Escape text for use outside of entities in a MarkdownV2 message.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL_CHARS.contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escape the URL part of an inline link, where only `)` and `\` are special.
fn escape_link_url(url: &str) -> String {
    url.replace('\\', "\\\\").replace(')', "\\)")
}

fn link(label: &str, url: &str) -> String {
    format!("[{}]({})", escape_markdown(label), escape_link_url(url))
}

fn message_length(text: &str) -> usize {
    text.encode_utf16().count()
}

fn preview(text: &str) -> String {
    if text.chars().count() <= MAX_TWEET_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_TWEET_CHARS).collect();
    cut.push('…');
    cut
}

fn project_section(project: &ProjectSummary) -> String {
    let socials = [("Twitter", &project.twitter_link), ("Telegram", &project.telegram_link)]
        .into_iter()
        .filter_map(|(name, url)| url.as_ref().map(|url| format!("• {}: {}", name, link("Link", url))))
        .join("\n");
    let socials = if socials.is_empty() { "_No social links available_".to_string() } else { socials };

    let websites = if project.websites.is_empty() {
        "_No websites available_".to_string()
    } else {
        project.websites.iter().map(|url| format!("• {}", link(url, url))).join("\n")
    };

    format!(
        "*{name} \\({symbol}\\)* 📊\n\n\
         *Tweet*: \"{tweet}\"\n\n\
         🔍 *Market Data*:\n\
         • Chain: {chain}\n\
         • DEX: {dex}\n\
         • Liquidity: {liquidity}\n\
         • Price \\(USD\\): {price}\n\
         • 24H Volume: {volume}\n\n\
         💹 *Social Media Links*:\n{socials}\n\n\
         🌐 *Websites*:\n{websites}\n\n\
         🔗 *DexScreener Link*: {dexscreener}",
        name = escape_markdown(&project.token_name),
        symbol = escape_markdown(&project.token_symbol),
        tweet = escape_markdown(&preview(&project.tweet_text)),
        chain = escape_markdown(&project.chain_id),
        dex = escape_markdown(&project.dex_id),
        liquidity = escape_markdown(&project.liquidity),
        price = escape_markdown(&project.price_usd),
        volume = escape_markdown(&project.volume_24h),
        socials = socials,
        websites = websites,
        dexscreener = link("View on DexScreener", &project.dexscreener_link),
    )
}

/// Split a section that is too long for one message at line breaks. Every line holds whole
/// entities, so a line is never cut. One that cannot fit a message by itself is dropped.
fn split_section(section: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for line in section.lines() {
        if message_length(line) > MAX_MESSAGE_LENGTH {
            tracing::warn!("Dropping a report line of {} characters", line.chars().count());
            continue;
        }
        if !current.is_empty() && message_length(&current) + 1 + message_length(line) > MAX_MESSAGE_LENGTH {
            pieces.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Render one MarkdownV2 section per project, separated by rules and packed into as few messages
/// as fit Telegram's length limit.
pub fn generate_report(projects: &[ProjectSummary]) -> Vec<String> {
    if projects.is_empty() {
        return vec![escape_markdown("No projects found for the requested tweets.")];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    for section in projects.iter().map(project_section) {
        // Pieces of one section continue on a new line, only whole sections get a rule
        for (i, piece) in split_section(&section).into_iter().enumerate() {
            let joiner = if i == 0 { SEPARATOR } else { "\n" };
            let needed = message_length(&current) + message_length(joiner) + message_length(&piece);
            if !current.is_empty() && needed > MAX_MESSAGE_LENGTH {
                chunks.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push_str(joiner);
            }
            current.push_str(&piece);
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    tracing::debug!("Report of {} projects in {} messages", projects.len(), chunks.len());
    chunks
}

#[cfg(test)]
mod test {
    use super::*;

    fn project(symbol: &str, tweet: &str) -> ProjectSummary {
        ProjectSummary {
            tweet_text: tweet.to_string(),
            ticker: symbol.to_string(),
            dexscreener_link: format!("https://dexscreener.com/solana/{}", symbol.to_lowercase()),
            twitter_link: Some("https://x.com/project".to_string()),
            telegram_link: None,
            websites: vec![],
            token_name: format!("{} Token", symbol),
            token_symbol: symbol.to_string(),
            chain_id: "solana".to_string(),
            dex_id: "raydium".to_string(),
            liquidity: "$1,234.56".to_string(),
            price_usd: "$0.0123".to_string(),
            volume_24h: "$99.00".to_string(),
        }
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("plain text"), "plain text");
        assert_eq!(escape_markdown("$1,234.56 (+5%)!"), "$1,234\\.56 \\(\\+5%\\)\\!");
        assert_eq!(escape_markdown("a_b*c~d`e>f#g=h|i{j}k-l[m]n\\o"), "a\\_b\\*c\\~d\\`e\\>f\\#g\\=h\\|i\\{j\\}k\\-l\\[m\\]n\\\\o");
    }

    #[test]
    fn test_report_section() {
        let reports = generate_report(&[project("SOL", "$SOL to 1k. Not advice!")]);
        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert!(report.starts_with("*SOL Token \\(SOL\\)* 📊"));
        assert!(report.contains("*Tweet*: \"$SOL to 1k\\. Not advice\\!\""));
        assert!(report.contains("• Liquidity: $1,234\\.56"));
        assert!(report.contains("• Twitter: [Link](https://x.com/project)"));
        assert!(!report.contains("Telegram:"));
        assert!(report.contains("_No websites available_"));
        assert!(report.ends_with("[View on DexScreener](https://dexscreener.com/solana/sol)"));
    }

    #[test]
    fn test_report_is_chunked() {
        let tweet = "x".repeat(250);
        let projects: Vec<_> = (0..40).map(|i| project(&format!("T{}", i), &tweet)).collect();
        let reports = generate_report(&projects);

        assert!(reports.len() > 1);
        assert!(reports.iter().all(|r| message_length(r) <= MAX_MESSAGE_LENGTH));
        let sections: usize = reports.iter().map(|r| r.matches("*DexScreener Link*").count()).sum();
        assert_eq!(sections, 40);
        assert!(reports.iter().all(|r| !r.ends_with(SEPARATOR) && !r.starts_with(SEPARATOR)));
    }

    #[test]
    fn test_oversized_section_is_split() {
        let mut huge = project("BIG", "tweet");
        huge.websites = (0..200).map(|i| format!("https://site{}.example.com/path", i)).collect();
        let reports = generate_report(&[huge]);
        assert!(reports.len() > 1);
        assert!(reports.iter().all(|r| message_length(r) <= MAX_MESSAGE_LENGTH));
        assert!(reports.iter().all(|r| !r.contains(SEPARATOR)));
        let links: Vec<_> = reports.iter().flat_map(|r| r.lines()).filter(|l| l.starts_with("• [")).collect();
        assert_eq!(links.len(), 200);
        assert!(links.iter().all(|l| l.ends_with(')')));
    }

    #[test]
    fn test_long_tweet_is_shortened() {
        let tweet = format!("$LONG {}", "to the moon! ".repeat(400));
        let reports = generate_report(&[project("LONG", &tweet)]);
        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert!(message_length(report) <= MAX_MESSAGE_LENGTH);
        assert!(report.contains("…\""));
        assert!(report.ends_with("[View on DexScreener](https://dexscreener.com/solana/long)"));
    }

    #[test]
    fn test_preview_keeps_short_text() {
        assert_eq!(preview("$SOL"), "$SOL");
        let cut = preview(&"ab".repeat(MAX_TWEET_CHARS));
        assert_eq!(cut.chars().count(), MAX_TWEET_CHARS + 1);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_empty_report() {
        assert_eq!(generate_report(&[]), vec!["No projects found for the requested tweets\\."]);
    }
}
