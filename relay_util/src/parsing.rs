use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParsingError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Missing unit after {0}")]
    MissingUnit(String),
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),
}

type Result<T> = std::result::Result<T, ParsingError>;

/// Arguments of a `/fetch` bot command. Unset fields fall back to the reconciler's defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchCommand {
    pub max_count: Option<usize>,
    pub time_range_hours: Option<f64>,
}

enum Unit {
    /// Length of one unit in minutes
    Time(f64),
    Count,
}

fn parse_unit(unit: &str) -> Option<Unit> {
    match unit {
        "m" | "min" | "mins" | "minute" | "minutes" => Some(Unit::Time(1.0)),
        "h" | "hr" | "hrs" | "hour" | "hours" => Some(Unit::Time(60.0)),
        "d" | "day" | "days" => Some(Unit::Time(1440.0)),
        "tweet" | "tweets" | "post" | "posts" => Some(Unit::Count),
        _ => None,
    }
}

/// Parse a `/fetch` command such as `/fetch 1 hr summary`, `/fetch 5 tweets 2 hours` or `/fetch 30m`.
///
/// A number followed by a time unit adds to the time range, a number followed by `tweets` or
/// `posts` sets the max count. The unit may be attached to the number. Words without a number
/// are ignored.
pub fn parse_fetch_command(text: &str) -> Result<FetchCommand> {
    let lowered = text.trim().to_lowercase();
    let mut tokens = lowered.split_whitespace().peekable();

    // 1. Command, possibly addressed to a bot as `/fetch@some_bot`
    let command = tokens.next().unwrap_or_default();
    if command.split('@').next() != Some("/fetch") {
        return Err(ParsingError::UnknownCommand(command.to_string()));
    }

    // 2. Arguments
    let mut result = FetchCommand::default();
    while let Some(token) = tokens.next() {
        let split = token
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(token.len());
        let (number, suffix) = token.split_at(split);
        if number.is_empty() {
            continue;
        }

        let unit = if !suffix.is_empty() {
            suffix.to_string()
        } else if tokens.peek().is_some_and(|next| parse_unit(next).is_some()) {
            tokens.next().unwrap_or_default().to_string()
        } else {
            return Err(ParsingError::MissingUnit(number.to_string()));
        };

        match parse_unit(&unit) {
            Some(Unit::Time(minutes)) => {
                let value: f64 = number
                    .parse()
                    .map_err(|_| ParsingError::InvalidNumber(token.to_string()))?;
                if value <= 0.0 {
                    return Err(ParsingError::InvalidNumber(token.to_string()));
                }
                *result.time_range_hours.get_or_insert(0.0) += value * minutes / 60.0;
            }
            Some(Unit::Count) => {
                let value: usize = number
                    .parse()
                    .map_err(|_| ParsingError::InvalidNumber(token.to_string()))?;
                result.max_count = Some(value);
            }
            None => return Err(ParsingError::UnknownUnit(unit)),
        }
    }
    Ok(result)
}
