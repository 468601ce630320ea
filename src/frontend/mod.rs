//! Player-facing frontend.
//!
//! The simulation core is display-agnostic: it hands out table rows,
//! price series, and notices, and anything that can render those and
//! parse player commands can drive a game. The shipped implementation
//! is the console frontend.

pub mod console;

pub use console::ConsoleFrontend;

use crate::types::{PriceSeries, TableRow};

/// Rendering surface for the game. Implementations are synchronous; the
/// main loop calls them between ticks.
pub trait Frontend {
    /// Draw the instrument table with the day counter and cash balance.
    fn render_table(&mut self, day: u64, balance: i64, rows: &[TableRow]);

    /// Draw price-history charts for the selected instruments.
    fn render_chart(&mut self, series: &[PriceSeries]);

    /// Show an informational notice.
    fn show_notice(&mut self, title: &str, message: &str);

    /// Show an error to the player.
    fn show_error(&mut self, title: &str, message: &str);
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// A parsed player command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `buy <name> <qty>` -- name may contain spaces, quantity is last.
    Buy { name: String, quantity: String },
    /// `sell <name> <qty>`
    Sell { name: String, quantity: String },
    /// `chart <name>[,<name>...]`
    Chart { names: Vec<String> },
    /// `table` -- redraw the instrument table.
    Table,
    Help,
    Quit,
}

/// Parse errors carry the message shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command: {0} (try 'help')")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

impl std::str::FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        match verb.to_lowercase().as_str() {
            "buy" | "b" => parse_trade(rest, "buy <name> <quantity>")
                .map(|(name, quantity)| Command::Buy { name, quantity }),
            "sell" | "s" => parse_trade(rest, "sell <name> <quantity>")
                .map(|(name, quantity)| Command::Sell { name, quantity }),
            "chart" | "c" => {
                let names: Vec<String> = rest
                    .split(',')
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty())
                    .collect();
                if names.is_empty() {
                    return Err(CommandError::Usage("chart <name>[,<name>...]"));
                }
                Ok(Command::Chart { names })
            }
            "table" | "t" => Ok(Command::Table),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            "" => Err(CommandError::Usage("enter a command (try 'help')")),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Split a trade argument into (name, quantity). The quantity is the final
/// whitespace-delimited token so that instrument names may contain spaces.
/// The quantity string is validated later, against the same rules as the
/// trade itself.
fn parse_trade(rest: &str, usage: &'static str) -> Result<(String, String), CommandError> {
    let rest = rest.trim();
    let Some((name, quantity)) = rest.rsplit_once(char::is_whitespace) else {
        return Err(CommandError::Usage(usage));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    Ok((name.to_string(), quantity.to_string()))
}

pub const HELP_TEXT: &str = "\
Commands:
  buy <name> <qty>       buy shares at the current price
  sell <name> <qty>      sell shares at the current price
  chart <name>[,<name>]  chart price history for the named instruments
  table                  redraw the instrument table
  help                   show this message
  quit                   leave the game";

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, CommandError> {
        line.parse()
    }

    #[test]
    fn test_parse_buy_and_sell() {
        assert_eq!(
            parse("buy Aoh Electronics 10").unwrap(),
            Command::Buy { name: "Aoh Electronics".to_string(), quantity: "10".to_string() }
        );
        assert_eq!(
            parse("sell CCH 3").unwrap(),
            Command::Sell { name: "CCH".to_string(), quantity: "3".to_string() }
        );
        // Short aliases.
        assert_eq!(
            parse("b CCH 1").unwrap(),
            Command::Buy { name: "CCH".to_string(), quantity: "1".to_string() }
        );
    }

    #[test]
    fn test_parse_trade_keeps_raw_quantity() {
        // Validation happens at trade time, not parse time.
        assert_eq!(
            parse("buy CCH ten").unwrap(),
            Command::Buy { name: "CCH".to_string(), quantity: "ten".to_string() }
        );
    }

    #[test]
    fn test_parse_trade_usage_errors() {
        assert!(matches!(parse("buy"), Err(CommandError::Usage(_))));
        assert!(matches!(parse("buy CCH"), Err(CommandError::Usage(_))));
        assert!(matches!(parse("sell "), Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_parse_chart() {
        assert_eq!(
            parse("chart CCH").unwrap(),
            Command::Chart { names: vec!["CCH".to_string()] }
        );
        assert_eq!(
            parse("chart CCH, Big Brother ,Solar Prime").unwrap(),
            Command::Chart {
                names: vec![
                    "CCH".to_string(),
                    "Big Brother".to_string(),
                    "Solar Prime".to_string(),
                ]
            }
        );
        assert!(matches!(parse("chart"), Err(CommandError::Usage(_))));
        assert!(matches!(parse("chart ,,"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse("table").unwrap(), Command::Table);
        assert_eq!(parse("  HELP  ").unwrap(), Command::Help);
        assert_eq!(parse("q").unwrap(), Command::Quit);
        assert_eq!(parse("exit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_unknown_and_empty() {
        assert_eq!(
            parse("dance"),
            Err(CommandError::Unknown("dance".to_string()))
        );
        assert!(matches!(parse(""), Err(CommandError::Usage(_))));
    }
}
