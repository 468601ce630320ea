//! Console renderer.
//!
//! Plain stdout output: a fixed-width instrument table and a bar chart of
//! recent closes, scaled to the series' own min/max range.

use crate::types::{group_digits, PriceSeries, TableRow};

use super::Frontend;

/// Chart rows drawn per instrument.
const CHART_HEIGHT: usize = 8;

/// Most recent closes shown per chart.
const CHART_WIDTH: usize = 60;

#[derive(Debug, Default)]
pub struct ConsoleFrontend;

impl ConsoleFrontend {
    pub fn new() -> Self {
        ConsoleFrontend
    }
}

impl Frontend for ConsoleFrontend {
    fn render_table(&mut self, day: u64, balance: i64, rows: &[TableRow]) {
        println!();
        println!("Day {day}  |  Balance: {}", group_digits(balance));
        println!("{:<22} {:<16} {:>12} {:>8} {:>10}", "Name", "Industry", "Price", "Owned", "Profit");
        println!("{}", "-".repeat(72));
        for row in rows {
            println!(
                "{:<22} {:<16} {:>12} {:>8} {:>10}",
                row.name,
                row.industry.to_string(),
                group_digits(row.price),
                row.owned,
                row.profit_cell(),
            );
        }
    }

    fn render_chart(&mut self, series: &[PriceSeries]) {
        if series.is_empty() {
            println!("No instruments selected. Use: chart <name>[,<name>...]");
            return;
        }
        for s in series {
            println!();
            println!("{} ({} closes)", s.name, s.prices.len());
            for line in render_bars(&s.prices) {
                println!("{line}");
            }
        }
    }

    fn show_notice(&mut self, title: &str, message: &str) {
        println!("[{title}] {message}");
    }

    fn show_error(&mut self, title: &str, message: &str) {
        eprintln!("[{title}] {message}");
    }
}

/// Render the last CHART_WIDTH closes as a fixed-height column chart, with
/// the high and low of the visible window labelled.
fn render_bars(prices: &[i64]) -> Vec<String> {
    let window: Vec<i64> = prices
        .iter()
        .rev()
        .take(CHART_WIDTH)
        .rev()
        .copied()
        .collect();
    let high = *window.iter().max().unwrap_or(&0);
    let low = *window.iter().min().unwrap_or(&0);
    let span = (high - low).max(1);

    let mut lines = Vec::with_capacity(CHART_HEIGHT + 1);
    for level in (0..CHART_HEIGHT).rev() {
        let label = if level == CHART_HEIGHT - 1 {
            format!("{:>10} |", group_digits(high))
        } else if level == 0 {
            format!("{:>10} |", group_digits(low))
        } else {
            format!("{:>10} |", "")
        };
        let mut line = label;
        for &price in &window {
            // Column height scaled into 1..=CHART_HEIGHT.
            let height =
                1 + ((price - low) as usize * (CHART_HEIGHT - 1)) / span as usize;
            line.push(if height > level { '#' } else { ' ' });
        }
        lines.push(line);
    }
    lines.push(format!("{:>10} +{}", "", "-".repeat(window.len())));
    lines
}
