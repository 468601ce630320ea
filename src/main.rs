//! BOURSE — Single-player simulated stock-market trading game
//!
//! Entry point. Loads configuration, initialises structured logging,
//! builds the market, and runs the day-tick loop while reading player
//! commands from stdin, with graceful shutdown on Ctrl+C.

use anyhow::Result;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use bourse::config::AppConfig;
use bourse::frontend::{Command, ConsoleFrontend, Frontend, HELP_TEXT};
use bourse::news::NewsCatalog;
use bourse::sim::Simulation;
use bourse::types::{parse_quantity, GameStatus};

const BANNER: &str = r#"
 ____   ___  _   _ ____  ____  _____
| __ ) / _ \| | | |  _ \/ ___|| ____|
|  _ \| | | | | | | |_) \___ \|  _|
| |_) | |_| | |_| |  _ < ___) | |___
|____/ \___/ \___/|_| \_\____/|_____|

  Simulated Stock-Market Trading Game
  v0.1.0 — one day per tick
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise structured logging first so config warnings are visible
    init_logging();

    // Load configuration from TOML (missing file falls back to defaults)
    let cfg = AppConfig::load_or_default("config.toml")?;

    // Print startup banner
    println!("{BANNER}");
    info!(
        tick_interval_secs = cfg.game.tick_interval_secs,
        initial_balance = cfg.game.initial_balance,
        daily_expense = cfg.game.daily_expense,
        rng_seed = ?cfg.game.rng_seed,
        "BOURSE starting up"
    );

    let catalog = NewsCatalog::load(&cfg.news.file);
    let mut sim = Simulation::new(&cfg, catalog);
    let mut frontend = ConsoleFrontend::new();

    frontend.show_notice("Welcome", HELP_TEXT);
    frontend.render_table(sim.day(), sim.balance(), &sim.table_rows());

    // -- Main loop -------------------------------------------------------

    let mut interval = tokio::time::interval(Duration::from_secs(cfg.game.tick_interval_secs));
    interval.tick().await; // the first tick fires immediately; day 1 waits

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        interval_secs = cfg.game.tick_interval_secs,
        "Market open. Press Ctrl+C to stop."
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let report = sim.tick();
                info!(
                    day = report.day,
                    balance = report.balance,
                    status = %report.status,
                    "Day complete"
                );
                for bulletin in &report.bulletins {
                    frontend.show_notice("Market", &bulletin.to_string());
                }
                for flash in &report.news {
                    frontend.show_notice("News", &flash.to_string());
                }
                if report.status == GameStatus::Bankrupt {
                    frontend.show_notice(
                        "Game over",
                        "Your balance went negative. The game has ended.",
                    );
                    break;
                }
                frontend.render_table(report.day, report.balance, &sim.table_rows());
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => {
                        if !handle_command(&line, &mut sim, &mut frontend) {
                            break;
                        }
                    }
                    Ok(None) => {
                        warn!("stdin closed, continuing without player input");
                        stdin_open = false;
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read stdin, continuing without player input");
                        stdin_open = false;
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    info!(
        day = sim.day(),
        balance = sim.balance(),
        status = %sim.status(),
        "BOURSE shut down cleanly."
    );

    Ok(())
}

/// Dispatch one player command. Returns false when the player quits.
fn handle_command(line: &str, sim: &mut Simulation, frontend: &mut ConsoleFrontend) -> bool {
    if line.trim().is_empty() {
        return true;
    }
    let command: Command = match line.parse() {
        Ok(c) => c,
        Err(e) => {
            frontend.show_error("Input", &e.to_string());
            return true;
        }
    };
    match command {
        Command::Buy { name, quantity } => {
            let trade = parse_quantity(&quantity).and_then(|qty| sim.buy(&name, qty));
            match trade {
                Ok(receipt) => frontend.show_notice("Trade", &receipt.to_string()),
                Err(e) => frontend.show_error("Trade", &e.to_string()),
            }
        }
        Command::Sell { name, quantity } => {
            let trade = parse_quantity(&quantity).and_then(|qty| sim.sell(&name, qty));
            match trade {
                Ok(receipt) => frontend.show_notice("Trade", &receipt.to_string()),
                Err(e) => frontend.show_error("Trade", &e.to_string()),
            }
        }
        Command::Chart { names } => match sim.select_chart_instruments(&names) {
            Ok(()) => frontend.render_chart(&sim.chart_series()),
            Err(e) => frontend.show_error("Chart", &e.to_string()),
        },
        Command::Table => {
            frontend.render_table(sim.day(), sim.balance(), &sim.table_rows());
        }
        Command::Help => frontend.show_notice("Help", HELP_TEXT),
        Command::Quit => {
            frontend.show_notice("Goodbye", "Thanks for playing.");
            return false;
        }
    }
    true
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bourse=info"));

    let json_logging = std::env::var("BOURSE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
