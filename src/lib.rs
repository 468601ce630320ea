//! BOURSE — Single-player simulated stock-market trading game
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod news;
pub mod market;
pub mod scheduler;
pub mod ledger;
pub mod sim;
pub mod frontend;
