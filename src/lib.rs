//! `enrollment-areas` library crate.
//!
//! The binary (`areas`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the CLI and the TUI share one filter + aggregate pipeline

pub mod app;
pub mod classify;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod filter;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;
