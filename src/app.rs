//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves settings and the input file
//! - loads and classifies records
//! - prints summaries/charts or launches the TUI
//! - writes optional exports

use std::io;

use clap::Parser;
use tracing::info;

use crate::cli::{Command, InputArgs, OutputFormat, SummaryArgs, TuiArgs};
use crate::config::Settings;
use crate::error::AppError;
use crate::logging::{LogTarget, TUI_LOG_FILE, init_logging};

pub mod pipeline;

/// Entry point for the `areas` binary.
pub fn run() -> Result<(), AppError> {
    // `areas` and `areas -f data.csv` behave like `areas tui ...`.
    //
    // Clap requires a subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    let settings = Settings::from_env();

    let target = match cli.command {
        Command::Tui(_) => LogTarget::File(TUI_LOG_FILE.into()),
        _ => LogTarget::Stderr,
    };
    init_logging(settings.log_filter(), target)?;

    match cli.command {
        Command::Summary(args) => handle_summary(args, &settings),
        Command::Columns(args) => handle_columns(args, &settings),
        Command::Tui(args) => handle_tui(args, &settings),
    }
}

fn handle_summary(args: SummaryArgs, settings: &Settings) -> Result<(), AppError> {
    let path = settings.resolve_csv(args.input.file.as_deref())?;
    let ingest = crate::io::ingest::load_records(&path)?;
    let race_tokens = settings.race_tokens(&args.race_tokens);

    let filters = pipeline::filters_from_args(&args.filters, &ingest);
    let view = pipeline::run_view(&ingest, &filters, &race_tokens);
    info!(records = view.summary.record_count, "summary ready");

    match args.format {
        OutputFormat::Json => {
            let stdout = io::stdout();
            crate::io::export::write_summary_json(stdout.lock(), &view.summary)?;
            println!();
        }
        OutputFormat::Table => {
            println!("{}", crate::report::format_run_header(&ingest, &view.summary));

            let notes = crate::report::format_advisories(&view.summary.advisories);
            if !notes.is_empty() {
                println!("{notes}");
            }

            println!("{}", crate::report::format_summary_table(&view.summary));

            if !args.no_plot {
                println!(
                    "{}",
                    crate::plot::render_percentage_charts(&view.summary, args.width)
                );
            }

            if args.show_records > 0 {
                println!(
                    "{}",
                    crate::report::format_records(&view.records, args.show_records)
                );
            }
        }
    }

    // Optional exports.
    if let Some(path) = &args.export {
        crate::io::export::write_summary_csv(path, &view.summary)?;
    }
    if let Some(path) = &args.export_records {
        crate::io::export::write_records_csv(path, &view.records)?;
    }

    Ok(())
}

fn handle_columns(args: InputArgs, settings: &Settings) -> Result<(), AppError> {
    let path = settings.resolve_csv(args.file.as_deref())?;
    let report = crate::io::ingest::read_headers(&path)?;
    println!("{}", crate::report::format_header_report(&report));

    if let Err(err) = report.column_map() {
        println!("{}", err.message());
    }
    Ok(())
}

fn handle_tui(args: TuiArgs, settings: &Settings) -> Result<(), AppError> {
    // The picker prompts on a plain terminal, so resolve before raw mode.
    let path = settings.resolve_csv(args.input.file.as_deref())?;
    let ingest = crate::io::ingest::load_records(&path)?;
    let race_tokens = settings.race_tokens(&args.race_tokens);
    crate::tui::run(ingest, race_tokens, args.report_dir)
}

/// Rewrite argv so `areas` defaults to `areas tui`.
///
/// Rules:
/// - `areas`                      -> `areas tui`
/// - `areas -f data.csv ...`      -> `areas tui -f data.csv ...`
/// - `areas --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "summary" | "columns" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
