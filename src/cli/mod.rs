//! Command-line parsing for the enrollment-areas reporter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the pipeline code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::KnowledgeArea;

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "areas",
    version,
    about = "Enrolled students by knowledge area: counts, women, and Black women"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the per-area summary table and percentage charts.
    Summary(SummaryArgs),
    /// Show detected columns and which ones were bound to each field.
    Columns(InputArgs),
    /// Launch the interactive TUI.
    ///
    /// Filters are toggled interactively; the summary and chart update on
    /// every change.
    Tui(TuiArgs),
}

/// Input file selection shared by every subcommand.
#[derive(Debug, Args, Clone, Default)]
pub struct InputArgs {
    /// Enrollment CSV (falls back to AREAS_CSV, the default export name, then a picker).
    #[arg(short = 'f', long = "file", value_name = "CSV")]
    pub file: Option<PathBuf>,
}

/// Inclusion filters. Each flag may be repeated; omitting it means "all".
#[derive(Debug, Args, Clone, Default)]
pub struct FilterArgs {
    /// Keep only these years.
    #[arg(long = "year", value_name = "YEAR")]
    pub years: Vec<String>,

    /// Keep only these campuses (case-insensitive).
    #[arg(long = "campus", value_name = "CAMPUS")]
    pub campuses: Vec<String>,

    /// Keep only these knowledge areas (label like "CIENCIAS DA SAUDE", slug like
    /// `health-sciences`, or OTHER).
    #[arg(long = "area", value_name = "AREA")]
    pub areas: Vec<KnowledgeArea>,

    /// Keep only these programs (case-insensitive).
    #[arg(long = "program", value_name = "PROGRAM")]
    pub programs: Vec<String>,
}

/// Output format for `areas summary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Options for `areas summary`.
#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Race values counted as Black/Brown (repeatable; replaces the defaults).
    #[arg(long = "race-token", value_name = "TOKEN")]
    pub race_tokens: Vec<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Skip the ASCII charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart bar width (columns).
    #[arg(long, default_value_t = 40)]
    pub width: usize,

    /// Also list the first N filtered records.
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub show_records: usize,

    /// Export the summary table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the filtered records to CSV.
    #[arg(long = "export-records", value_name = "CSV")]
    pub export_records: Option<PathBuf>,
}

/// Options for `areas tui`.
#[derive(Debug, Args, Clone, Default)]
pub struct TuiArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Race values counted as Black/Brown (repeatable; replaces the defaults).
    #[arg(long = "race-token", value_name = "TOKEN")]
    pub race_tokens: Vec<String>,

    /// Directory for Markdown reports written with `e`.
    #[arg(long, value_name = "DIR", default_value = "reports")]
    pub report_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn summary_parses_repeated_filters() {
        let cli = Cli::try_parse_from([
            "areas",
            "summary",
            "-f",
            "m.csv",
            "--year",
            "2024",
            "--year",
            "2025",
            "--area",
            "health-sciences",
            "--area",
            "OTHER",
            "--format",
            "json",
        ])
        .unwrap();

        let Command::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(args.input.file, Some(PathBuf::from("m.csv")));
        assert_eq!(args.filters.years, vec!["2024", "2025"]);
        assert_eq!(
            args.filters.areas,
            vec![KnowledgeArea::HealthSciences, KnowledgeArea::Other]
        );
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.width, 40);
    }

    #[test]
    fn unknown_area_is_rejected() {
        let res = Cli::try_parse_from(["areas", "summary", "--area", "astrology"]);
        assert!(res.is_err());
    }
}
