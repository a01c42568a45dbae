//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the aggregation code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{Advisory, AreaSummary, Record};
use crate::io::ingest::IngestedData;
use crate::io::schema::{Field, HeaderReport};
use crate::report::{Metric, Summary};

const AREA_WIDTH: usize = 28;

/// Header block: source, rows read, rows after filters.
pub fn format_run_header(ingest: &IngestedData, summary: &Summary) -> String {
    let mut out = String::new();
    out.push_str("=== Enrolled students by knowledge area ===\n");
    out.push_str(&format!("File: {}\n", ingest.source.display()));
    out.push_str(&format!(
        "Rows: read={} | loaded={} | skipped={}\n",
        ingest.rows_read,
        ingest.records.len(),
        ingest.row_errors.len()
    ));
    out.push_str(&format!("Records after filters: {}\n", summary.record_count));
    out
}

/// One line per advisory, or an empty string.
pub fn format_advisories(advisories: &[Advisory]) -> String {
    let mut out = String::new();
    for advisory in advisories {
        out.push_str(&format!("! {advisory}\n"));
    }
    out
}

/// Summary table sorted by total, largest first.
pub fn format_summary_table(summary: &Summary) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<AREA_WIDTH$} {:>7} {:>7} {:>8} {:>12} {:>10} {:>11}\n",
            "area", "total", "women", "%women", "black_women", "%bw_total", "%bw_women"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<AREA_WIDTH$} {:-<7} {:-<7} {:-<8} {:-<12} {:-<10} {:-<11}\n",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    if summary.rows.is_empty() {
        out.push_str("(no records match the current filters)\n");
        return out;
    }

    let women = summary.breakdowns.women;
    let black = summary.breakdowns.black_women;
    for row in summary.sorted_by(Metric::Total) {
        out.push_str(
            format!(
                "{:<AREA_WIDTH$} {:>7} {:>7} {:>8} {:>12} {:>10} {:>11}\n",
                truncate(row.area.label(), AREA_WIDTH),
                row.total,
                fmt_count(row.women_count, women),
                fmt_pct(row.pct_women_of_total, women),
                fmt_count(row.black_women_count, black),
                fmt_pct(row.pct_black_women_of_total, black),
                fmt_pct(row.pct_black_women_of_women, black),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// First `limit` filtered records, one per line.
pub fn format_records(records: &[&Record], limit: usize) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<32} {:<12} {:<12} {:<6} {:<16} {:<AREA_WIDTH$}\n",
            "program", "sex", "race", "year", "campus", "area"
        )
        .trim_end(),
    );
    out.push('\n');
    for r in records.iter().take(limit) {
        out.push_str(
            format!(
                "{:<32} {:<12} {:<12} {:<6} {:<16} {:<AREA_WIDTH$}\n",
                truncate(&r.program, 32),
                truncate(r.sex.as_deref().unwrap_or(""), 12),
                truncate(r.race.as_deref().unwrap_or(""), 12),
                truncate(r.year.as_deref().unwrap_or(""), 6),
                truncate(r.campus.as_deref().unwrap_or(""), 16),
                r.area.label(),
            )
            .trim_end(),
        );
        out.push('\n');
    }
    if records.len() > limit {
        out.push_str(&format!("... {} more\n", records.len() - limit));
    }
    out
}

/// Detected columns and how each internal field was resolved.
pub fn format_header_report(report: &HeaderReport) -> String {
    let mut out = String::new();
    out.push_str("Detected columns:\n");
    for (raw, canonical) in report.raw.iter().zip(&report.canonical) {
        out.push_str(&format!("  {raw:?} -> {canonical}\n"));
    }
    out.push_str("\nResolved fields:\n");
    for field in Field::ALL {
        match report.binding(field) {
            Some(b) => out.push_str(&format!("  {:<8} <- {} (column {})\n", field.name(), b.header, b.index + 1)),
            None => out.push_str(&format!(
                "  {:<8} <- (missing; tried {})\n",
                field.name(),
                field.synonyms().join(", ")
            )),
        }
    }
    out
}

/// Percentage with one decimal, or `-` when the breakdown is unavailable.
pub fn fmt_pct(value: f64, available: bool) -> String {
    if available {
        format!("{value:.1}")
    } else {
        "-".to_string()
    }
}

/// Count, or `-` when the breakdown is unavailable.
pub fn fmt_count(value: u64, available: bool) -> String {
    if available {
        value.to_string()
    } else {
        "-".to_string()
    }
}

/// Text for a single row's metric, used by charts and the TUI table.
pub fn fmt_metric(row: &AreaSummary, metric: Metric) -> String {
    match metric {
        Metric::Total => row.total.to_string(),
        _ => format!("{:.1}%", metric.value(row)),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
