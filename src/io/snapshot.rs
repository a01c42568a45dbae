//! Markdown report snapshots of the current view.
//!
//! The TUI writes one of these on demand so a filtered view can be shared
//! without re-running the tool.

use std::fmt::Write as _;
use std::fs::{File, create_dir_all};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;

use crate::domain::Dimension;
use crate::error::AppError;
use crate::filter::{Filters, Restriction};
use crate::io::ingest::IngestedData;
use crate::report::{Metric, Summary, fmt_count, fmt_pct};

/// Render the report body. Pure, so it can be snapshot-tested.
pub fn render_markdown_report(
    ingest: &IngestedData,
    filters: &Filters,
    summary: &Summary,
    generated: DateTime<Local>,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Enrolled students by knowledge area");
    let _ = writeln!(out, "- generated: {}", generated.to_rfc3339());
    let _ = writeln!(out, "- source: {}", ingest.source.display());
    let _ = writeln!(out, "- records loaded: {}", ingest.records.len());
    let _ = writeln!(out, "- records after filters: {}", summary.record_count);

    let _ = writeln!(out);
    let _ = writeln!(out, "## Filters");
    for dimension in Dimension::ALL {
        let _ = writeln!(out, "- {}: {}", dimension.display_name(), describe(filters.get(dimension)));
    }

    if !summary.advisories.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Notes");
        for advisory in &summary.advisories {
            let _ = writeln!(out, "- {advisory}");
        }
    }

    let women = summary.breakdowns.women;
    let black = summary.breakdowns.black_women;

    let _ = writeln!(out);
    let _ = writeln!(out, "## Summary");
    let _ = writeln!(
        out,
        "| area | total | women | % women | Black women | % Black women (total) | % Black women (women) |"
    );
    let _ = writeln!(out, "| - | -: | -: | -: | -: | -: | -: |");
    for row in summary.sorted_by(Metric::Total) {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} |",
            row.area.label(),
            row.total,
            fmt_count(row.women_count, women),
            fmt_pct(row.pct_women_of_total, women),
            fmt_count(row.black_women_count, black),
            fmt_pct(row.pct_black_women_of_total, black),
            fmt_pct(row.pct_black_women_of_women, black),
        );
    }

    out
}

/// Write a timestamped report into `dir`, creating it if needed.
pub fn write_markdown_report(
    dir: &Path,
    ingest: &IngestedData,
    filters: &Filters,
    summary: &Summary,
) -> Result<PathBuf, AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::runtime(format!("Failed to create report dir '{}': {e}", dir.display())))?;

    let now = Local::now();
    let path = dir.join(format!("areas_report_{}.md", now.format("%Y%m%d_%H%M%S")));
    let body = render_markdown_report(ingest, filters, summary, now);

    let mut file = File::create(&path)
        .map_err(|e| AppError::runtime(format!("Failed to create report file: {e}")))?;
    file.write_all(body.as_bytes())
        .map_err(|e| AppError::runtime(format!("Failed to write report: {e}")))?;

    info!(path = %path.display(), "wrote markdown report");
    Ok(path)
}

fn describe(restriction: &Restriction) -> String {
    match restriction {
        Restriction::Any => "all".to_string(),
        Restriction::Only(values) if values.is_empty() => "none".to_string(),
        Restriction::Only(values) => values.iter().cloned().collect::<Vec<_>>().join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{KnowledgeArea, RaceTokens, Record};
    use crate::filter::apply_filters;
    use crate::io::ingest::read_records;
    use crate::report::summarize_by_area;
    use chrono::TimeZone;

    fn ingest() -> IngestedData {
        read_records(
            "curso,sexo\nMEDICINA,F\nDIREITO,M\n".as_bytes(),
            PathBuf::from("matriculas.csv"),
        )
        .unwrap()
    }

    #[test]
    fn report_lists_filters_notes_and_rows() {
        let data = ingest();
        let filters = Filters::default().with_areas([KnowledgeArea::HealthSciences]);
        let outcome = apply_filters(&data.records, &data.schema, &filters);
        let refs: Vec<&Record> = outcome.records;
        let summary = summarize_by_area(&refs, &data.schema, &RaceTokens::default());
        let generated = Local.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

        let md = render_markdown_report(&data, &filters, &summary, generated);

        assert!(md.starts_with("# Enrolled students by knowledge area\n"));
        assert!(md.contains("- source: matriculas.csv\n"));
        assert!(md.contains("- records after filters: 1\n"));
        assert!(md.contains("- Year: all\n"));
        assert!(md.contains("- Area: CIENCIAS DA SAUDE\n"));
        assert!(md.contains("Column 'raca' not found"));
        assert!(md.contains("| CIENCIAS DA SAUDE | 1 | 1 | 100.0 | - | - | - |\n"));
        assert!(!md.contains("CIENCIAS SOCIAIS APLICADAS |"));
    }

    #[test]
    fn write_creates_directory_and_file() {
        let data = ingest();
        let refs: Vec<&Record> = data.records.iter().collect();
        let summary = summarize_by_area(&refs, &data.schema, &RaceTokens::default());
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("reports");

        let path = write_markdown_report(&target, &data, &Filters::default(), &summary).unwrap();
        assert!(path.starts_with(&target));
        let body = std::fs::read_to_string(path).unwrap();
        assert!(body.contains("| CIENCIAS SOCIAIS APLICADAS | 1 | 0 | 0.0 | - | - | - |"));
    }

    #[test]
    fn describe_handles_empty_selection() {
        assert_eq!(describe(&Restriction::Any), "all");
        assert_eq!(describe(&Restriction::only(Vec::<String>::new())), "none");
        assert_eq!(describe(&Restriction::only(["2024", "2025"])), "2024, 2025");
    }
}
