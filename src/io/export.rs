//! Export summaries and filtered records.
//!
//! Exports carry raw numbers (no rounding) so spreadsheets and downstream
//! scripts can choose their own precision.

use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::domain::Record;
use crate::error::AppError;
use crate::report::Summary;

/// Write one CSV row per area.
pub fn write_summary_csv(path: &Path, summary: &Summary) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::runtime(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    for row in &summary.rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::runtime(format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush export CSV: {e}")))?;

    info!(path = %path.display(), rows = summary.rows.len(), "wrote summary CSV");
    Ok(())
}

/// Write the filtered records (normalized fields + area) to CSV.
pub fn write_records_csv(path: &Path, records: &[&Record]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::runtime(format!("Failed to create records CSV '{}': {e}", path.display())))?;

    // Header is written even when no records pass the filters.
    writer
        .write_record(["program", "sex", "race", "year", "campus", "area"])
        .map_err(|e| AppError::runtime(format!("Failed to write records CSV header: {e}")))?;

    for r in records {
        writer
            .write_record([
                r.program.as_str(),
                r.sex.as_deref().unwrap_or(""),
                r.race.as_deref().unwrap_or(""),
                r.year.as_deref().unwrap_or(""),
                r.campus.as_deref().unwrap_or(""),
                r.area.label(),
            ])
            .map_err(|e| AppError::runtime(format!("Failed to write records CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush records CSV: {e}")))?;

    info!(path = %path.display(), rows = records.len(), "wrote records CSV");
    Ok(())
}

/// Pretty-printed JSON for the whole summary (rows, breakdowns, advisories).
pub fn write_summary_json<W: Write>(writer: W, summary: &Summary) -> Result<(), AppError> {
    serde_json::to_writer_pretty(writer, summary)
        .map_err(|e| AppError::runtime(format!("Failed to write summary JSON: {e}")))
}
