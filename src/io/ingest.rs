//! CSV ingest and normalization.
//!
//! This module is responsible for turning an enrollment export into a clean,
//! classified set of `Record`s that the filter and aggregation steps can trust.
//!
//! Design goals:
//! - **One required column** (`program`): its absence is the only fatal schema error
//! - **Row-level validation** (skip unparseable rows, but report what happened)
//! - **Deterministic behavior** (records keep file order)
//! - **Separation of concerns**: no filtering or aggregation here

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::classify::{classify_program, unmatched_programs};
use crate::domain::{Record, Schema};
use crate::error::AppError;
use crate::io::schema::{ColumnMap, HeaderReport};

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: classified records + header diagnostics + row errors.
///
/// Records are immutable once loaded; every filter pass starts from them.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub source: PathBuf,
    pub headers: HeaderReport,
    pub schema: Schema,
    pub records: Vec<Record>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load and classify every row of the CSV at `path`.
pub fn load_records(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    let data = read_records(file, path.to_path_buf())?;

    info!(
        source = %path.display(),
        rows_read = data.rows_read,
        records = data.records.len(),
        row_errors = data.row_errors.len(),
        "loaded enrollment records"
    );
    Ok(data)
}

/// Read just the header row, without requiring a program column.
///
/// Backs `areas columns`, which must work on files the pipeline would reject.
pub fn read_headers(path: &Path) -> Result<HeaderReport, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    let mut reader = csv_reader(file);
    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?;
    Ok(HeaderReport::from_headers(headers.iter()))
}

/// Read and classify records from any reader.
pub fn read_records<R: Read>(source: R, label: PathBuf) -> Result<IngestedData, AppError> {
    let mut reader = csv_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let report = HeaderReport::from_headers(headers.iter());
    let columns = report.column_map()?;
    let schema = columns.schema();

    for binding in &report.bindings {
        debug!(field = binding.field.name(), header = %binding.header, "bound column");
    }
    if !schema.sex {
        warn!("no sex column found; women and Black women breakdowns unavailable");
    }
    if !schema.race {
        warn!("no race column found; Black women breakdown unavailable");
    }

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        match result {
            Ok(row) => records.push(parse_row(&row, &columns)),
            Err(e) => row_errors.push(RowError {
                line,
                message: format!("CSV parse error: {e}"),
            }),
        }
    }

    for error in &row_errors {
        warn!(line = error.line, message = %error.message, "skipped row");
    }

    let unmatched = unmatched_programs(&records);
    if !unmatched.is_empty() {
        debug!(count = unmatched.len(), programs = ?unmatched, "programs classified as OUTROS");
    }

    Ok(IngestedData {
        source: label,
        headers: report,
        schema,
        records,
        row_errors,
        rows_read,
    })
}

fn csv_reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source)
}

fn parse_row(row: &StringRecord, columns: &ColumnMap) -> Record {
    let program = get_optional(row, Some(columns.program))
        .unwrap_or_default()
        .to_string();
    let area = classify_program(&program);

    Record {
        area,
        program,
        sex: get_optional(row, columns.sex).map(str::to_string),
        race: get_optional(row, columns.race).map(str::to_string),
        year: get_optional(row, columns.year).map(normalize_year),
        campus: get_optional(row, columns.campus).map(str::to_string),
    }
}

fn get_optional(row: &StringRecord, idx: Option<usize>) -> Option<&str> {
    row.get(idx?).map(str::trim).filter(|s| !s.is_empty())
}

/// Spreadsheet exports sometimes write integral years as floats (`2025.0`).
fn normalize_year(raw: &str) -> String {
    match raw.strip_suffix(".0") {
        Some(int) if !int.is_empty() && int.chars().all(|c| c.is_ascii_digit()) => int.to_string(),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::KnowledgeArea;
    use std::io::Write;

    fn read(csv: &str) -> Result<IngestedData, AppError> {
        read_records(csv.as_bytes(), PathBuf::from("test.csv"))
    }

    #[test]
    fn reads_and_classifies_rows() {
        let data = read(
            "Curso,Sexo,Raça,Ano,Campus\n\
             MEDICINA,F,PRETA,2025,Pici\n\
             ENGENHARIA NUCLEAR,M,BRANCA,2024,Benfica\n",
        )
        .unwrap();

        assert_eq!(data.rows_read, 2);
        assert_eq!(data.records.len(), 2);
        assert!(data.schema.sex && data.schema.race && data.schema.year && data.schema.campus);

        let first = &data.records[0];
        assert_eq!(first.program, "MEDICINA");
        assert_eq!(first.area, KnowledgeArea::HealthSciences);
        assert_eq!(first.sex.as_deref(), Some("F"));
        assert_eq!(first.race.as_deref(), Some("PRETA"));
        assert_eq!(first.year.as_deref(), Some("2025"));
        assert_eq!(first.campus.as_deref(), Some("Pici"));

        assert_eq!(data.records[1].area, KnowledgeArea::Other);
    }

    #[test]
    fn missing_optional_columns_degrade_schema() {
        let data = read("nome_do_curso,genero\nFILOSOFIA,Feminino\n").unwrap();
        assert!(data.schema.sex);
        assert!(!data.schema.race);
        assert_eq!(data.records[0].race, None);
        assert_eq!(data.records[0].area, KnowledgeArea::HumanSciences);
    }

    #[test]
    fn missing_program_column_is_fatal() {
        let err = read("sexo,raca\nF,PARDA\n").unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }

    #[test]
    fn empty_cells_become_none_and_short_rows_are_tolerated() {
        let data = read("curso,sexo,raca\nMEDICINA,,PARDA\nDIREITO\n").unwrap();
        assert_eq!(data.records.len(), 2);
        assert_eq!(data.records[0].sex, None);
        assert_eq!(data.records[1].race, None);
        assert_eq!(data.records[1].area, KnowledgeArea::AppliedSocialSciences);
    }

    #[test]
    fn float_years_are_normalized() {
        assert_eq!(normalize_year("2025.0"), "2025");
        assert_eq!(normalize_year("2025.1"), "2025.1");
        assert_eq!(normalize_year(".0"), ".0");
    }

    #[test]
    fn load_records_reads_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "\u{feff}Curso,Sexo").unwrap();
        writeln!(file, "BIOLOGIA,F").unwrap();
        file.flush().unwrap();

        let data = load_records(file.path()).unwrap();
        assert_eq!(data.records.len(), 1);
        assert_eq!(data.records[0].area, KnowledgeArea::BiologicalSciences);
        assert_eq!(data.source, file.path());

        let headers = read_headers(file.path()).unwrap();
        assert_eq!(headers.canonical, vec!["curso", "sexo"]);
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = load_records(Path::new("definitely/not/here.csv")).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }
}
