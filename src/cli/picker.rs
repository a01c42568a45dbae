//! Interactive CSV picker.
//!
//! Used when no input file was given on the command line or in `AREAS_CSV`
//! and the default export is not in the current directory. Lists `*.csv`
//! files under the working directory and lets the user choose one.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Directory recursion depth when looking for CSV files.
const SEARCH_DEPTH: usize = 3;

/// Prompt on stdin/stdout for a CSV file under the current directory.
pub fn prompt_for_csv_path() -> Result<PathBuf, AppError> {
    let files = find_csv_files(Path::new("."), SEARCH_DEPTH);
    if files.is_empty() {
        return Err(AppError::input(
            "No .csv files found here. Pass one with `areas -f <file.csv>` or set AREAS_CSV.",
        ));
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    pick_from(&files, stdin.lock(), stdout.lock())
}

/// Selection loop over an explicit input/output pair.
///
/// Accepts a list number, an explicit path, or `q` to cancel.
pub fn pick_from<R: BufRead, W: Write>(files: &[PathBuf], mut input: R, mut output: W) -> Result<PathBuf, AppError> {
    let io_err = |e: io::Error| AppError::input(format!("Failed to use the terminal prompt: {e}"));

    writeln!(output, "Found {} CSV file(s):", files.len()).map_err(io_err)?;
    for (idx, path) in files.iter().enumerate() {
        writeln!(output, "{:>3}) {}", idx + 1, pretty_path(path)).map_err(io_err)?;
    }

    loop {
        write!(output, "Choose a file (1-{}), type a path, or q to quit: ", files.len()).map_err(io_err)?;
        output.flush().map_err(io_err)?;

        let mut line = String::new();
        if input.read_line(&mut line).map_err(io_err)? == 0 {
            return Err(AppError::input("No file chosen."));
        }

        let answer = line.trim();
        if answer.eq_ignore_ascii_case("q") {
            return Err(AppError::input("Canceled."));
        }

        if let Ok(choice) = answer.parse::<usize>() {
            if (1..=files.len()).contains(&choice) {
                return validate_csv_path(&files[choice - 1]);
            }
            writeln!(output, "No file number {choice}.").map_err(io_err)?;
            continue;
        }

        match validate_csv_path(Path::new(answer)) {
            Ok(path) => return Ok(path),
            Err(err) => writeln!(output, "{err}").map_err(io_err)?,
        }
    }
}

/// Check that `path` is an existing `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::input(format!("CSV file not found: {}", path.display())));
    }
    if path.is_dir() {
        return Err(AppError::input(format!(
            "Expected a file, got a directory: {}",
            path.display()
        )));
    }
    if !has_csv_extension(path) {
        return Err(AppError::input(format!(
            "Expected a .csv file (got: {}).",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

/// `*.csv` files under `root`, sorted by display path.
pub fn find_csv_files(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut out = Vec::new();
    walk(root, 0, max_depth, &mut out);
    out.sort_by_key(|p| pretty_path(p));
    out
}

fn walk(dir: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if !should_skip_dir(&path) {
                walk(&path, depth + 1, max_depth, out);
            }
        } else if file_type.is_file() && has_csv_extension(&path) {
            out.push(path);
        }
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    matches!(name, ".git" | "target" | "node_modules" | "reports")
}

fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}
