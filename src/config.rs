//! Environment-driven settings.
//!
//! `.env` is loaded with `dotenvy` when present. Command-line flags always win
//! over environment values.

use std::path::{Path, PathBuf};

use crate::cli::picker::{prompt_for_csv_path, validate_csv_path};
use crate::domain::RaceTokens;
use crate::error::AppError;

/// File name of the enrollment export the tool was built around.
pub const DEFAULT_CSV: &str = "estudantes-matriculados-graduacao - Discentes Matriculados 20251.csv";

pub const ENV_CSV: &str = "AREAS_CSV";
pub const ENV_RACE_TOKENS: &str = "AREAS_RACE_TOKENS";
pub const ENV_LOG: &str = "AREAS_LOG";

/// Default tracing directive when `AREAS_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "enrollment_areas=info";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub csv: Option<PathBuf>,
    pub race_tokens: Option<RaceTokens>,
    pub log_filter: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            csv: get(ENV_CSV).map(PathBuf::from),
            race_tokens: get(ENV_RACE_TOKENS)
                .map(|raw| RaceTokens::from_tokens(raw.split(',')))
                .filter(|tokens| !tokens.is_empty()),
            log_filter: get(ENV_LOG),
        }
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// Tokens from the command line, else from the environment, else defaults.
    pub fn race_tokens(&self, cli_tokens: &[String]) -> RaceTokens {
        if !cli_tokens.is_empty() {
            return RaceTokens::from_tokens(cli_tokens);
        }
        self.race_tokens.clone().unwrap_or_default()
    }

    /// Input path resolution order: `-f`, `AREAS_CSV`, the default export name
    /// in the current directory, then an interactive picker.
    pub fn resolve_csv(&self, cli_path: Option<&Path>) -> Result<PathBuf, AppError> {
        if let Some(path) = cli_path {
            return validate_csv_path(path);
        }
        if let Some(path) = &self.csv {
            return validate_csv_path(path);
        }
        let default = Path::new(DEFAULT_CSV);
        if default.is_file() {
            return Ok(default.to_path_buf());
        }
        prompt_for_csv_path()
    }
}
