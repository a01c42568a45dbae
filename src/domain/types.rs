//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while filtering and aggregating
//! - exported to JSON/CSV
//! - rendered by the CLI tables and the TUI

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Knowledge area a program of study belongs to.
///
/// Declaration order is the display order used when no other sort applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KnowledgeArea {
    #[serde(rename = "CIENCIAS AGRARIAS")]
    AgrarianSciences,
    #[serde(rename = "CIENCIAS BIOLOGICAS")]
    BiologicalSciences,
    #[serde(rename = "CIENCIAS DA SAUDE")]
    HealthSciences,
    #[serde(rename = "CIENCIAS EXATAS E DA TERRA")]
    ExactEarthSciences,
    #[serde(rename = "CIENCIAS HUMANAS")]
    HumanSciences,
    #[serde(rename = "CIENCIAS SOCIAIS APLICADAS")]
    AppliedSocialSciences,
    #[serde(rename = "ENGENHARIAS")]
    Engineering,
    #[serde(rename = "LINGUISTICA E ARTES")]
    LinguisticsArts,
    /// Fallback for programs missing from the classification table.
    #[serde(rename = "OUTROS")]
    Other,
}

impl KnowledgeArea {
    pub const ALL: [KnowledgeArea; 9] = [
        KnowledgeArea::AgrarianSciences,
        KnowledgeArea::BiologicalSciences,
        KnowledgeArea::HealthSciences,
        KnowledgeArea::ExactEarthSciences,
        KnowledgeArea::HumanSciences,
        KnowledgeArea::AppliedSocialSciences,
        KnowledgeArea::Engineering,
        KnowledgeArea::LinguisticsArts,
        KnowledgeArea::Other,
    ];

    /// Label as it appears in reports (uppercase, unaccented Portuguese).
    pub fn label(self) -> &'static str {
        match self {
            KnowledgeArea::AgrarianSciences => "CIENCIAS AGRARIAS",
            KnowledgeArea::BiologicalSciences => "CIENCIAS BIOLOGICAS",
            KnowledgeArea::HealthSciences => "CIENCIAS DA SAUDE",
            KnowledgeArea::ExactEarthSciences => "CIENCIAS EXATAS E DA TERRA",
            KnowledgeArea::HumanSciences => "CIENCIAS HUMANAS",
            KnowledgeArea::AppliedSocialSciences => "CIENCIAS SOCIAIS APLICADAS",
            KnowledgeArea::Engineering => "ENGENHARIAS",
            KnowledgeArea::LinguisticsArts => "LINGUISTICA E ARTES",
            KnowledgeArea::Other => "OUTROS",
        }
    }

    /// Kebab-case identifier accepted on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            KnowledgeArea::AgrarianSciences => "agrarian-sciences",
            KnowledgeArea::BiologicalSciences => "biological-sciences",
            KnowledgeArea::HealthSciences => "health-sciences",
            KnowledgeArea::ExactEarthSciences => "exact-earth-sciences",
            KnowledgeArea::HumanSciences => "human-sciences",
            KnowledgeArea::AppliedSocialSciences => "applied-social-sciences",
            KnowledgeArea::Engineering => "engineering",
            KnowledgeArea::LinguisticsArts => "linguistics-arts",
            KnowledgeArea::Other => "other",
        }
    }

    /// Three-letter tick label for narrow charts.
    pub fn short_label(self) -> &'static str {
        match self {
            KnowledgeArea::AgrarianSciences => "AGR",
            KnowledgeArea::BiologicalSciences => "BIO",
            KnowledgeArea::HealthSciences => "SAU",
            KnowledgeArea::ExactEarthSciences => "EXA",
            KnowledgeArea::HumanSciences => "HUM",
            KnowledgeArea::AppliedSocialSciences => "SOC",
            KnowledgeArea::Engineering => "ENG",
            KnowledgeArea::LinguisticsArts => "LET",
            KnowledgeArea::Other => "OUT",
        }
    }
}

impl fmt::Display for KnowledgeArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for KnowledgeArea {
    type Err = String;

    /// Accepts the report label, the slug, or `OTHER`, ignoring case and
    /// surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        if needle.eq_ignore_ascii_case("other") {
            return Ok(KnowledgeArea::Other);
        }
        KnowledgeArea::ALL
            .into_iter()
            .find(|area| {
                area.label().eq_ignore_ascii_case(needle) || area.slug().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| {
                let known: Vec<&str> = KnowledgeArea::ALL.iter().map(|a| a.slug()).collect();
                format!("Unknown knowledge area '{needle}'. Expected one of: {}.", known.join(", "))
            })
    }
}

/// One enrolled student, after column normalization and classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub program: String,
    pub sex: Option<String>,
    pub race: Option<String>,
    pub year: Option<String>,
    pub campus: Option<String>,
    pub area: KnowledgeArea,
}

/// Which optional columns survived normalization.
///
/// `program` is always present (its absence is fatal), so it has no flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub sex: bool,
    pub race: bool,
    pub year: bool,
    pub campus: bool,
}

impl Schema {
    /// Whether a filter dimension can be applied to this dataset.
    pub fn supports(&self, dimension: Dimension) -> bool {
        match dimension {
            Dimension::Year => self.year,
            Dimension::Campus => self.campus,
            Dimension::Area | Dimension::Program => true,
        }
    }
}

/// A filterable attribute of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Year,
    Campus,
    Area,
    Program,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Year,
        Dimension::Campus,
        Dimension::Area,
        Dimension::Program,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Dimension::Year => "Year",
            Dimension::Campus => "Campus",
            Dimension::Area => "Area",
            Dimension::Program => "Program",
        }
    }
}

/// A user-visible notice that part of the report is degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "dimension", rename_all = "snake_case")]
pub enum Advisory {
    /// No `sex` column: women and Black-women counts are reported as 0.
    SexUnavailable,
    /// No `race` column: Black-women counts are reported as 0.
    RaceUnavailable,
    /// A filter was requested on a column the file does not have.
    FilterIgnored(Dimension),
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::SexUnavailable => {
                f.write_str("Column 'sexo' not found: women and Black women breakdowns unavailable.")
            }
            Advisory::RaceUnavailable => {
                f.write_str("Column 'raca' not found: Black women breakdown unavailable.")
            }
            Advisory::FilterIgnored(dim) => write!(
                f,
                "{} filter ignored: the file has no {} column.",
                dim.display_name(),
                dim.display_name().to_lowercase()
            ),
        }
    }
}

/// Aggregated counts and ratios for one knowledge area.
///
/// Percentages are raw `0..=100` values; display precision is up to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaSummary {
    pub area: KnowledgeArea,
    pub total: u64,
    pub women_count: u64,
    pub black_women_count: u64,
    pub pct_women_of_total: f64,
    pub pct_black_women_of_total: f64,
    pub pct_black_women_of_women: f64,
}

/// Self-identification tokens counted as Black/Brown/Negro.
///
/// Tokens are stored trimmed and uppercased; membership is exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceTokens(BTreeSet<String>);

/// Reviewed default token set.
pub const DEFAULT_RACE_TOKENS: &[&str] = &[
    "PRETA", "PRETO", "NEGRA", "NEGRO", "PARDA", "PARDO", "PARDAS", "PARDOS", "PARD",
];

impl RaceTokens {
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            tokens
                .into_iter()
                .map(|t| t.as_ref().trim().to_uppercase())
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }

    /// Whether a raw race value (any case, untrimmed) is an accepted token.
    pub fn contains(&self, raw: &str) -> bool {
        self.0.contains(&raw.trim().to_uppercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for RaceTokens {
    fn default() -> Self {
        Self::from_tokens(DEFAULT_RACE_TOKENS)
    }
}
