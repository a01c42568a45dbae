//! Header canonicalization and field resolution.
//!
//! Exports of the enrollment file are not consistent about header spelling
//! (`Curso`, `Nome do Curso`, `Raça/Etnia`, ...). We canonicalize every header
//! and then bind each internal field to the first synonym present.

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::domain::Schema;
use crate::error::AppError;

/// Internal fields a column can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Program,
    Sex,
    Race,
    Year,
    Campus,
}

impl Field {
    pub const ALL: [Field; 5] = [Field::Program, Field::Sex, Field::Race, Field::Year, Field::Campus];

    pub fn name(self) -> &'static str {
        match self {
            Field::Program => "program",
            Field::Sex => "sex",
            Field::Race => "race",
            Field::Year => "year",
            Field::Campus => "campus",
        }
    }

    /// Accepted canonical headers, highest priority first.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            Field::Program => &["curso", "habilitacao", "nome", "nome_do_curso", "program"],
            Field::Sex => &["sexo", "genero", "sex"],
            Field::Race => &["raca", "raca_etinia", "raca_etnia", "race"],
            Field::Year => &["ano", "ano_matricula", "ano_ingresso", "year"],
            Field::Campus => &["campus", "unidade", "unidade_academica"],
        }
    }
}

/// Canonical form of a raw header: BOM stripped, trimmed, lowercased, spaces
/// turned into underscores, diacritics removed.
pub fn canonicalize_header(raw: &str) -> String {
    let trimmed = raw.trim_start_matches('\u{feff}').trim();
    trimmed
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

/// Column index per bound field. `program` is guaranteed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub program: usize,
    pub sex: Option<usize>,
    pub race: Option<usize>,
    pub year: Option<usize>,
    pub campus: Option<usize>,
}

impl ColumnMap {
    pub fn schema(&self) -> Schema {
        Schema {
            sex: self.sex.is_some(),
            race: self.race.is_some(),
            year: self.year.is_some(),
            campus: self.campus.is_some(),
        }
    }
}

/// A field bound to a specific header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub field: Field,
    pub header: String,
    pub index: usize,
}

/// Everything learned from the header row, including unresolved fields.
#[derive(Debug, Clone)]
pub struct HeaderReport {
    pub raw: Vec<String>,
    pub canonical: Vec<String>,
    pub bindings: Vec<Binding>,
}

impl HeaderReport {
    pub fn from_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let raw: Vec<String> = headers.into_iter().map(|h| h.as_ref().to_string()).collect();
        let canonical: Vec<String> = raw.iter().map(|h| canonicalize_header(h)).collect();

        let mut positions: HashMap<&str, usize> = HashMap::new();
        for (idx, name) in canonical.iter().enumerate() {
            positions.entry(name.as_str()).or_insert(idx);
        }

        let bindings = Field::ALL
            .into_iter()
            .filter_map(|field| {
                field.synonyms().iter().find_map(|syn| {
                    positions.get(syn).map(|&index| Binding {
                        field,
                        header: (*syn).to_string(),
                        index,
                    })
                })
            })
            .collect();

        Self {
            raw,
            canonical,
            bindings,
        }
    }

    pub fn binding(&self, field: Field) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.field == field)
    }

    fn index(&self, field: Field) -> Option<usize> {
        self.binding(field).map(|b| b.index)
    }

    /// Resolve the column map, failing if no program column was found.
    pub fn column_map(&self) -> Result<ColumnMap, AppError> {
        let program = self.index(Field::Program).ok_or_else(|| {
            AppError::input(format!(
                "The file has no recognized program column (expected one of: {}). Detected columns: {}.",
                Field::Program.synonyms().join(", "),
                self.canonical.join(", ")
            ))
        })?;

        Ok(ColumnMap {
            program,
            sex: self.index(Field::Sex),
            race: self.index(Field::Race),
            year: self.index(Field::Year),
            campus: self.index(Field::Campus),
        })
    }
}
