//! Inclusion filters over the loaded record set.
//!
//! Filtering never touches the source records: each pass borrows from the
//! immutable dataset and returns a fresh subset, so changing a filter always
//! starts from the full data again.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::{Advisory, Dimension, KnowledgeArea, Record, Schema};

/// Allowed values for one dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Restriction {
    /// Every record passes, including ones with no value for the dimension.
    #[default]
    Any,
    /// Only records whose value is in the set pass. An empty set passes nothing.
    Only(BTreeSet<String>),
}

impl Restriction {
    pub fn only<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Restriction::Only(values.into_iter().map(Into::into).collect())
    }

    pub fn allows(&self, value: Option<&str>) -> bool {
        match self {
            Restriction::Any => true,
            Restriction::Only(set) => value.is_some_and(|v| set.contains(v)),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Restriction::Any)
    }
}

/// One restriction per filter dimension. Area values are area labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub year: Restriction,
    pub campus: Restriction,
    pub area: Restriction,
    pub program: Restriction,
}

impl Filters {
    pub fn get(&self, dimension: Dimension) -> &Restriction {
        match dimension {
            Dimension::Year => &self.year,
            Dimension::Campus => &self.campus,
            Dimension::Area => &self.area,
            Dimension::Program => &self.program,
        }
    }

    pub fn set(&mut self, dimension: Dimension, restriction: Restriction) {
        match dimension {
            Dimension::Year => self.year = restriction,
            Dimension::Campus => self.campus = restriction,
            Dimension::Area => self.area = restriction,
            Dimension::Program => self.program = restriction,
        }
    }

    /// Restrict areas by enum value rather than label.
    pub fn with_areas<I: IntoIterator<Item = KnowledgeArea>>(mut self, areas: I) -> Self {
        self.area = Restriction::only(areas.into_iter().map(KnowledgeArea::label));
        self
    }
}

/// A filtered view of the dataset plus any notices raised while filtering.
#[derive(Debug, Clone)]
pub struct FilterOutcome<'a> {
    pub records: Vec<&'a Record>,
    pub advisories: Vec<Advisory>,
}

/// Value of `record` for `dimension`, if it has one.
pub fn dimension_value(record: &Record, dimension: Dimension) -> Option<&str> {
    match dimension {
        Dimension::Year => record.year.as_deref(),
        Dimension::Campus => record.campus.as_deref(),
        Dimension::Area => Some(record.area.label()),
        Dimension::Program => Some(record.program.as_str()),
    }
}

/// Apply every restriction the schema supports.
///
/// A restriction on a column the file lacks is dropped and reported instead of
/// rejecting every record. A restriction that allows every observed value is
/// dropped too, so records with a blank cell in that column are kept.
pub fn apply_filters<'a>(records: &'a [Record], schema: &Schema, filters: &Filters) -> FilterOutcome<'a> {
    let mut advisories = Vec::new();
    let mut active: Vec<(Dimension, &Restriction)> = Vec::new();

    for dimension in Dimension::ALL {
        let restriction = filters.get(dimension);
        if restriction.is_any() {
            continue;
        }
        if !schema.supports(dimension) {
            advisories.push(Advisory::FilterIgnored(dimension));
        } else if !allows_all_observed(records, dimension, restriction) {
            active.push((dimension, restriction));
        }
    }

    let kept: Vec<&Record> = records
        .iter()
        .filter(|record| {
            active
                .iter()
                .all(|(dimension, restriction)| restriction.allows(dimension_value(record, *dimension)))
        })
        .collect();

    debug!(
        input = records.len(),
        kept = kept.len(),
        active = active.len(),
        "applied filters"
    );

    FilterOutcome {
        records: kept,
        advisories,
    }
}

fn allows_all_observed(records: &[Record], dimension: Dimension, restriction: &Restriction) -> bool {
    match restriction {
        Restriction::Any => true,
        Restriction::Only(set) => records
            .iter()
            .filter_map(|r| dimension_value(r, dimension))
            .all(|value| set.contains(value)),
    }
}

/// Distinct values of `dimension` in `records`, sorted for display.
///
/// Areas keep declaration order; years sort numerically when they parse;
/// everything else sorts lexically.
pub fn observed_values(records: &[Record], dimension: Dimension) -> Vec<String> {
    if dimension == Dimension::Area {
        let present: BTreeSet<KnowledgeArea> = records.iter().map(|r| r.area).collect();
        return present.into_iter().map(|a| a.label().to_string()).collect();
    }

    let distinct: BTreeSet<&str> = records
        .iter()
        .filter_map(|r| dimension_value(r, dimension))
        .collect();
    let mut values: Vec<String> = distinct.into_iter().map(str::to_string).collect();
    if dimension == Dimension::Year {
        values.sort_by(|a, b| numeric_aware_cmp(a, b));
    }
    values
}

/// Match user-supplied values against observed ones, ignoring case and
/// surrounding whitespace.
///
/// Returns the restriction plus the requested values nothing matched. Those
/// are still kept in the restriction, so a typo filters everything out instead
/// of silently widening the view.
pub fn resolve_requested(requested: &[String], observed: &[String]) -> (Restriction, Vec<String>) {
    if requested.is_empty() {
        return (Restriction::Any, Vec::new());
    }

    let mut allowed = BTreeSet::new();
    let mut unmatched = Vec::new();
    for raw in requested {
        let wanted = raw.trim();
        match observed.iter().find(|v| v.trim().to_uppercase() == wanted.to_uppercase()) {
            Some(found) => {
                allowed.insert(found.clone());
            }
            None => {
                unmatched.push(wanted.to_string());
                allowed.insert(wanted.to_string());
            }
        }
    }
    if unmatched.is_empty() && observed.iter().all(|v| allowed.contains(v)) {
        return (Restriction::Any, unmatched);
    }
    (Restriction::Only(allowed), unmatched)
}

fn numeric_aware_cmp(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
