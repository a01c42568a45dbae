//! Shared "view" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! loaded records -> filters -> per-area aggregation
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use tracing::{debug, warn};

use crate::cli::FilterArgs;
use crate::domain::{Dimension, RaceTokens, Record};
use crate::filter::{Filters, Restriction, apply_filters, observed_values, resolve_requested};
use crate::io::ingest::IngestedData;
use crate::report::{Summary, summarize_by_area};

/// Output of a single filter + aggregate pass.
#[derive(Debug, Clone)]
pub struct View<'a> {
    /// Records that passed every active filter.
    pub records: Vec<&'a Record>,
    /// Per-area summary. Its advisories include ignored filters first, then
    /// unavailable breakdowns.
    pub summary: Summary,
}

/// Filter the loaded records and aggregate what is left.
///
/// Always starts from the full dataset, so calling this again after a filter
/// change never depends on the previous view.
pub fn run_view<'a>(ingest: &'a IngestedData, filters: &Filters, race_tokens: &RaceTokens) -> View<'a> {
    let outcome = apply_filters(&ingest.records, &ingest.schema, filters);
    let mut summary = summarize_by_area(&outcome.records, &ingest.schema, race_tokens);

    let mut advisories = outcome.advisories;
    advisories.append(&mut summary.advisories);
    summary.advisories = advisories;

    debug!(
        records = summary.record_count,
        areas = summary.rows.len(),
        "computed view"
    );

    View {
        records: outcome.records,
        summary,
    }
}

/// Build filters from command-line values.
///
/// Year, campus, and program values are matched case-insensitively against
/// what the file actually contains. Values that match nothing are logged and
/// kept, so they still narrow the view.
pub fn filters_from_args(args: &FilterArgs, ingest: &IngestedData) -> Filters {
    let mut filters = Filters::default();

    let requested = [
        (Dimension::Year, &args.years),
        (Dimension::Campus, &args.campuses),
        (Dimension::Program, &args.programs),
    ];
    for (dimension, values) in requested {
        let observed = observed_values(&ingest.records, dimension);
        let (restriction, unmatched) = resolve_requested(values, &observed);
        for value in unmatched {
            warn!(dimension = dimension.display_name(), value = %value, "filter value not found in the file");
        }
        filters.set(dimension, restriction);
    }

    if !args.areas.is_empty() {
        filters = filters.with_areas(args.areas.iter().copied());
    }

    filters
}

/// Restriction for a checklist selection: everything selected means no
/// restriction at all.
pub fn restriction_from_selection<'s, I>(observed: &[String], selected: I) -> Restriction
where
    I: IntoIterator<Item = &'s String>,
{
    let chosen: Vec<&String> = selected.into_iter().collect();
    if chosen.len() == observed.len() && observed.iter().all(|v| chosen.contains(&v)) {
        Restriction::Any
    } else {
        Restriction::only(chosen.into_iter().cloned())
    }
}
