//! Per-area aggregation: counts, subgroup counts, and ratios.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::domain::{Advisory, AreaSummary, KnowledgeArea, RaceTokens, Record, Schema};

pub mod format;

pub use format::*;

/// Which subgroup breakdowns the input columns allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Breakdowns {
    /// Requires `sex`.
    pub women: bool,
    /// Requires `sex` and `race`.
    pub black_women: bool,
}

impl Breakdowns {
    pub fn from_schema(schema: &Schema) -> Self {
        Self {
            women: schema.sex,
            black_women: schema.sex && schema.race,
        }
    }

    /// Notices for every unavailable breakdown.
    pub fn advisories(&self, schema: &Schema) -> Vec<Advisory> {
        let mut out = Vec::new();
        if !schema.sex {
            out.push(Advisory::SexUnavailable);
        }
        if !schema.race {
            out.push(Advisory::RaceUnavailable);
        }
        out
    }
}

/// Aggregated view of a filtered record set.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Number of records after filtering.
    pub record_count: usize,
    /// One row per area present, in area declaration order.
    pub rows: Vec<AreaSummary>,
    pub breakdowns: Breakdowns,
    pub advisories: Vec<Advisory>,
}

/// A numeric column of `AreaSummary` that can be charted or sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Total,
    PctWomenOfTotal,
    PctBlackWomenOfTotal,
    PctBlackWomenOfWomen,
}

impl Metric {
    pub const PERCENTAGES: [Metric; 3] = [
        Metric::PctWomenOfTotal,
        Metric::PctBlackWomenOfTotal,
        Metric::PctBlackWomenOfWomen,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Metric::Total => "Enrolled students per area",
            Metric::PctWomenOfTotal => "% women of all students in the area",
            Metric::PctBlackWomenOfTotal => "% Black women of all students in the area",
            Metric::PctBlackWomenOfWomen => "% Black women of the women in the area",
        }
    }

    pub fn value(self, row: &AreaSummary) -> f64 {
        match self {
            Metric::Total => row.total as f64,
            Metric::PctWomenOfTotal => row.pct_women_of_total,
            Metric::PctBlackWomenOfTotal => row.pct_black_women_of_total,
            Metric::PctBlackWomenOfWomen => row.pct_black_women_of_women,
        }
    }

    /// Whether the metric can be computed with the given breakdowns.
    pub fn available(self, breakdowns: &Breakdowns) -> bool {
        match self {
            Metric::Total => true,
            Metric::PctWomenOfTotal => breakdowns.women,
            Metric::PctBlackWomenOfTotal | Metric::PctBlackWomenOfWomen => breakdowns.black_women,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Metric::Total => Metric::PctWomenOfTotal,
            Metric::PctWomenOfTotal => Metric::PctBlackWomenOfTotal,
            Metric::PctBlackWomenOfTotal => Metric::PctBlackWomenOfWomen,
            Metric::PctBlackWomenOfWomen => Metric::Total,
        }
    }
}

/// Female when the trimmed, uppercased value starts with `F`
/// (`F`, `FEM`, `Feminino`, ...).
pub fn is_woman(sex: Option<&str>) -> bool {
    sex.is_some_and(|s| s.trim().to_uppercase().starts_with('F'))
}

/// `numerator / denominator * 100`, or 0 when the denominator is 0.
pub fn percent(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

#[derive(Default)]
struct Counts {
    total: u64,
    women: u64,
    black_women: u64,
}

/// Group `records` by area and compute counts and ratios.
pub fn summarize_by_area(records: &[&Record], schema: &Schema, race_tokens: &RaceTokens) -> Summary {
    let breakdowns = Breakdowns::from_schema(schema);
    let mut groups: BTreeMap<KnowledgeArea, Counts> = BTreeMap::new();

    for record in records {
        let counts = groups.entry(record.area).or_default();
        counts.total += 1;

        if !breakdowns.women || !is_woman(record.sex.as_deref()) {
            continue;
        }
        counts.women += 1;

        if breakdowns.black_women && record.race.as_deref().is_some_and(|r| race_tokens.contains(r)) {
            counts.black_women += 1;
        }
    }

    let rows: Vec<AreaSummary> = groups
        .into_iter()
        .map(|(area, c)| AreaSummary {
            area,
            total: c.total,
            women_count: c.women,
            black_women_count: c.black_women,
            pct_women_of_total: percent(c.women, c.total),
            pct_black_women_of_total: percent(c.black_women, c.total),
            pct_black_women_of_women: percent(c.black_women, c.women),
        })
        .collect();

    debug!(records = records.len(), areas = rows.len(), "aggregated by area");

    Summary {
        record_count: records.len(),
        rows,
        breakdowns,
        advisories: breakdowns.advisories(schema),
    }
}

impl Summary {
    /// Rows sorted by `metric`, largest first. Ties keep area order.
    pub fn sorted_by(&self, metric: Metric) -> Vec<&AreaSummary> {
        let mut rows: Vec<&AreaSummary> = self.rows.iter().collect();
        rows.sort_by(|a, b| {
            metric
                .value(b)
                .partial_cmp(&metric.value(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rows
    }

    /// The metric computed over all areas combined.
    pub fn overall(&self, metric: Metric) -> f64 {
        let total: u64 = self.rows.iter().map(|r| r.total).sum();
        let women: u64 = self.rows.iter().map(|r| r.women_count).sum();
        let black_women: u64 = self.rows.iter().map(|r| r.black_women_count).sum();
        match metric {
            Metric::Total => total as f64,
            Metric::PctWomenOfTotal => percent(women, total),
            Metric::PctBlackWomenOfTotal => percent(black_women, total),
            Metric::PctBlackWomenOfWomen => percent(black_women, women),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify_program;

    fn record(program: &str, sex: Option<&str>, race: Option<&str>) -> Record {
        Record {
            program: program.to_string(),
            sex: sex.map(str::to_string),
            race: race.map(str::to_string),
            year: None,
            campus: None,
            area: classify_program(program),
        }
    }

    fn full_schema() -> Schema {
        Schema {
            sex: true,
            race: true,
            year: false,
            campus: false,
        }
    }

    fn summarize(records: &[Record], schema: &Schema) -> Summary {
        let refs: Vec<&Record> = records.iter().collect();
        summarize_by_area(&refs, schema, &RaceTokens::default())
    }

    #[test]
    fn medicine_scenario_counts_and_ratios() {
        let records = vec![
            record("MEDICINA", Some("F"), Some("PRETA")),
            record("MEDICINA", Some("M"), Some("BRANCA")),
        ];
        let summary = summarize(&records, &full_schema());

        assert_eq!(summary.record_count, 2);
        assert_eq!(summary.rows.len(), 1);
        let row = &summary.rows[0];
        assert_eq!(row.area, KnowledgeArea::HealthSciences);
        assert_eq!(row.area.label(), "CIENCIAS DA SAUDE");
        assert_eq!(row.total, 2);
        assert_eq!(row.women_count, 1);
        assert_eq!(row.black_women_count, 1);
        assert!((row.pct_women_of_total - 50.0).abs() < 1e-9);
        assert!((row.pct_black_women_of_total - 50.0).abs() < 1e-9);
        assert!((row.pct_black_women_of_women - 100.0).abs() < 1e-9);
        assert!(summary.advisories.is_empty());
    }

    #[test]
    fn prefix_sex_and_mixed_case_race_are_counted() {
        let records = vec![record("FILOSOFIA", Some("Feminino"), Some("Parda"))];
        let summary = summarize(&records, &full_schema());
        let row = &summary.rows[0];
        assert_eq!(row.area, KnowledgeArea::HumanSciences);
        assert_eq!(row.women_count, 1);
        assert_eq!(row.black_women_count, 1);
    }

    #[test]
    fn unlisted_program_is_grouped_under_other() {
        let records = vec![record("ENGENHARIA NUCLEAR", None, None)];
        let summary = summarize(&records, &full_schema());
        assert_eq!(summary.rows[0].area, KnowledgeArea::Other);
        assert_eq!(summary.rows[0].total, 1);
    }

    #[test]
    fn missing_race_column_zeroes_black_women_only() {
        let schema = Schema {
            race: false,
            ..full_schema()
        };
        let records = vec![
            record("MEDICINA", Some("F"), None),
            record("MEDICINA", Some("M"), None),
            record("DIREITO", Some("fem"), None),
        ];
        let summary = summarize(&records, &schema);

        assert!(summary.breakdowns.women);
        assert!(!summary.breakdowns.black_women);
        assert_eq!(summary.advisories, vec![Advisory::RaceUnavailable]);
        for row in &summary.rows {
            assert_eq!(row.black_women_count, 0);
            assert_eq!(row.pct_black_women_of_total, 0.0);
            assert_eq!(row.pct_black_women_of_women, 0.0);
        }
        let health = summary
            .rows
            .iter()
            .find(|r| r.area == KnowledgeArea::HealthSciences)
            .unwrap();
        assert_eq!(health.women_count, 1);
        assert!((health.pct_women_of_total - 50.0).abs() < 1e-9);
    }

    #[test]
    fn race_values_are_ignored_when_the_column_is_absent() {
        // A stray value cannot leak into the counts if the schema says the
        // column does not exist.
        let schema = Schema {
            race: false,
            ..full_schema()
        };
        let records = vec![record("MEDICINA", Some("F"), Some("PRETA"))];
        let summary = summarize(&records, &schema);
        assert_eq!(summary.rows[0].black_women_count, 0);
    }

    #[test]
    fn missing_sex_column_zeroes_all_subgroups() {
        let schema = Schema {
            sex: false,
            ..full_schema()
        };
        let records = vec![record("MEDICINA", Some("F"), Some("PRETA"))];
        let summary = summarize(&records, &schema);
        assert_eq!(summary.rows[0].women_count, 0);
        assert_eq!(summary.rows[0].black_women_count, 0);
        assert!(!summary.breakdowns.women);
        assert!(!summary.breakdowns.black_women);
        assert_eq!(summary.advisories, vec![Advisory::SexUnavailable]);
        assert!(summary.advisories[0].to_string().contains("Black women"));
    }

    #[test]
    fn empty_input_yields_no_rows() {
        let summary = summarize(&[], &full_schema());
        assert!(summary.rows.is_empty());
        assert_eq!(summary.record_count, 0);
        assert_eq!(summary.overall(Metric::PctWomenOfTotal), 0.0);
    }

    #[test]
    fn zero_denominators_yield_zero() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(3, 0), 0.0);

        let records = vec![record("MEDICINA", Some("M"), Some("PRETA"))];
        let summary = summarize(&records, &full_schema());
        let row = &summary.rows[0];
        assert_eq!(row.women_count, 0);
        assert_eq!(row.pct_black_women_of_women, 0.0);
        assert!(!row.pct_black_women_of_women.is_nan());
    }

    #[test]
    fn subgroup_counts_are_bounded_by_their_parents() {
        let records = vec![
            record("MEDICINA", Some("F"), Some("PRETA")),
            record("MEDICINA", Some("F"), Some("BRANCA")),
            record("MEDICINA", None, Some("PARDA")),
            record("DIREITO", Some("M"), Some("NEGRO")),
            record("DIREITO", Some(" f "), Some(" negra ")),
            record("ARTES", Some("X"), None),
        ];
        let summary = summarize(&records, &full_schema());
        for row in &summary.rows {
            assert!(row.women_count <= row.total);
            assert!(row.black_women_count <= row.women_count);
            for metric in Metric::PERCENTAGES {
                let v = metric.value(row);
                assert!((0.0..=100.0).contains(&v), "{metric:?} = {v}");
            }
        }
        let law = summary
            .rows
            .iter()
            .find(|r| r.area == KnowledgeArea::AppliedSocialSciences)
            .unwrap();
        assert_eq!(law.women_count, 1);
        assert_eq!(law.black_women_count, 1);
    }

    #[test]
    fn custom_race_tokens_replace_the_defaults() {
        let records = vec![record("MEDICINA", Some("F"), Some("PARDA"))];
        let refs: Vec<&Record> = records.iter().collect();
        let summary = summarize_by_area(&refs, &full_schema(), &RaceTokens::from_tokens(["PRETA"]));
        assert_eq!(summary.rows[0].black_women_count, 0);
    }

    #[test]
    fn sorted_by_orders_descending_and_overall_pools_rows() {
        let records = vec![
            record("MEDICINA", Some("F"), None),
            record("DIREITO", Some("M"), None),
            record("DIREITO", Some("F"), None),
            record("DIREITO", Some("M"), None),
        ];
        let summary = summarize(&records, &full_schema());
        let by_total: Vec<KnowledgeArea> = summary.sorted_by(Metric::Total).iter().map(|r| r.area).collect();
        assert_eq!(
            by_total,
            vec![KnowledgeArea::AppliedSocialSciences, KnowledgeArea::HealthSciences]
        );
        let by_women: Vec<KnowledgeArea> = summary
            .sorted_by(Metric::PctWomenOfTotal)
            .iter()
            .map(|r| r.area)
            .collect();
        assert_eq!(
            by_women,
            vec![KnowledgeArea::HealthSciences, KnowledgeArea::AppliedSocialSciences]
        );
        assert!((summary.overall(Metric::PctWomenOfTotal) - 50.0).abs() < 1e-9);
        assert_eq!(summary.overall(Metric::Total), 4.0);
    }

    #[test]
    fn is_woman_prefix_rules() {
        assert!(is_woman(Some("F")));
        assert!(is_woman(Some(" feminino ")));
        assert!(is_woman(Some("FEM")));
        assert!(!is_woman(Some("M")));
        assert!(!is_woman(Some("")));
        assert!(!is_woman(None));
    }
}
