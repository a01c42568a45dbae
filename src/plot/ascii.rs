//! ASCII bar charts for terminal output.
//!
//! This is intentionally "dumb" (fixed-width bars), optimized for:
//! - quick visual comparison of areas in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Percent metrics are scaled to a fixed 0..100 axis so charts for different
//! filters stay comparable; counts are scaled to the largest row.

use crate::report::{Metric, Summary, fmt_metric};

const LABEL_WIDTH: usize = 28;

/// Render one horizontal bar per area, sorted by `metric` (largest first).
pub fn render_bar_chart(summary: &Summary, metric: Metric, width: usize) -> String {
    let width = width.max(10);
    let mut out = String::new();
    out.push_str(metric.title());
    out.push('\n');

    if !metric.available(&summary.breakdowns) {
        out.push_str(unavailable_note(metric));
        out.push('\n');
        return out;
    }

    let rows = summary.sorted_by(metric);
    if rows.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let scale_max = match metric {
        Metric::Total => rows.iter().map(|r| metric.value(r)).fold(0.0, f64::max),
        _ => 100.0,
    };

    for row in rows {
        let filled = bar_len(metric.value(row), scale_max, width);
        let label = row.area.label();
        out.push_str(&format!(
            "{label:<LABEL_WIDTH$} |{}{}| {}\n",
            "#".repeat(filled),
            " ".repeat(width - filled),
            fmt_metric(row, metric)
        ));
    }

    out
}

/// All percentage charts, in a fixed order, separated by blank lines.
pub fn render_percentage_charts(summary: &Summary, width: usize) -> String {
    Metric::PERCENTAGES
        .iter()
        .map(|&metric| render_bar_chart(summary, metric, width))
        .collect::<Vec<_>>()
        .join("\n")
}

fn unavailable_note(metric: Metric) -> &'static str {
    match metric {
        Metric::PctWomenOfTotal => "(unavailable: the file needs a 'sexo' column)",
        _ => "(unavailable: the file needs both 'sexo' and 'raca' columns)",
    }
}

fn bar_len(value: f64, max: f64, width: usize) -> usize {
    if !(value.is_finite() && max.is_finite()) || max <= 0.0 || value <= 0.0 {
        return 0;
    }
    let u = (value / max).clamp(0.0, 1.0);
    (u * width as f64).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify_program;
    use crate::domain::{RaceTokens, Record, Schema};
    use crate::report::summarize_by_area;

    fn record(program: &str, sex: &str) -> Record {
        Record {
            program: program.to_string(),
            sex: Some(sex.to_string()),
            race: None,
            year: None,
            campus: None,
            area: classify_program(program),
        }
    }

    fn summary(schema: Schema) -> Summary {
        let records = vec![
            record("MEDICINA", "F"),
            record("MEDICINA", "F"),
            record("DIREITO", "F"),
            record("DIREITO", "M"),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        summarize_by_area(&refs, &schema, &RaceTokens::default())
    }

    #[test]
    fn chart_golden_snapshot_small() {
        let s = summary(Schema {
            sex: true,
            ..Schema::default()
        });
        let txt = render_bar_chart(&s, Metric::PctWomenOfTotal, 10);
        let expected = concat!(
            "% women of all students in the area\n",
            "CIENCIAS DA SAUDE            |##########| 100.0%\n",
            "CIENCIAS SOCIAIS APLICADAS   |#####     | 50.0%\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn total_chart_scales_to_largest_row() {
        let s = summary(Schema::default());
        let txt = render_bar_chart(&s, Metric::Total, 10);
        assert!(txt.contains("|##########| 2\n"));
    }

    #[test]
    fn unavailable_metric_renders_note() {
        let s = summary(Schema {
            sex: true,
            ..Schema::default()
        });
        let txt = render_bar_chart(&s, Metric::PctBlackWomenOfWomen, 10);
        assert!(txt.contains("needs both 'sexo' and 'raca'"));
        assert!(!txt.contains('#'));
    }

    #[test]
    fn bar_len_handles_degenerate_inputs() {
        assert_eq!(bar_len(0.0, 100.0, 10), 0);
        assert_eq!(bar_len(50.0, 0.0, 10), 0);
        assert_eq!(bar_len(f64::NAN, 100.0, 10), 0);
        assert_eq!(bar_len(150.0, 100.0, 10), 10);
    }

    #[test]
    fn percentage_charts_include_all_three() {
        let s = summary(Schema {
            sex: true,
            race: true,
            ..Schema::default()
        });
        let txt = render_percentage_charts(&s, 10);
        for metric in Metric::PERCENTAGES {
            assert!(txt.contains(metric.title()));
        }
    }
}
