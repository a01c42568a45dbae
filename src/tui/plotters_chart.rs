//! Plotters-powered per-area bar chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only chart description.
///
/// All bars and bounds are computed outside the render call.
pub struct AreaBarChart<'a> {
    /// One bar per area: short axis label and value.
    pub bars: &'a [(&'static str, f64)],
    /// Value over all areas combined, drawn as a horizontal line.
    pub baseline: Option<f64>,
    /// Top of the y axis.
    pub y_max: f64,
    pub y_label: &'a str,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for AreaBarChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart in very small areas.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        if self.bars.is_empty() || !self.y_max.is_finite() || self.y_max <= 0.0 {
            buf.set_string(
                area.x,
                area.y,
                "No records match the current filters.",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        // Bars are centered on integer x positions so tick labels line up.
        let x0 = -0.5_f64;
        let x1 = self.bars.len() as f64 - 0.5;
        let y1 = self.y_max;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, 0.0..y1)?;

            let label_for = |v: &f64| {
                let idx = v.round();
                if (v - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                self.bars
                    .get(idx as usize)
                    .map(|(label, _)| label.to_string())
                    .unwrap_or_default()
            };

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .y_desc(self.y_label)
                .x_labels(self.bars.len())
                .y_labels(5)
                .x_label_formatter(&label_for)
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let bar_color = RGBColor(0, 255, 255); // cyan
            let baseline_color = RGBColor(255, 255, 0); // yellow

            chart.draw_series(self.bars.iter().enumerate().map(|(i, &(_, value))| {
                let center = i as f64;
                Rectangle::new(
                    [(center - 0.35, 0.0), (center + 0.35, value.max(0.0))],
                    bar_color.filled(),
                )
            }))?;

            if let Some(base) = self.baseline {
                chart.draw_series(LineSeries::new([(x0, base), (x1, base)], &baseline_color))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(v: f64) -> String {
        format!("{v:.0}")
    }

    fn render(chart: AreaBarChart<'_>, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        chart.render(area, &mut buf);
        buf
    }

    fn painted_cells(buf: &Buffer) -> usize {
        buf.content().iter().filter(|cell| cell.symbol() != " ").count()
    }

    #[test]
    fn filled_bars_paint_the_buffer() {
        let bars = [("SAU", 80.0), ("EXA", 40.0), ("SOC", 10.0)];
        let chart = AreaBarChart {
            bars: &bars,
            baseline: Some(45.0),
            y_max: 100.0,
            y_label: "%",
            fmt_y: fmt,
        };
        let buf = render(chart, 60, 20);
        assert!(painted_cells(&buf) > 0);
    }

    #[test]
    fn small_or_empty_charts_show_a_hint() {
        let bars = [("SAU", 1.0)];
        let tiny = AreaBarChart {
            bars: &bars,
            baseline: None,
            y_max: 1.0,
            y_label: "students",
            fmt_y: fmt,
        };
        let buf = render(tiny, 10, 4);
        assert_eq!(buf[(0, 0)].symbol(), "C");

        let empty = AreaBarChart {
            bars: &[],
            baseline: None,
            y_max: 1.0,
            y_label: "students",
            fmt_y: fmt,
        };
        let buf = render(empty, 60, 20);
        let first_row: String = (0..10).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert_eq!(first_row, "No records");
    }
}
