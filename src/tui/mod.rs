//! Ratatui-based terminal UI.
//!
//! The TUI shows a filter panel (one checklist per dimension) next to the
//! per-area summary table and a bar chart of one metric. Every change to the
//! filters re-runs the filter + aggregate pass over the full dataset.

use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Row, Table, Tabs},
};
use tracing::{debug, info};

use crate::app::pipeline::{restriction_from_selection, run_view};
use crate::domain::{Dimension, RaceTokens};
use crate::error::{AppError, EXIT_RUNTIME};
use crate::filter::{Filters, observed_values};
use crate::io::ingest::IngestedData;
use crate::report::{Metric, Summary, fmt_count, fmt_pct};

mod plotters_chart;

use plotters_chart::AreaBarChart;

/// Start the TUI over already-loaded records.
pub fn run(ingest: IngestedData, race_tokens: RaceTokens, report_dir: PathBuf) -> Result<(), AppError> {
    let mut app = App::new(ingest, race_tokens, report_dir);

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(EXIT_RUNTIME, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Checklist state for one filter dimension.
struct DimensionPanel {
    dimension: Dimension,
    supported: bool,
    values: Vec<String>,
    selected: BTreeSet<String>,
    cursor: usize,
}

impl DimensionPanel {
    fn new(dimension: Dimension, ingest: &IngestedData) -> Self {
        let supported = ingest.schema.supports(dimension);
        let values = if supported {
            observed_values(&ingest.records, dimension)
        } else {
            Vec::new()
        };
        let selected = values.iter().cloned().collect();
        Self {
            dimension,
            supported,
            values,
            selected,
            cursor: 0,
        }
    }

    fn toggle_current(&mut self) {
        let Some(value) = self.values.get(self.cursor) else {
            return;
        };
        if !self.selected.remove(value) {
            self.selected.insert(value.clone());
        }
    }

    fn select_all(&mut self) {
        self.selected = self.values.iter().cloned().collect();
    }

    fn select_none(&mut self) {
        self.selected.clear();
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.values.is_empty() {
            return;
        }
        let last = self.values.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }
}

struct App {
    ingest: IngestedData,
    race_tokens: RaceTokens,
    report_dir: PathBuf,
    panels: Vec<DimensionPanel>,
    tab: usize,
    metric: Metric,
    filters: Filters,
    summary: Summary,
    status: String,
}

impl App {
    fn new(ingest: IngestedData, race_tokens: RaceTokens, report_dir: PathBuf) -> Self {
        let panels = Dimension::ALL
            .iter()
            .map(|&d| DimensionPanel::new(d, &ingest))
            .collect();
        let summary = run_view(&ingest, &Filters::default(), &race_tokens).summary;

        Self {
            ingest,
            race_tokens,
            report_dir,
            panels,
            tab: 0,
            metric: Metric::Total,
            filters: Filters::default(),
            summary,
            status: "Space toggle  a all  n none".to_string(),
        }
    }

    /// Rebuild filters from the checklists and re-run the view.
    fn recompute(&mut self) {
        let mut filters = Filters::default();
        for panel in self.panels.iter().filter(|p| p.supported) {
            filters.set(
                panel.dimension,
                restriction_from_selection(&panel.values, &panel.selected),
            );
        }

        self.summary = run_view(&self.ingest, &filters, &self.race_tokens).summary;
        self.filters = filters;
        debug!(records = self.summary.record_count, "view recomputed");
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::Right => {
                self.tab = (self.tab + 1) % self.panels.len();
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.tab = (self.tab + self.panels.len() - 1) % self.panels.len();
            }
            KeyCode::Up => self.panels[self.tab].move_cursor(-1),
            KeyCode::Down => self.panels[self.tab].move_cursor(1),
            KeyCode::PageUp => self.panels[self.tab].move_cursor(-10),
            KeyCode::PageDown => self.panels[self.tab].move_cursor(10),
            KeyCode::Char(' ') => self.update_selection(DimensionPanel::toggle_current),
            KeyCode::Char('a') => self.update_selection(DimensionPanel::select_all),
            KeyCode::Char('n') => self.update_selection(DimensionPanel::select_none),
            KeyCode::Char('m') => {
                self.metric = self.metric.next();
                self.status = format!("metric: {}", self.metric.title());
            }
            KeyCode::Char('e') => self.export_report(),
            _ => {}
        }
        false
    }

    fn update_selection(&mut self, change: fn(&mut DimensionPanel)) {
        let panel = &mut self.panels[self.tab];
        if !panel.supported {
            self.status = format!(
                "{} filter unavailable: the file has no {} column.",
                panel.dimension.display_name(),
                panel.dimension.display_name().to_lowercase()
            );
            return;
        }
        change(panel);
        let (dimension, chosen, total) = (panel.dimension, panel.selected.len(), panel.values.len());
        self.recompute();
        self.status = format!(
            "{}: {chosen}/{total} selected | {} records",
            dimension.display_name(),
            self.summary.record_count
        );
    }

    fn export_report(&mut self) {
        match crate::io::snapshot::write_markdown_report(&self.report_dir, &self.ingest, &self.filters, &self.summary)
        {
            Ok(path) => {
                info!(path = %path.display(), "exported report from tui");
                self.status = format!("Wrote report: {}", path.display());
            }
            Err(err) => {
                self.status = format!("Report export failed: {err}");
            }
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let header_height = 3 + self.summary.advisories.len() as u16;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(header_height),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("areas", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" | {}", self.ingest.source.display())),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "records: {} of {} | skipped rows: {} | metric: {}",
                self.summary.record_count,
                self.ingest.records.len(),
                self.ingest.row_errors.len(),
                self.metric.title(),
            ),
            Style::default().fg(Color::Gray),
        )));
        for advisory in &self.summary.advisories {
            lines.push(Line::from(Span::styled(
                format!("! {advisory}"),
                Style::default().fg(Color::Yellow),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::TOP | Borders::BOTTOM));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(38), Constraint::Min(0)])
            .split(area);

        self.draw_filters(frame, columns[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(self.summary.rows.len() as u16 + 3),
                Constraint::Min(0),
            ])
            .split(columns[1]);

        self.draw_table(frame, right[0]);
        self.draw_chart(frame, right[1]);
    }

    fn draw_filters(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let titles: Vec<Line> = self
            .panels
            .iter()
            .map(|p| Line::from(p.dimension.display_name()))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.tab)
            .block(Block::default().title("Filters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, chunks[0]);

        let panel = &self.panels[self.tab];
        let block = Block::default()
            .title(format!(
                "{} ({}/{})",
                panel.dimension.display_name(),
                panel.selected.len(),
                panel.values.len()
            ))
            .borders(Borders::ALL);

        if !panel.supported {
            let msg = Paragraph::new(format!(
                "No {} column in this file.",
                panel.dimension.display_name().to_lowercase()
            ))
            .style(Style::default().fg(Color::Yellow))
            .block(block);
            frame.render_widget(msg, chunks[1]);
            return;
        }

        let items: Vec<ListItem> = panel
            .values
            .iter()
            .map(|value| {
                let mark = if panel.selected.contains(value) { "[x]" } else { "[ ]" };
                ListItem::new(format!("{mark} {value}"))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(panel.cursor));
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let women = self.summary.breakdowns.women;
        let black = self.summary.breakdowns.black_women;
        let header = Row::new(["area", "total", "women", "%women", "black_w", "%bw_tot", "%bw_wom"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = self
            .summary
            .sorted_by(Metric::Total)
            .into_iter()
            .map(|row| {
                Row::new([
                    row.area.label().to_string(),
                    row.total.to_string(),
                    fmt_count(row.women_count, women),
                    fmt_pct(row.pct_women_of_total, women),
                    fmt_count(row.black_women_count, black),
                    fmt_pct(row.pct_black_women_of_total, black),
                    fmt_pct(row.pct_black_women_of_women, black),
                ])
            })
            .collect();

        let widths = [
            Constraint::Min(20),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().title("Summary by area").borders(Borders::ALL));
        frame.render_widget(table, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title(self.metric.title()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if !self.metric.available(&self.summary.breakdowns) {
            let msg = Paragraph::new("Not available: the file lacks the columns this metric needs.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }

        let (bars, y_max) = chart_bars(&self.summary, self.metric);
        let widget = AreaBarChart {
            bars: &bars,
            baseline: Some(self.summary.overall(self.metric)).filter(|_| self.metric != Metric::Total),
            y_max,
            y_label: if self.metric == Metric::Total { "students" } else { "%" },
            fmt_y: if self.metric == Metric::Total { fmt_axis_count } else { fmt_axis_pct },
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ tab  ↑/↓ move  space toggle  a all  n none  m metric  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Bars sorted by the metric, largest first, plus the y-axis top.
///
/// Percentages always use a 0..100 axis so views stay comparable.
fn chart_bars(summary: &Summary, metric: Metric) -> (Vec<(&'static str, f64)>, f64) {
    let bars: Vec<(&'static str, f64)> = summary
        .sorted_by(metric)
        .into_iter()
        .map(|row| (row.area.short_label(), metric.value(row)))
        .collect();

    let y_max = match metric {
        Metric::Total => {
            let top = bars.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
            (top * 1.05).max(1.0)
        }
        _ => 100.0,
    };

    debug!(
        metric = metric.title(),
        bars = bars.len(),
        top = bars.first().map(|(label, _)| *label).unwrap_or("-"),
        "chart data"
    );

    (bars, y_max)
}

fn fmt_axis_count(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_pct(v: f64) -> String {
    format!("{v:.0}%")
}
