//! Date range screen UI
//!
//! Renders the date picker, the rate chart for the picked range, the inspected
//! point and a status line.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::widgets::RateChart;
use crate::app::{App, DateField, FetchStatus};
use crate::data::MAX_RANGE_DAYS;

/// Color scheme for the range screen
mod colors {
    use ratatui::style::Color;

    /// Section headers
    pub const HEADER: Color = Color::Cyan;
    /// Secondary/dimmed text
    pub const SECONDARY: Color = Color::Gray;
    /// Active picker field
    pub const SELECTED: Color = Color::Yellow;
    /// Errors and invalid ranges
    pub const ERROR: Color = Color::Red;
    /// Rate series line
    pub const SERIES: Color = Color::Green;
}

/// Renders the whole range screen
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_picker(frame, app, chunks[0]);
    render_chart(frame, app, chunks[1]);
    render_inspector(frame, app, chunks[2]);
    render_status(frame, app, chunks[3]);
}

fn date_span(label: &str, date: String, active: bool) -> Vec<Span<'static>> {
    let style = if active {
        Style::default()
            .fg(colors::SELECTED)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default()
    };
    vec![
        Span::styled(format!("{} ", label), Style::default().fg(colors::SECONDARY)),
        Span::styled(format!(" {} ", date), style),
    ]
}

/// Renders the start/end picker with the span and validity hint
fn render_picker(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = date_span(
        "Start",
        app.range.start.to_string(),
        app.active_field == DateField::Start,
    );
    spans.push(Span::raw("  -  "));
    spans.extend(date_span(
        "End",
        app.range.end.to_string(),
        app.active_field == DateField::End,
    ));

    let span_days = app.range.span_days();
    if app.fetching_enabled() {
        spans.push(Span::styled(
            format!("   {} day{}", span_days, if span_days == 1 { "" } else { "s" }),
            Style::default().fg(colors::SECONDARY),
        ));
    } else {
        spans.push(Span::styled(
            format!("   pick 1-{} days", MAX_RANGE_DAYS),
            Style::default().fg(colors::ERROR),
        ));
    }

    let block = Block::default()
        .title(" Date range ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Renders the chart, or a placeholder when there is nothing to plot
fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let mut title = format!(" {} ", app.currency());
    if app.status == FetchStatus::Loading && !app.rates.is_empty() {
        title.push_str("(updating) ");
    }
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if !app.fetching_enabled() {
        render_placeholder(
            frame,
            inner,
            format!(
                "The range must start before it ends and span at most {} days",
                MAX_RANGE_DAYS
            ),
            colors::SECONDARY,
        );
        return;
    }

    if app.rates.is_empty() {
        let (message, color) = match &app.status {
            FetchStatus::Failed(e) => (format!("Fetch failed: {}", e), colors::ERROR),
            _ => ("Loading rates...".to_string(), colors::HEADER),
        };
        render_placeholder(frame, inner, message, color);
        return;
    }

    let chart = RateChart::new(&app.rates, app.currency())
        .cursor(app.inspect_cursor)
        .style(Style::default().fg(colors::SERIES));
    frame.render_widget(chart, inner);
}

fn render_placeholder(frame: &mut Frame, area: Rect, message: String, color: Color) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(1),
            Constraint::Percentage(45),
        ])
        .split(area);

    let text = Paragraph::new(message)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center);
    frame.render_widget(text, rows[1]);
}

/// Renders the inspected point, if the chart is visible
fn render_inspector(frame: &mut Frame, app: &App, area: Rect) {
    if !app.fetching_enabled() {
        return;
    }
    let Some(rate) = app.inspected_rate() else {
        return;
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", rate.date),
            Style::default()
                .fg(colors::SELECTED)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {:.4} {}", rate.value, app.currency())),
        Span::styled(
            format!("   point {}/{}", app.inspect_cursor + 1, app.rates.len()),
            Style::default().fg(colors::SECONDARY),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Renders fetch status, cache counters and the help hint
fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let (text, color) = match &app.status {
        FetchStatus::Idle => match app.last_refresh {
            Some(at) => (format!(" Updated {}", at.format("%H:%M:%S")), colors::SECONDARY),
            None => (String::new(), colors::SECONDARY),
        },
        FetchStatus::Loading => (" Loading...".to_string(), colors::HEADER),
        FetchStatus::Failed(e) => (format!(" Fetch failed: {}", e), colors::ERROR),
    };

    let stats = app.fetch_stats();
    let counters = format!(
        "cache {}/{}  hits {}  requests {}  ? help ",
        app.cache().len(),
        app.cache().capacity(),
        stats.cache_hits,
        stats.network_requests
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(counters.len() as u16)])
        .split(area);

    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(color)),
        columns[0],
    );
    frame.render_widget(
        Paragraph::new(counters)
            .style(Style::default().fg(colors::SECONDARY))
            .alignment(Alignment::Right),
        columns[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::StartupConfig;
    use crate::data::{DateRange, Rate};
    use crate::fetcher::test_support::{date, FakeSource};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn app_for(start: chrono::NaiveDate, end: chrono::NaiveDate) -> App {
        let config = StartupConfig {
            range: DateRange::new(start, end),
            ..StartupConfig::default()
        };
        App::with_source(&config, Arc::new(FakeSource::new()))
    }

    fn render_app(app: &App) -> String {
        let backend = TestBackend::new(100, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_picker_shows_both_dates_and_span() {
        let app = app_for(date(2023, 1, 1), date(2023, 1, 4));
        let content = render_app(&app);

        assert!(content.contains("2023-01-01"));
        assert!(content.contains("2023-01-04"));
        assert!(content.contains("3 days"));
    }

    #[test]
    fn test_invalid_range_hides_chart() {
        let mut app = app_for(date(2023, 1, 1), date(2023, 1, 20));
        app.rates = vec![Rate::new(3.6, "2023-01-01")];
        let content = render_app(&app);

        assert!(content.contains("pick 1-14 days"));
        assert!(content.contains("span at most 14 days"));
        assert!(!content.contains("point 1/1"));
    }

    #[test]
    fn test_loading_placeholder_before_first_series() {
        let app = app_for(date(2023, 1, 1), date(2023, 1, 4));
        let content = render_app(&app);
        assert!(content.contains("Loading rates..."));
    }

    #[test]
    fn test_failure_without_series_shows_error() {
        let mut app = app_for(date(2023, 1, 1), date(2023, 1, 4));
        app.status = FetchStatus::Failed("failed to fetch rate for 2023-01-02".to_string());
        let content = render_app(&app);
        assert!(content.contains("Fetch failed"));
    }

    #[test]
    fn test_series_renders_chart_and_inspector() {
        let mut app = app_for(date(2023, 1, 1), date(2023, 1, 4));
        app.rates = vec![
            Rate::new(3.60, "2023-01-01"),
            Rate::new(3.62, "2023-01-02"),
            Rate::new(3.59, "2023-01-03"),
        ];
        app.inspect_cursor = 1;
        let content = render_app(&app);

        assert!(content.contains("2023-01-02"));
        assert!(content.contains("3.6200 ILS"));
        assert!(content.contains("point 2/3"));
        assert!(!content.contains("Loading rates..."));
    }

    #[test]
    fn test_status_line_shows_cache_counters() {
        let app = app_for(date(2023, 1, 1), date(2023, 1, 4));
        let content = render_app(&app);
        assert!(content.contains("cache 0/500"));
        assert!(content.contains("requests 0"));
    }

    #[test]
    fn test_series_line_uses_series_color() {
        let mut app = app_for(date(2023, 1, 1), date(2023, 1, 4));
        app.rates = vec![
            Rate::new(3.20, "2023-01-01"),
            Rate::new(3.90, "2023-01-02"),
            Rate::new(3.40, "2023-01-03"),
        ];
        let backend = TestBackend::new(100, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let braille = |cell: &ratatui::buffer::Cell| {
            cell.symbol()
                .chars()
                .any(|c| ('\u{2801}'..='\u{28FF}').contains(&c))
        };
        let line_cells: Vec<_> = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .filter(|cell| braille(cell))
            .collect();

        assert!(!line_cells.is_empty());
        assert!(line_cells.iter().any(|cell| cell.fg == colors::SERIES));
    }
}
