//! Exchange rate line chart widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    widgets::{Axis, Chart, Dataset, GraphType, Widget},
};

use crate::data::Rate;

/// A line chart of a rate series with an optional inspected point
///
/// Dates run along the X axis in series order; the Y axis spans
/// `[floor(min), ceil(max)]` of the plotted values.
pub struct RateChart<'a> {
    /// Points to plot, in date order
    rates: &'a [Rate],
    /// Y axis title
    currency: &'a str,
    /// Inspected point (index into rates)
    cursor: Option<usize>,
    /// Style for the line
    style: Style,
    /// Style for the inspected point marker
    marker_style: Style,
}

impl<'a> RateChart<'a> {
    pub fn new(rates: &'a [Rate], currency: &'a str) -> Self {
        Self {
            rates,
            currency,
            cursor: None,
            style: Style::default().fg(Color::Magenta),
            marker_style: Style::default().fg(Color::Yellow),
        }
    }

    pub fn cursor(mut self, pos: usize) -> Self {
        self.cursor = Some(pos);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

/// Y axis bounds: whole numbers enclosing every value
///
/// Returns `None` for an empty series. A series whose values share one
/// integer bound gets a one-unit wide axis so the line stays visible.
pub fn y_bounds(rates: &[Rate]) -> Option<(f64, f64)> {
    let first = rates.first()?.value;
    let (min, max) = rates
        .iter()
        .fold((first, first), |(lo, hi), r| (lo.min(r.value), hi.max(r.value)));

    let lo = min.floor();
    let mut hi = max.ceil();
    if hi <= lo {
        hi = lo + 1.0;
    }
    Some((lo, hi))
}

/// First, middle and last date of the series
fn x_labels(rates: &[Rate]) -> Vec<String> {
    let (Some(first), Some(last)) = (rates.first(), rates.last()) else {
        return Vec::new();
    };

    let mut labels = vec![first.date.clone()];
    if rates.len() >= 3 {
        labels.push(rates[rates.len() / 2].date.clone());
    }
    labels.push(last.date.clone());
    labels
}

fn y_labels(lo: f64, hi: f64) -> Vec<String> {
    vec![
        format!("{:.2}", lo),
        format!("{:.2}", (lo + hi) / 2.0),
        format!("{:.2}", hi),
    ]
}

impl<'a> Widget for RateChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let Some((lo, hi)) = y_bounds(self.rates) else {
            return;
        };

        let points: Vec<(f64, f64)> = self
            .rates
            .iter()
            .enumerate()
            .map(|(i, r)| (i as f64, r.value))
            .collect();
        let marker: Vec<(f64, f64)> = self
            .cursor
            .and_then(|i| points.get(i).copied())
            .into_iter()
            .collect();
        let x_max = points.len().saturating_sub(1).max(1) as f64;

        let mut datasets = vec![Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(self.style)
            .data(&points)];
        if !marker.is_empty() {
            datasets.push(
                Dataset::default()
                    .marker(Marker::Block)
                    .graph_type(GraphType::Scatter)
                    .style(self.marker_style)
                    .data(&marker),
            );
        }

        let axis_style = Style::default().fg(Color::Gray);
        Chart::new(datasets)
            .legend_position(None)
            .x_axis(
                Axis::default()
                    .style(axis_style)
                    .bounds([0.0, x_max])
                    .labels(x_labels(self.rates)),
            )
            .y_axis(
                Axis::default()
                    .title(self.currency)
                    .style(axis_style)
                    .bounds([lo, hi])
                    .labels(y_labels(lo, hi)),
            )
            .render(area, buf);
    }
}
