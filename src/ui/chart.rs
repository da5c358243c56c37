//! Response-time chart rendering.
//!
//! Draws the selected target's response times over the lookback window.
//! The stored series is only drawn when its tag matches the current
//! selection; between a selection change and the next fetch a
//! placeholder is shown instead.

use ratatui::{
    layout::Rect,
    style::Style,
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;

/// Render the response-time chart for the selected target.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.selected_target() {
        Some(target) => format!(" Response time: {} ", target.name),
        None => " Response time ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    // Sample index on x; probes without a response time leave gaps
    let points: Vec<(f64, f64)> = app
        .chart_series()
        .map(|series| {
            series
                .points
                .iter()
                .enumerate()
                .filter_map(|(i, p)| p.response_time_ms.map(|ms| (i as f64, ms)))
                .collect()
        })
        .unwrap_or_default();

    if points.is_empty() {
        let placeholder = Paragraph::new("No data yet.")
            .style(Style::default().fg(app.theme.unknown))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let x_max = points.last().map(|(x, _)| *x).unwrap_or(1.0).max(1.0);
    let (y_min, y_max) = y_bounds(&points);

    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(app.theme.highlight))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(vec![Span::raw("old"), Span::raw("now")])
                .style(Style::default().fg(app.theme.border)),
        )
        .y_axis(
            Axis::default()
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format!("{:.0}", y_min)),
                    Span::raw(format!("{:.0}", (y_min + y_max) / 2.0)),
                    Span::raw(format!("{:.0}", y_max)),
                ])
                .style(Style::default().fg(app.theme.border)),
        );

    frame.render_widget(chart, area);
}

/// Y bounds with ten percent headroom. A flat series gets a unit band so
/// the line never sits on the frame edge.
fn y_bounds(points: &[(f64, f64)]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (_, y) in points {
        min = min.min(*y);
        max = max.max(*y);
    }
    if (max - min).abs() < f64::EPSILON {
        return ((min - 1.0).max(0.0), max + 1.0);
    }
    let pad = (max - min) * 0.1;
    ((min - pad).max(0.0), max + pad)
}
