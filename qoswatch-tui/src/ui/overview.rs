//! Overview view: the four per-scheduler metric charts.
//!
//! A 2x2 grid of line charts (throughput, latency, packet loss, fairness),
//! each with one dataset per scheduler, all sharing the sliding time window.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use qoswatch_types::SchedulerKind;

use crate::app::App;
use crate::data::ChartMetric;

/// Render the Overview view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if app.history.is_empty() {
        render_placeholder(frame, app, area);
        return;
    }

    let rows = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(rows[0]);
    let bottom =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(rows[1]);

    render_metric_chart(frame, app, top[0], ChartMetric::Throughput);
    render_metric_chart(frame, app, top[1], ChartMetric::Latency);
    render_metric_chart(frame, app, bottom[0], ChartMetric::PacketLoss);
    render_metric_chart(frame, app, bottom[1], ChartMetric::Fairness);
}

fn render_placeholder(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Overview ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let message = Paragraph::new("\n  Waiting for the first statistics sample...")
        .style(Style::default().add_modifier(Modifier::DIM))
        .block(block);
    frame.render_widget(message, area);
}

fn render_metric_chart(frame: &mut Frame, app: &App, area: Rect, metric: ChartMetric) {
    // One point series per scheduler; they must outlive the datasets
    let series: Vec<(SchedulerKind, Vec<(f64, f64)>)> = SchedulerKind::ALL
        .iter()
        .map(|kind| (*kind, app.history.points(*kind, metric)))
        .collect();

    let datasets: Vec<Dataset> = series
        .iter()
        .map(|(kind, points)| {
            Dataset::default()
                .name(kind.short_label())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(app.theme.scheduler_style(*kind))
                .data(points)
        })
        .collect();

    let x_max = app.history.len().saturating_sub(1).max(1) as f64;
    let labels: Vec<&str> = app.history.labels().collect();
    let x_labels = vec![
        Span::raw(labels.first().copied().unwrap_or("").to_string()),
        Span::raw(labels.last().copied().unwrap_or("").to_string()),
    ];

    let (y_min, y_max) = app.history.metric_bounds(metric);
    let y_labels = vec![
        Span::raw(format_axis_value(y_min, y_max)),
        Span::raw(format_axis_value((y_min + y_max) / 2.0, y_max)),
        Span::raw(format_axis_value(y_max, y_max)),
    ];

    let title = if metric.unit().is_empty() {
        format!(" {} ", metric.title())
    } else {
        format!(" {} ({}) ", metric.title(), metric.unit())
    };

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds([y_min, y_max])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

/// Format an axis label with precision suited to the axis range.
fn format_axis_value(value: f64, scale: f64) -> String {
    if scale.abs() < 2.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.1}", value)
    }
}
