//! Traffic view: the traffic-type catalog and per-second counts chart.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::CountSeries;

/// Render the Traffic view: catalog table on top, counts chart below.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([Constraint::Length(10), Constraint::Min(8)]).split(area);

    render_catalog(frame, app, chunks[0]);
    render_counts_chart(frame, app, chunks[1]);
}

fn render_catalog(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Traffic Types ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let Some(ref catalog) = app.catalog else {
        let message = Paragraph::new("\n  Catalog not loaded yet")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(message, area);
        return;
    };

    let header = Row::new(vec![
        Cell::from("Traffic Type"),
        Cell::from("Data Rate (Mbps)"),
        Cell::from("Latency (ms)"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = catalog
        .iter()
        .map(|(name, info)| {
            Row::new(vec![
                Cell::from(name.clone()),
                Cell::from(format!("{:.2}", info.data_rate)),
                Cell::from(format!("{:.1}", info.latency)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn render_counts_chart(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focused_scheduler;
    let title = format!(" Traffic Types Per Second ({}) [s:scheduler] ", focused.label());

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let series = app
        .counts
        .as_ref()
        .map(|counts| CountSeries::from_samples(counts.get(focused)))
        .unwrap_or_default();

    if series.is_empty() {
        let message = Paragraph::new("\n  No count samples yet")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(message, area);
        return;
    }

    // One point series per traffic type; they must outlive the datasets
    let columns: Vec<(String, Vec<(f64, f64)>)> = series
        .series
        .keys()
        .map(|ty| (ty.clone(), series.points(ty)))
        .collect();

    let datasets: Vec<Dataset> = columns
        .iter()
        .enumerate()
        .map(|(i, (ty, points))| {
            Dataset::default()
                .name(ty.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(app.theme.series_style(i))
                .data(points)
        })
        .collect();

    let x_max = series.labels.len().saturating_sub(1).max(1) as f64;
    let x_labels = vec![
        Span::raw(series.labels.first().cloned().unwrap_or_default()),
        Span::raw(series.labels.last().cloned().unwrap_or_default()),
    ];

    let y_max = (series.max_count() as f64).max(1.0);
    let y_labels = vec![
        Span::raw("0"),
        Span::raw(format!("{:.0}", y_max / 2.0)),
        Span::raw(format!("{:.0}", y_max)),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds([0.0, y_max])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}
