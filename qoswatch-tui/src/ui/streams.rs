//! Streams view: active streams, the selected stream's chart, status log.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, TableState,
        Wrap,
    },
    Frame,
};

use crate::app::App;
use crate::data::streams::StreamEntry;

/// Render the Streams view: table, detail chart, status log.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Percentage(35),
        Constraint::Percentage(25),
    ])
    .split(area);

    render_table(frame, app, chunks[0]);
    render_detail(frame, app, chunks[1]);
    render_log(frame, app, chunks[2]);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let streams = app.filtered_streams();

    // Build title with filter info
    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let title = format!(
        " Active Streams ({}/{}){} ",
        streams.len(),
        app.streams.len(),
        filter_info
    );

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if streams.is_empty() {
        let message = Paragraph::new("\n  No active streams. Press 'a' to add one.")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(message, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("ID"),
        Cell::from("Type"),
        Cell::from("Density"),
        Cell::from("Pkts"),
        Cell::from("Latency"),
        Cell::from("Thrpt"),
        Cell::from("Loss"),
        Cell::from("Jitter"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = streams
        .iter()
        .map(|(_, entry)| {
            let (latency, throughput, loss, jitter) = match entry.latest {
                Some(m) => (
                    format!("{:.1} ms", m.avg_latency),
                    format!("{:.1} Mbps", m.avg_throughput),
                    format!("{:.2}%", m.avg_packet_loss),
                    format!("{:.1} ms", m.avg_jitter),
                ),
                None => ("-".into(), "-".into(), "-".into(), "-".into()),
            };

            Row::new(vec![
                Cell::from(format!("{}...", entry.short_id())),
                Cell::from(entry.traffic_type.clone()),
                Cell::from(entry.user_density.map(|d| d.label()).unwrap_or("-")),
                Cell::from(entry.packets.to_string()),
                Cell::from(latency),
                Cell::from(throughput),
                Cell::from(loss),
                Cell::from(jitter),
                Cell::from(entry.last_status.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(12),
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];

    let selected = app.selected_stream_index.min(streams.len().saturating_sub(1));

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Stream Metrics ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let Some(entry) = app.selected_stream() else {
        let message = Paragraph::new("\n  Select a stream to chart its metrics")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(message, area);
        return;
    };

    if entry.latency_window.is_empty() {
        let message = Paragraph::new("\n  No metrics received for this stream yet")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(message, area);
        return;
    }

    render_stream_chart(frame, app, area, entry, block);
}

fn render_stream_chart(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    entry: &StreamEntry,
    block: Block,
) {
    let latency = entry.latency_points();
    let throughput = entry.throughput_points();

    let datasets = vec![
        Dataset::default()
            .name("Latency (ms)")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(app.theme.rr))
            .data(&latency),
        Dataset::default()
            .name("Throughput (Mbps)")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(app.theme.rl))
            .data(&throughput),
    ];

    let x_max = latency.len().max(throughput.len()).saturating_sub(1).max(1) as f64;

    let y_max = latency
        .iter()
        .chain(throughput.iter())
        .map(|(_, y)| *y)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1.0);
    let y_max = y_max * 1.1;

    let y_labels = vec![
        Span::raw("0"),
        Span::raw(format!("{:.1}", y_max / 2.0)),
        Span::raw(format!("{:.1}", y_max)),
    ];

    let title = format!(" Stream {}... ({}) ", entry.short_id(), entry.traffic_type);

    let chart = Chart::new(datasets)
        .block(block.title(title))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds([0.0, x_max]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds([0.0, y_max])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

fn render_log(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Status Log ({}) ", app.log.len()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    // Keep the newest lines visible in the available height
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = app.log.tail(visible).map(|l| Line::from(Span::raw(l.to_string()))).collect();

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(paragraph, area);
}
