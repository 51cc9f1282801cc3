//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};

/// Render the header bar with connection state and mode.
///
/// Displays: connection indicator, QoS mode, stream count, data source.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (status_icon, status_style) = if app.load_error.is_some() {
        ("●", Style::default().fg(app.theme.error))
    } else if app.stats.is_some() {
        ("●", Style::default().fg(app.theme.ok))
    } else {
        ("●", Style::default().fg(app.theme.border))
    };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", status_icon), status_style),
        Span::styled("QOSWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ QoS Mode: "),
        Span::styled(
            app.qos_mode.clone(),
            Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::styled(
            format!("{}", app.streams.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" streams │ "),
        Span::raw(app.source_description().to_string()),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Overview "),
        Line::from(" 2:Traffic "),
        Line::from(" 3:Streams "),
    ];

    let selected = match app.current_view {
        View::Overview => 0,
        View::Traffic => 1,
        View::Streams => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: time since last update, available controls, temporary status
/// messages, and load errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(ref err) = app.load_error {
        let paragraph = Paragraph::new(format!(" Error: {} | q:quit", err))
            .style(Style::default().fg(app.theme.error));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(updated) = app.last_updated {
        let controls = match app.current_view {
            View::Overview => "a:add S:stop-all m:mode e:export ?:help q:quit",
            View::Traffic => "s:scheduler a:add m:mode e:export ?:help q:quit",
            View::Streams => {
                if app.filter_active {
                    "Type to search | Enter:apply Esc:cancel"
                } else {
                    "/:search a:add x:stop S:stop-all m:mode e:export ?:help q:quit"
                }
            }
        };

        format!(
            " {} | Updated {:.1}s ago | {}",
            app.current_view.label(),
            updated.elapsed().as_secs_f64(),
            controls,
        )
    } else {
        " Waiting for first sample... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  Tab 1/2/3   Switch views"),
        Line::from("  ↑/↓ j/k     Select stream"),
        Line::from("  Esc         Close overlay"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Backend control",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  a         Add traffic stream"),
        Line::from("  x         Stop selected stream"),
        Line::from("  S         Stop all streams"),
        Line::from("  m         Switch QoS mode"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  s         Cycle charted scheduler"),
        Line::from("  /         Filter streams"),
        Line::from("  c         Clear filter"),
        Line::from("  e         Export metrics to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 26u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
