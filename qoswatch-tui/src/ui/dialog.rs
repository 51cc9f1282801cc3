//! Add-stream dialog overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;

/// Minimum width required for the dialog to render properly.
const MIN_DIALOG_WIDTH: u16 = 40;

/// Render the add-stream dialog as a centered modal.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref dialog) = app.dialog else {
        return;
    };

    if area.width < MIN_DIALOG_WIDTH || area.height < 10 {
        return;
    }

    let width = 46u16.min(area.width.saturating_sub(4));
    let height = 9u16;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let dialog_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, dialog_area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  Traffic type:  "),
            Span::raw("◀ "),
            Span::styled(
                dialog.selected_type().to_string(),
                Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" ▶"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("  User density:  "),
            Span::raw("▲ "),
            Span::styled(
                dialog.selected_density().label(),
                Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" ▼"),
        ]),
        Line::from(""),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Enter:start  Esc:cancel",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Add Traffic Stream ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    frame.render_widget(Paragraph::new(lines).block(block), dialog_area);
}
