//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use qoswatch_types::SchedulerKind;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for error text.
    pub error: Color,
    /// Color for healthy/connected indicators.
    pub ok: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Chart line color for the RL scheduler.
    pub rl: Color,
    /// Chart line color for the round-robin scheduler.
    pub rr: Color,
    /// Chart line color for the CQI scheduler.
    pub cqi: Color,
    /// Color palette cycled over traffic-type chart lines.
    pub series: [Color; 6],
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            error: Color::Red,
            ok: Color::Green,
            border: Color::Gray,
            rl: Color::Cyan,
            rr: Color::Magenta,
            cqi: Color::Yellow,
            series: [
                Color::Cyan,
                Color::Red,
                Color::Blue,
                Color::Yellow,
                Color::Magenta,
                Color::Gray,
            ],
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            error: Color::Red,
            ok: Color::Green,
            border: Color::DarkGray,
            rl: Color::Blue,
            rr: Color::Magenta,
            cqi: Color::DarkGray,
            series: [
                Color::Blue,
                Color::Red,
                Color::Magenta,
                Color::DarkGray,
                Color::Green,
                Color::Cyan,
            ],
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Chart line style for a scheduler
    pub fn scheduler_style(&self, kind: SchedulerKind) -> Style {
        let color = match kind {
            SchedulerKind::Rl => self.rl,
            SchedulerKind::RoundRobin => self.rr,
            SchedulerKind::Cqi => self.cqi,
        };
        Style::default().fg(color)
    }

    /// Chart line style for the n-th traffic-type series
    pub fn series_style(&self, index: usize) -> Style {
        Style::default().fg(self.series[index % self.series.len()])
    }
}
