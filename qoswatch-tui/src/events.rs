use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If the add-stream dialog is open, it captures all keys
    if app.dialog.is_some() {
        handle_dialog_input(app, key);
        return;
    }

    // If filter input is active, handle text input
    if app.filter_active {
        handle_filter_input(app, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),

        // Direct view access
        KeyCode::Char('1') => app.set_view(View::Overview),
        KeyCode::Char('2') => app.set_view(View::Traffic),
        KeyCode::Char('3') => app.set_view(View::Streams),

        // Navigation (up/down for streams, left/right for tabs)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),

        // Focused scheduler for the Traffic counts chart
        KeyCode::Char('s') => app.cycle_scheduler(),

        // Stream control
        KeyCode::Char('a') => app.open_add_dialog(),
        KeyCode::Char('x') => {
            if app.current_view == View::Streams {
                app.remove_selected_stream();
            }
        }
        KeyCode::Char('S') => app.stop_all_streams(),
        KeyCode::Char('m') => app.switch_qos_mode(),

        // Filter (Streams view)
        KeyCode::Char('/') => {
            if app.current_view == View::Streams {
                app.start_filter();
            }
        }

        // Clear filter
        KeyCode::Char('c') => {
            if !app.filter_text.is_empty() {
                app.clear_filter();
            }
        }

        // Reload
        KeyCode::Char('r') => app.tick(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Export
        KeyCode::Char('e') => {
            let export_path = std::path::PathBuf::from("qoswatch_export.json");
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle key input while the add-stream dialog is open
fn handle_dialog_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_dialog(),
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Left | KeyCode::Char('h') => {
            if let Some(ref mut dialog) = app.dialog {
                dialog.prev_type();
            }
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if let Some(ref mut dialog) = app.dialog {
                dialog.next_type();
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(ref mut dialog) = app.dialog {
                dialog.prev_density();
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if let Some(ref mut dialog) = app.dialog {
                dialog.next_density();
            }
        }
        _ => {}
    }
}

/// Handle key input while filter is active
fn handle_filter_input(app: &mut App, key: KeyEvent) {
    match key.code {
        // Confirm filter
        KeyCode::Enter => {
            app.filter_active = false;
        }

        // Cancel filter (keep text but exit input mode)
        KeyCode::Esc => {
            app.cancel_filter();
        }

        // Clear and exit
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_filter();
        }

        // Backspace
        KeyCode::Backspace => {
            app.filter_pop();
            if app.filter_text.is_empty() {
                app.filter_active = false;
            }
        }

        // Type characters
        KeyCode::Char(c) => {
            app.filter_push(c);
        }

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        // Scroll wheel moves the stream selection
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        // Click on the tab row switches views
        MouseEventKind::Down(MouseButton::Left) => {
            if mouse.row == 1 {
                let col = mouse.column;
                // Approximate tab positions: Overview (0-11), Traffic (12-22), Streams (23-33)
                if col < 12 {
                    app.set_view(View::Overview);
                } else if col < 23 {
                    app.set_view(View::Traffic);
                } else if col < 34 {
                    app.set_view(View::Streams);
                }
            }
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::source::{DataSource, MetricsSnapshot};
    use crossterm::event::KeyEventState;

    #[derive(Debug)]
    struct NullSource;

    impl DataSource for NullSource {
        fn poll(&mut self) -> Option<MetricsSnapshot> {
            None
        }

        fn description(&self) -> &str {
            "null"
        }

        fn error(&self) -> Option<&str> {
            None
        }
    }

    fn test_app() -> App {
        App::new(Box::new(NullSource), &DashboardConfig::default())
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn q_quits() {
        let mut app = test_app();
        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn tab_cycles_views() {
        let mut app = test_app();
        assert_eq!(app.current_view, View::Overview);
        handle_key_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.current_view, View::Traffic);
        handle_key_event(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.current_view, View::Overview);
    }

    #[test]
    fn number_keys_jump_to_views() {
        let mut app = test_app();
        handle_key_event(&mut app, press(KeyCode::Char('3')));
        assert_eq!(app.current_view, View::Streams);
        handle_key_event(&mut app, press(KeyCode::Char('1')));
        assert_eq!(app.current_view, View::Overview);
    }

    #[test]
    fn help_swallows_next_key() {
        let mut app = test_app();
        handle_key_event(&mut app, press(KeyCode::Char('?')));
        assert!(app.show_help);
        // Any key closes help without acting
        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[test]
    fn filter_mode_captures_text() {
        let mut app = test_app();
        app.set_view(View::Streams);
        handle_key_event(&mut app, press(KeyCode::Char('/')));
        assert!(app.filter_active);

        handle_key_event(&mut app, press(KeyCode::Char('y')));
        handle_key_event(&mut app, press(KeyCode::Char('t')));
        assert_eq!(app.filter_text, "yt");

        handle_key_event(&mut app, press(KeyCode::Enter));
        assert!(!app.filter_active);
        assert_eq!(app.filter_text, "yt");

        handle_key_event(&mut app, press(KeyCode::Char('c')));
        assert!(app.filter_text.is_empty());
    }

    #[test]
    fn filter_only_starts_in_streams_view() {
        let mut app = test_app();
        handle_key_event(&mut app, press(KeyCode::Char('/')));
        assert!(!app.filter_active);
    }

    #[test]
    fn commands_without_backend_leave_status() {
        let mut app = test_app();
        handle_key_event(&mut app, press(KeyCode::Char('m')));
        assert!(app.get_status_message().is_some());
    }
}
