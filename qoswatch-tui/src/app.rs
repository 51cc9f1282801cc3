//! Application state and navigation logic.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use chrono::Local;

use qoswatch_types::{
    SchedulerKind, StatisticsSnapshot, TrafficTypeCatalog, TrafficTypeCounts, UserDensity,
};

use crate::config::DashboardConfig;
use crate::control::{Command, ControlHandle, ControlOutcome};
use crate::data::streams::StreamEntry;
use crate::data::{build_export, MetricsHistory, StatusLog, StreamSet};
use crate::source::{DataSource, EventSource};
use crate::ui::Theme;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Per-scheduler metric charts.
    Overview,
    /// Traffic-type catalog and per-second counts.
    Traffic,
    /// Active streams, their metrics, and the status log.
    Streams,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::Traffic,
            View::Traffic => View::Streams,
            View::Streams => View::Overview,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Overview => View::Streams,
            View::Traffic => View::Overview,
            View::Streams => View::Traffic,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Traffic => "Traffic",
            View::Streams => "Streams",
        }
    }
}

/// State of the add-stream dialog overlay.
#[derive(Debug, Clone)]
pub struct AddStreamDialog {
    /// Traffic types offered by the backend catalog, in display order.
    pub traffic_types: Vec<String>,
    pub type_index: usize,
    pub density_index: usize,
}

impl AddStreamDialog {
    fn new(catalog: &TrafficTypeCatalog) -> Self {
        Self {
            traffic_types: catalog.keys().cloned().collect(),
            type_index: 0,
            density_index: 1, // medium
        }
    }

    pub fn selected_type(&self) -> &str {
        &self.traffic_types[self.type_index]
    }

    pub fn selected_density(&self) -> UserDensity {
        UserDensity::ALL[self.density_index]
    }

    pub fn next_type(&mut self) {
        self.type_index = (self.type_index + 1) % self.traffic_types.len();
    }

    pub fn prev_type(&mut self) {
        self.type_index = (self.type_index + self.traffic_types.len() - 1) % self.traffic_types.len();
    }

    pub fn next_density(&mut self) {
        self.density_index = (self.density_index + 1) % UserDensity::ALL.len();
    }

    pub fn prev_density(&mut self) {
        self.density_index =
            (self.density_index + UserDensity::ALL.len() - 1) % UserDensity::ALL.len();
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub dialog: Option<AddStreamDialog>,

    // Inputs
    source: Box<dyn DataSource>,
    events: Option<EventSource>,
    control: Option<ControlHandle>,

    // Data
    pub stats: Option<StatisticsSnapshot>,
    pub counts: Option<TrafficTypeCounts>,
    pub catalog: Option<TrafficTypeCatalog>,
    pub history: MetricsHistory,
    pub streams: StreamSet,
    pub log: StatusLog,
    pub qos_mode: String,
    pub load_error: Option<String>,
    pub last_updated: Option<Instant>,
    feed_error: Option<String>,

    // Navigation state
    pub focused_scheduler: SchedulerKind,
    pub selected_stream_index: usize,

    // Search/filter (Streams view)
    pub filter_text: String,
    pub filter_active: bool,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from the given data source.
    pub fn new(source: Box<dyn DataSource>, config: &DashboardConfig) -> Self {
        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            dialog: None,
            source,
            events: None,
            control: None,
            stats: None,
            counts: None,
            catalog: None,
            history: MetricsHistory::new(config.window),
            streams: StreamSet::new(config.window),
            log: StatusLog::new(config.log_capacity),
            qos_mode: "RL".to_string(),
            load_error: None,
            last_updated: None,
            feed_error: None,
            focused_scheduler: SchedulerKind::Rl,
            selected_stream_index: 0,
            filter_text: String::new(),
            filter_active: false,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Attach the push event feed.
    pub fn with_events(mut self, events: EventSource) -> Self {
        self.events = Some(events);
        self
    }

    /// Attach the control executor.
    pub fn with_control(mut self, control: ControlHandle) -> Self {
        self.control = Some(control);
        self
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Drain all inputs and fold them into state.
    ///
    /// Called once per frame; every input is non-blocking.
    pub fn tick(&mut self) {
        self.ingest_snapshot();
        self.ingest_events();
        self.ingest_outcomes();
        self.clamp_selection();
    }

    fn ingest_snapshot(&mut self) {
        if let Some(snapshot) = self.source.poll() {
            let label = Local::now().format("%H:%M:%S").to_string();
            self.history.record(&snapshot.stats, label);
            self.stats = Some(snapshot.stats);
            self.counts = Some(snapshot.counts);
            if snapshot.catalog.is_some() {
                self.catalog = snapshot.catalog;
            }
            self.last_updated = Some(Instant::now());
            self.load_error = None;
        } else if let Some(err) = self.source.error() {
            self.load_error = Some(err.to_string());
        }
    }

    fn ingest_events(&mut self) {
        let Some(ref mut events) = self.events else {
            return;
        };

        for event in events.poll() {
            if let Some(ref mode) = event.qos_mode {
                self.qos_mode = mode.clone();
            }
            let line = self.streams.apply(&event);
            self.log.push(line);
        }

        // Report a feed error once, not every frame
        let error = events.last_error();
        if error != self.feed_error {
            if let Some(ref message) = error {
                self.log.push(format!("Event feed: {}", message));
            }
            self.feed_error = error;
        }
    }

    fn ingest_outcomes(&mut self) {
        // Drain first so the control borrow ends before state mutation
        let outcomes = match self.control {
            Some(ref mut control) => control.poll(),
            None => return,
        };

        for outcome in outcomes {
            match outcome {
                ControlOutcome::StreamStarted { stream_id, traffic_type, user_density } => {
                    self.streams.register(stream_id, traffic_type.clone(), user_density);
                    let message = format!(
                        "Started new {} stream with {} density",
                        traffic_type,
                        user_density.label()
                    );
                    self.log.push(message.clone());
                    self.set_status_message(message);
                }
                ControlOutcome::StreamRejected { status } => {
                    let message = format!("Stream not started: {}", status);
                    self.log.push(message.clone());
                    self.set_status_message(message);
                }
                ControlOutcome::StreamRemoved { stream_id } => {
                    self.streams.remove(&stream_id);
                    let short: String = stream_id.chars().take(8).collect();
                    self.log.push(format!("Stopped stream {}...", short));
                }
                ControlOutcome::AllStopped => {
                    self.streams.clear();
                    self.log.push("All streams stopped".to_string());
                    self.set_status_message("All streams stopped".to_string());
                }
                ControlOutcome::ModeSwitched { mode } => {
                    self.qos_mode = mode.clone();
                    let message = format!("Switched QoS mode to: {}", mode);
                    self.log.push(message.clone());
                    self.set_status_message(message);
                }
                ControlOutcome::Failed { action, error } => {
                    let message = format!("Error: {}: {}", action, error);
                    self.log.push(message.clone());
                    self.set_status_message(message);
                }
            }
        }
    }

    fn clamp_selection(&mut self) {
        let count = self.filtered_streams().len();
        if self.selected_stream_index >= count {
            self.selected_stream_index = count.saturating_sub(1);
        }
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Cycle which scheduler the Traffic view charts.
    pub fn cycle_scheduler(&mut self) {
        self.focused_scheduler = self.focused_scheduler.next();
    }

    /// Move stream selection down by one item.
    pub fn select_next(&mut self) {
        let count = self.filtered_streams().len();
        if count > 0 {
            self.selected_stream_index = (self.selected_stream_index + 1).min(count - 1);
        }
    }

    /// Move stream selection up by one item.
    pub fn select_prev(&mut self) {
        self.selected_stream_index = self.selected_stream_index.saturating_sub(1);
    }

    /// Streams matching the current filter, with their raw indices.
    pub fn filtered_streams(&self) -> Vec<(usize, &StreamEntry)> {
        self.streams
            .iter()
            .enumerate()
            .filter(|(_, e)| self.matches_filter(e))
            .collect()
    }

    /// The currently selected stream, honoring the filter.
    pub fn selected_stream(&self) -> Option<&StreamEntry> {
        self.filtered_streams()
            .get(self.selected_stream_index)
            .map(|(_, e)| *e)
    }

    fn matches_filter(&self, entry: &StreamEntry) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        let needle = self.filter_text.to_lowercase();
        entry.traffic_type.to_lowercase().contains(&needle)
            || entry.stream_id.to_lowercase().contains(&needle)
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
    }

    /// Open the add-stream dialog, if the catalog has arrived.
    pub fn open_add_dialog(&mut self) {
        match self.catalog {
            Some(ref catalog) if !catalog.is_empty() => {
                self.dialog = Some(AddStreamDialog::new(catalog));
            }
            _ => {
                self.set_status_message("Traffic types not loaded yet".to_string());
            }
        }
    }

    /// Close the add-stream dialog without submitting.
    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }

    /// Submit the add-stream dialog.
    pub fn submit_dialog(&mut self) {
        let Some(dialog) = self.dialog.take() else {
            return;
        };
        let traffic_type = dialog.selected_type().to_string();
        let user_density = dialog.selected_density();
        self.dispatch(Command::AddStream { user_density, traffic_type });
    }

    /// Ask the backend to stop the currently selected stream.
    pub fn remove_selected_stream(&mut self) {
        let Some(stream_id) = self.selected_stream().map(|e| e.stream_id.clone()) else {
            return;
        };
        self.dispatch(Command::RemoveStream { stream_id });
    }

    /// Ask the backend to stop every stream.
    pub fn stop_all_streams(&mut self) {
        self.dispatch(Command::StopAll);
    }

    /// Ask the backend to switch to its next scheduling mode.
    pub fn switch_qos_mode(&mut self) {
        self.dispatch(Command::SwitchMode);
    }

    fn dispatch(&mut self, command: Command) {
        match self.control {
            Some(ref control) => control.dispatch(command),
            None => {
                self.set_status_message("No control connection (replay mode)".to_string());
            }
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export accumulated metrics to a JSON file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        use std::io::Write;

        let export = build_export(&self.history, &self.streams, &self.qos_mode);
        let json = serde_json::to_string_pretty(&export)?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MetricsSnapshot;
    use qoswatch_types::{PacketStatusEvent, SchedulerStats, StreamMetrics};
    use tokio::sync::mpsc;

    /// A source fed by hand for tests.
    #[derive(Debug, Default)]
    struct FakeSource {
        queued: Vec<MetricsSnapshot>,
        error: Option<String>,
    }

    impl DataSource for FakeSource {
        fn poll(&mut self) -> Option<MetricsSnapshot> {
            if self.queued.is_empty() {
                None
            } else {
                Some(self.queued.remove(0))
            }
        }

        fn description(&self) -> &str {
            "fake"
        }

        fn error(&self) -> Option<&str> {
            self.error.as_deref()
        }
    }

    fn snapshot_with_catalog() -> MetricsSnapshot {
        let mut catalog = TrafficTypeCatalog::new();
        catalog.insert(
            "YouTube".to_string(),
            qoswatch_types::TrafficTypeInfo { data_rate: 50.0, latency: 15.0 },
        );
        MetricsSnapshot {
            stats: StatisticsSnapshot {
                rl: SchedulerStats { throughput: 10.0, ..Default::default() },
                ..Default::default()
            },
            counts: TrafficTypeCounts::default(),
            catalog: Some(catalog),
        }
    }

    fn app_with_queued(queued: Vec<MetricsSnapshot>) -> App {
        let source = FakeSource { queued, error: None };
        App::new(Box::new(source), &DashboardConfig::default())
    }

    #[test]
    fn tick_records_history_and_catalog() {
        let mut app = app_with_queued(vec![snapshot_with_catalog()]);

        app.tick();
        assert_eq!(app.history.len(), 1);
        assert!(app.stats.is_some());
        assert!(app.catalog.is_some());
        assert!(app.load_error.is_none());

        // Second tick with nothing queued leaves state alone
        app.tick();
        assert_eq!(app.history.len(), 1);
    }

    #[test]
    fn source_error_is_surfaced() {
        let source = FakeSource {
            queued: Vec::new(),
            error: Some("connection refused".to_string()),
        };
        let mut app = App::new(Box::new(source), &DashboardConfig::default());

        app.tick();
        assert_eq!(app.load_error.as_deref(), Some("connection refused"));
    }

    #[tokio::test]
    async fn events_update_streams_log_and_mode() {
        let (tx, rx) = mpsc::channel(16);
        let mut app = app_with_queued(Vec::new())
            .with_events(EventSource::from_channel(rx, "test"));

        tx.send(PacketStatusEvent {
            stream_id: "abcdef123456".to_string(),
            status: "sent".to_string(),
            data: None,
            metrics: Some(StreamMetrics {
                avg_latency: 17.0,
                avg_throughput: 45.0,
                avg_packet_loss: 1.0,
                avg_jitter: 2.0,
            }),
            qos_mode: Some("CQI".to_string()),
        })
        .await
        .unwrap();

        app.tick();
        assert_eq!(app.streams.len(), 1);
        assert_eq!(app.qos_mode, "CQI");
        assert_eq!(app.log.len(), 1);
    }

    #[test]
    fn dialog_requires_catalog() {
        let mut app = app_with_queued(Vec::new());
        app.open_add_dialog();
        assert!(app.dialog.is_none());
        assert!(app.get_status_message().is_some());

        let mut app = app_with_queued(vec![snapshot_with_catalog()]);
        app.tick();
        app.open_add_dialog();
        assert!(app.dialog.is_some());
        assert_eq!(app.dialog.as_ref().unwrap().selected_type(), "YouTube");
    }

    #[test]
    fn dialog_cycles_wrap_around() {
        let mut catalog = TrafficTypeCatalog::new();
        catalog.insert("A".into(), qoswatch_types::TrafficTypeInfo { data_rate: 1.0, latency: 1.0 });
        catalog.insert("B".into(), qoswatch_types::TrafficTypeInfo { data_rate: 1.0, latency: 1.0 });
        let mut dialog = AddStreamDialog::new(&catalog);

        assert_eq!(dialog.selected_type(), "A");
        dialog.next_type();
        assert_eq!(dialog.selected_type(), "B");
        dialog.next_type();
        assert_eq!(dialog.selected_type(), "A");
        dialog.prev_type();
        assert_eq!(dialog.selected_type(), "B");

        assert_eq!(dialog.selected_density(), UserDensity::Medium);
        dialog.next_density();
        assert_eq!(dialog.selected_density(), UserDensity::High);
        dialog.next_density();
        assert_eq!(dialog.selected_density(), UserDensity::Low);
    }

    #[test]
    fn commands_without_control_set_status() {
        let mut app = app_with_queued(Vec::new());
        app.switch_qos_mode();
        assert!(app
            .get_status_message()
            .unwrap()
            .contains("No control connection"));
    }

    #[test]
    fn filter_narrows_streams_and_clamps_selection() {
        let mut app = app_with_queued(Vec::new());
        app.streams.register("id-1".into(), "YouTube".into(), UserDensity::Low);
        app.streams.register("id-2".into(), "Voice Call".into(), UserDensity::Low);
        app.selected_stream_index = 1;

        app.filter_text = "youtube".to_string();
        app.tick();

        let filtered = app.filtered_streams();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].1.traffic_type, "YouTube");
        assert_eq!(app.selected_stream_index, 0);
        assert_eq!(app.selected_stream().unwrap().stream_id, "id-1");
    }

    #[test]
    fn view_cycle_is_closed() {
        let mut view = View::Overview;
        for _ in 0..3 {
            view = view.next();
        }
        assert_eq!(view, View::Overview);
        assert_eq!(View::Traffic.prev(), View::Overview);
    }

    #[test]
    fn export_round_trips_through_json() {
        let mut app = app_with_queued(vec![snapshot_with_catalog()]);
        app.tick();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        app.export_state(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["qos_mode"], "RL");
        assert_eq!(parsed["charts"]["throughput"]["rl"][0], 10.0);
    }
}
