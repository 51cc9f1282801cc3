//! The active-stream registry and the bounded status log.

use std::collections::VecDeque;

use chrono::Utc;

use qoswatch_types::{PacketStatusEvent, StreamMetrics, UserDensity};

use super::history::DEFAULT_WINDOW;

/// One accumulated metrics sample, kept for export.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MetricsRecord {
    /// RFC 3339 arrival time.
    pub timestamp: String,
    #[serde(flatten)]
    pub metrics: StreamMetrics,
}

/// Display state for one active traffic stream.
#[derive(Debug, Clone)]
pub struct StreamEntry {
    pub stream_id: String,
    pub traffic_type: String,
    pub user_density: Option<UserDensity>,
    /// Packets reported for this stream so far.
    pub packets: u64,
    /// Disposition of the most recent event, e.g. "sent".
    pub last_status: String,
    /// Most recent backend-averaged metrics.
    pub latest: Option<StreamMetrics>,
    /// Sliding window of average latency for the stream chart.
    pub latency_window: VecDeque<f64>,
    /// Sliding window of average throughput for the stream chart.
    pub throughput_window: VecDeque<f64>,
    /// All metrics samples received, kept for export.
    pub records: Vec<MetricsRecord>,
}

impl StreamEntry {
    fn new(stream_id: String, traffic_type: String, user_density: Option<UserDensity>) -> Self {
        Self {
            stream_id,
            traffic_type,
            user_density,
            packets: 0,
            last_status: String::new(),
            latest: None,
            latency_window: VecDeque::new(),
            throughput_window: VecDeque::new(),
            records: Vec::new(),
        }
    }

    /// Short id for table cells and log lines.
    pub fn short_id(&self) -> &str {
        let end = self
            .stream_id
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.stream_id.len());
        &self.stream_id[..end]
    }

    /// Chart points of the latency window, x being the sample index.
    pub fn latency_points(&self) -> Vec<(f64, f64)> {
        self.latency_window.iter().enumerate().map(|(i, v)| (i as f64, *v)).collect()
    }

    /// Chart points of the throughput window, x being the sample index.
    pub fn throughput_points(&self) -> Vec<(f64, f64)> {
        self.throughput_window.iter().enumerate().map(|(i, v)| (i as f64, *v)).collect()
    }
}

/// Ordered registry of active streams, keyed by the backend's opaque id.
///
/// Streams appear either when a control command starts them or when the
/// first event for an unknown id arrives (another client may have started
/// it). Per-stream chart windows share the history window capacity.
#[derive(Debug, Clone)]
pub struct StreamSet {
    window: usize,
    entries: Vec<StreamEntry>,
}

impl Default for StreamSet {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl StreamSet {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StreamEntry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&StreamEntry> {
        self.entries.get(index)
    }

    pub fn find(&self, stream_id: &str) -> Option<&StreamEntry> {
        self.entries.iter().find(|e| e.stream_id == stream_id)
    }

    /// Register a stream started through the control surface.
    pub fn register(
        &mut self,
        stream_id: String,
        traffic_type: String,
        user_density: UserDensity,
    ) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.stream_id == stream_id) {
            entry.traffic_type = traffic_type;
            entry.user_density = Some(user_density);
            return;
        }
        self.entries.push(StreamEntry::new(
            stream_id,
            traffic_type,
            Some(user_density),
        ));
    }

    /// Drop one stream. Returns whether it was present.
    pub fn remove(&mut self, stream_id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.stream_id != stream_id);
        self.entries.len() != before
    }

    /// Drop every stream.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Fold one push event into the registry.
    ///
    /// Returns the formatted line for the status log.
    pub fn apply(&mut self, event: &PacketStatusEvent) -> String {
        let window = self.window;
        let entry = match self.entries.iter_mut().find(|e| e.stream_id == event.stream_id) {
            Some(entry) => entry,
            None => {
                // Stream started outside this dashboard
                let traffic_type = event
                    .data
                    .as_ref()
                    .map(|d| d.traffic_type.clone())
                    .unwrap_or_else(|| "unknown".to_string());
                self.entries.push(StreamEntry::new(
                    event.stream_id.clone(),
                    traffic_type,
                    None,
                ));
                self.entries.last_mut().expect("just pushed")
            }
        };

        entry.last_status = event.status.clone();
        if let Some(ref data) = event.data {
            entry.packets += 1;
            if entry.traffic_type == "unknown" {
                entry.traffic_type = data.traffic_type.clone();
            }
        }

        if let Some(metrics) = event.metrics {
            entry.latest = Some(metrics);
            push_bounded(&mut entry.latency_window, metrics.avg_latency, window);
            push_bounded(&mut entry.throughput_window, metrics.avg_throughput, window);
            entry.records.push(MetricsRecord {
                timestamp: Utc::now().to_rfc3339(),
                metrics,
            });
        }

        let short_id = entry.short_id().to_string();
        match event.data {
            Some(ref data) => format!("[{}] {}: {}", short_id, event.status, data.summary()),
            None => format!("[{}] {}", short_id, event.status),
        }
    }
}

fn push_bounded(ring: &mut VecDeque<f64>, value: f64, capacity: usize) {
    ring.push_back(value);
    if ring.len() > capacity {
        ring.pop_front();
    }
}

/// Bounded FIFO of human-readable status lines.
#[derive(Debug, Clone)]
pub struct StatusLog {
    capacity: usize,
    lines: VecDeque<String>,
}

impl Default for StatusLog {
    fn default() -> Self {
        Self::new(200)
    }
}

impl StatusLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            lines: VecDeque::new(),
        }
    }

    pub fn push(&mut self, line: String) {
        self.lines.push_back(line);
        if self.lines.len() > self.capacity {
            self.lines.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The most recent `n` lines, oldest first.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &str> {
        let skip = self.lines.len().saturating_sub(n);
        self.lines.iter().skip(skip).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qoswatch_types::{PacketSample, PacketStatusEvent, StreamMetrics};

    fn event(stream_id: &str, with_metrics: bool) -> PacketStatusEvent {
        PacketStatusEvent {
            stream_id: stream_id.to_string(),
            status: "sent".to_string(),
            data: Some(PacketSample {
                timestamp: 1_700_000_000.0,
                traffic_type: "YouTube".to_string(),
                data_rate: 48.0,
                latency: 16.0,
                packet_loss: 0.8,
            }),
            metrics: with_metrics.then_some(StreamMetrics {
                avg_latency: 17.0,
                avg_throughput: 45.0,
                avg_packet_loss: 1.0,
                avg_jitter: 2.0,
            }),
            qos_mode: None,
        }
    }

    #[test]
    fn apply_creates_unknown_streams() {
        let mut streams = StreamSet::new(20);
        let line = streams.apply(&event("stream-1234567890", false));

        assert_eq!(streams.len(), 1);
        let entry = streams.find("stream-1234567890").unwrap();
        assert_eq!(entry.traffic_type, "YouTube");
        assert_eq!(entry.packets, 1);
        assert!(entry.user_density.is_none());
        assert!(line.starts_with("[stream-1]"));
        assert!(line.contains("sent"));
    }

    #[test]
    fn register_then_apply_updates_in_place() {
        let mut streams = StreamSet::new(20);
        streams.register(
            "abc".to_string(),
            "Voice Call".to_string(),
            UserDensity::High,
        );
        streams.apply(&event("abc", true));

        assert_eq!(streams.len(), 1);
        let entry = streams.find("abc").unwrap();
        assert_eq!(entry.traffic_type, "Voice Call");
        assert_eq!(entry.user_density, Some(UserDensity::High));
        assert_eq!(entry.latest.unwrap().avg_throughput, 45.0);
        assert_eq!(entry.records.len(), 1);
    }

    #[test]
    fn stream_windows_stay_bounded() {
        let mut streams = StreamSet::new(3);
        for _ in 0..10 {
            streams.apply(&event("abc", true));
        }

        let entry = streams.find("abc").unwrap();
        assert_eq!(entry.latency_window.len(), 3);
        assert_eq!(entry.throughput_window.len(), 3);
        // All samples are still accumulated for export
        assert_eq!(entry.records.len(), 10);
        assert_eq!(entry.packets, 10);
    }

    #[test]
    fn remove_and_clear() {
        let mut streams = StreamSet::new(20);
        streams.register("a".to_string(), "X".to_string(), UserDensity::Low);
        streams.register("b".to_string(), "Y".to_string(), UserDensity::Low);

        assert!(streams.remove("a"));
        assert!(!streams.remove("a"));
        assert_eq!(streams.len(), 1);

        streams.clear();
        assert!(streams.is_empty());
    }

    #[test]
    fn status_log_evicts_oldest_first() {
        let mut log = StatusLog::new(3);
        for i in 0..5 {
            log.push(format!("line {}", i));
        }

        assert_eq!(log.len(), 3);
        let tail: Vec<&str> = log.tail(10).collect();
        assert_eq!(tail, vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn status_log_tail_returns_newest() {
        let mut log = StatusLog::new(10);
        for i in 0..5 {
            log.push(format!("line {}", i));
        }

        let tail: Vec<&str> = log.tail(2).collect();
        assert_eq!(tail, vec!["line 3", "line 4"]);
    }

    #[test]
    fn short_id_handles_short_ids() {
        let entry = StreamEntry::new("abc".to_string(), "X".to_string(), None);
        assert_eq!(entry.short_id(), "abc");
    }
}
