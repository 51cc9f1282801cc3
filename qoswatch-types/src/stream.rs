//! Stream control requests/responses and the `packet_status` push event.

use serde::{Deserialize, Serialize};

/// Simulated user density for a traffic stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserDensity {
    Low,
    #[default]
    Medium,
    High,
}

impl UserDensity {
    pub const ALL: [UserDensity; 3] = [UserDensity::Low, UserDensity::Medium, UserDensity::High];

    pub fn label(&self) -> &'static str {
        match self {
            UserDensity::Low => "low",
            UserDensity::Medium => "medium",
            UserDensity::High => "high",
        }
    }
}

/// Body of `POST /add_traffic_stream`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddStreamRequest {
    pub user_density: UserDensity,
    pub traffic_type: String,
}

/// Response of `POST /add_traffic_stream`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddStreamResponse {
    /// `"stream_started"` on success.
    pub status: String,
    /// Opaque id identifying the new stream in later calls and events.
    pub stream_id: String,
}

impl AddStreamResponse {
    /// Whether the backend actually started the stream.
    pub fn started(&self) -> bool {
        self.status == "stream_started"
    }
}

/// Body of `POST /remove_traffic_stream`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveStreamRequest {
    pub stream_id: String,
}

/// Response of `POST /switch_qos_mode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchModeResponse {
    /// The scheduling mode now active, e.g. `"RL"` or `"RR"`.
    pub mode: String,
}

/// Rolling per-stream averages computed backend-side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreamMetrics {
    /// Mean latency in milliseconds.
    pub avg_latency: f64,
    /// Mean throughput in Mbps.
    pub avg_throughput: f64,
    /// Mean packet loss in percent.
    pub avg_packet_loss: f64,
    /// Mean inter-packet jitter in milliseconds.
    pub avg_jitter: f64,
}

/// The per-packet payload carried by a `packet_status` event.
///
/// The backend attaches more fields (priority, service type, CQI); only the
/// ones the dashboard displays are decoded, the rest are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketSample {
    pub timestamp: f64,
    pub traffic_type: String,
    /// Scheduled data rate in Mbps.
    pub data_rate: f64,
    /// Observed latency in milliseconds.
    pub latency: f64,
    /// Observed packet loss in percent.
    pub packet_loss: f64,
}

impl PacketSample {
    /// One-line rendering for the status log.
    pub fn summary(&self) -> String {
        format!(
            "{} {:.1} Mbps {:.1} ms loss {:.2}%",
            self.traffic_type, self.data_rate, self.latency, self.packet_loss
        )
    }
}

/// One `packet_status` push event from the backend's event feed.
///
/// `metrics` and `qos_mode` are piggybacked intermittently; either may be
/// absent on any given event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketStatusEvent {
    pub stream_id: String,
    /// Event disposition, e.g. `"sent"` or `"dropped"`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PacketSample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<StreamMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qos_mode: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_stream_request_wire_shape() {
        let request = AddStreamRequest {
            user_density: UserDensity::High,
            traffic_type: "Voice Call".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["user_density"], "high");
        assert_eq!(json["traffic_type"], "Voice Call");
    }

    #[test]
    fn add_stream_response_started() {
        let ok: AddStreamResponse =
            serde_json::from_str(r#"{ "status": "stream_started", "stream_id": "abc123" }"#)
                .unwrap();
        assert!(ok.started());

        let rejected: AddStreamResponse =
            serde_json::from_str(r#"{ "status": "rejected", "stream_id": "" }"#).unwrap();
        assert!(!rejected.started());
    }

    #[test]
    fn packet_status_event_optional_fields() {
        let json = r#"{
            "stream_id": "abc123",
            "status": "sent",
            "data": {
                "timestamp": 1700000000.5,
                "traffic_type": "YouTube",
                "data_rate": 48.2,
                "latency": 16.0,
                "packet_loss": 0.8,
                "priority": "high",
                "cqi": 0.92
            }
        }"#;

        let event: PacketStatusEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.stream_id, "abc123");
        assert!(event.metrics.is_none());
        assert!(event.qos_mode.is_none());

        let sample = event.data.unwrap();
        assert_eq!(sample.traffic_type, "YouTube");
        assert!(sample.summary().contains("YouTube"));
    }

    #[test]
    fn packet_status_event_with_metrics_and_mode() {
        let json = r#"{
            "stream_id": "abc123",
            "status": "sent",
            "metrics": {
                "avg_latency": 17.4,
                "avg_throughput": 45.1,
                "avg_packet_loss": 1.2,
                "avg_jitter": 2.3
            },
            "qos_mode": "RR"
        }"#;

        let event: PacketStatusEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.metrics.unwrap().avg_throughput, 45.1);
        assert_eq!(event.qos_mode.as_deref(), Some("RR"));
    }
}
