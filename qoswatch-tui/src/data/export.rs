//! JSON export of all accumulated in-memory metrics.

use chrono::Utc;
use serde_json::{json, Map, Value};

use qoswatch_types::SchedulerKind;

use super::history::{ChartMetric, MetricsHistory};
use super::streams::StreamSet;

fn metric_key(metric: ChartMetric) -> &'static str {
    match metric {
        ChartMetric::Throughput => "throughput",
        ChartMetric::Latency => "average_latency",
        ChartMetric::PacketLoss => "average_packet_loss",
        ChartMetric::Fairness => "fairness_index",
    }
}

/// Build the export document mirroring everything currently held in memory:
/// the chart windows and every accumulated per-stream metrics sample.
pub fn build_export(history: &MetricsHistory, streams: &StreamSet, qos_mode: &str) -> Value {
    let mut export = Map::new();
    export.insert("timestamp".to_string(), json!(Utc::now().to_rfc3339()));
    export.insert("qos_mode".to_string(), json!(qos_mode));

    // Chart windows
    let mut charts = Map::new();
    charts.insert(
        "labels".to_string(),
        json!(history.labels().collect::<Vec<_>>()),
    );
    for metric in ChartMetric::ALL {
        let mut per_scheduler = Map::new();
        for kind in SchedulerKind::ALL {
            let values: Vec<f64> =
                history.points(kind, metric).into_iter().map(|(_, y)| y).collect();
            per_scheduler.insert(kind.wire_name().to_string(), json!(values));
        }
        charts.insert(metric_key(metric).to_string(), Value::Object(per_scheduler));
    }
    export.insert("charts".to_string(), Value::Object(charts));

    // Streams with their full sample history
    let mut stream_map = Map::new();
    for entry in streams.iter() {
        stream_map.insert(
            entry.stream_id.clone(),
            json!({
                "traffic_type": entry.traffic_type,
                "user_density": entry.user_density.map(|d| d.label()),
                "packets": entry.packets,
                "metrics": entry.records,
            }),
        );
    }
    export.insert("streams".to_string(), Value::Object(stream_map));

    Value::Object(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qoswatch_types::{
        PacketStatusEvent, SchedulerStats, StatisticsSnapshot, StreamMetrics, UserDensity,
    };

    fn snapshot(value: f64) -> StatisticsSnapshot {
        let stats = SchedulerStats {
            throughput: value,
            average_latency: 1.0,
            average_packet_loss: 2.0,
            fairness_index: 0.5,
        };
        StatisticsSnapshot { rl: stats, rr: stats, cqi: stats }
    }

    #[test]
    fn export_mirrors_history_and_streams() {
        let mut history = MetricsHistory::new(20);
        history.record(&snapshot(10.0), "10:00:00".to_string());
        history.record(&snapshot(20.0), "10:00:02".to_string());

        let mut streams = StreamSet::new(20);
        streams.register("abc".to_string(), "YouTube".to_string(), UserDensity::Medium);
        streams.apply(&PacketStatusEvent {
            stream_id: "abc".to_string(),
            status: "sent".to_string(),
            data: None,
            metrics: Some(StreamMetrics {
                avg_latency: 17.0,
                avg_throughput: 45.0,
                avg_packet_loss: 1.0,
                avg_jitter: 2.0,
            }),
            qos_mode: None,
        });

        let export = build_export(&history, &streams, "RL");

        assert_eq!(export["qos_mode"], "RL");
        assert_eq!(export["charts"]["labels"], json!(["10:00:00", "10:00:02"]));
        assert_eq!(export["charts"]["throughput"]["rl"], json!([10.0, 20.0]));
        assert_eq!(export["charts"]["fairness_index"]["cqi"], json!([0.5, 0.5]));

        let stream = &export["streams"]["abc"];
        assert_eq!(stream["traffic_type"], "YouTube");
        assert_eq!(stream["user_density"], "medium");
        assert_eq!(stream["metrics"][0]["avg_throughput"], 45.0);
        assert!(stream["metrics"][0]["timestamp"].is_string());
    }

    #[test]
    fn export_is_valid_json_when_empty() {
        let history = MetricsHistory::new(20);
        let streams = StreamSet::new(20);

        let export = build_export(&history, &streams, "RL");
        let rendered = serde_json::to_string_pretty(&export).unwrap();
        let parsed: Value = serde_json::from_str(&rendered).unwrap();

        assert!(parsed["charts"]["labels"].as_array().unwrap().is_empty());
        assert!(parsed["streams"].as_object().unwrap().is_empty());
    }
}
