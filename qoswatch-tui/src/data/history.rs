//! Sliding windows of the per-scheduler chart metrics.

use std::collections::{HashMap, VecDeque};

use qoswatch_types::{SchedulerKind, SchedulerStats, StatisticsSnapshot};

/// Default number of samples kept per chart series.
pub const DEFAULT_WINDOW: usize = 20;

/// The four metrics charted on the overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartMetric {
    Throughput,
    Latency,
    PacketLoss,
    Fairness,
}

impl ChartMetric {
    pub const ALL: [ChartMetric; 4] = [
        ChartMetric::Throughput,
        ChartMetric::Latency,
        ChartMetric::PacketLoss,
        ChartMetric::Fairness,
    ];

    /// Chart title.
    pub fn title(&self) -> &'static str {
        match self {
            ChartMetric::Throughput => "Throughput",
            ChartMetric::Latency => "Average Latency",
            ChartMetric::PacketLoss => "Packet Loss",
            ChartMetric::Fairness => "Fairness Index",
        }
    }

    /// Unit suffix for axis labels.
    pub fn unit(&self) -> &'static str {
        match self {
            ChartMetric::Throughput => "Mbps",
            ChartMetric::Latency => "ms",
            ChartMetric::PacketLoss => "%",
            ChartMetric::Fairness => "",
        }
    }

    /// Extract this metric from one scheduler's stats block.
    pub fn value_of(&self, stats: &SchedulerStats) -> f64 {
        match self {
            ChartMetric::Throughput => stats.throughput,
            ChartMetric::Latency => stats.average_latency,
            ChartMetric::PacketLoss => stats.average_packet_loss,
            ChartMetric::Fairness => stats.fairness_index,
        }
    }
}

/// Synchronized sliding windows for all (scheduler, metric) series.
///
/// Every series and the label ring always have the same length; when the
/// window is full the oldest sample is evicted from all of them at once, so
/// parallel series stay aligned with the shared x axis.
#[derive(Debug, Clone)]
pub struct MetricsHistory {
    capacity: usize,
    labels: VecDeque<String>,
    series: HashMap<(SchedulerKind, ChartMetric), VecDeque<f64>>,
}

impl Default for MetricsHistory {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl MetricsHistory {
    /// Create an empty history keeping `capacity` samples per series.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut series = HashMap::new();
        for kind in SchedulerKind::ALL {
            for metric in ChartMetric::ALL {
                series.insert((kind, metric), VecDeque::with_capacity(capacity));
            }
        }
        Self {
            capacity,
            labels: VecDeque::with_capacity(capacity),
            series,
        }
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The configured window size.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The x-axis labels, oldest first.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Record one statistics snapshot under the given time label.
    pub fn record(&mut self, snapshot: &StatisticsSnapshot, label: String) {
        self.labels.push_back(label);
        for kind in SchedulerKind::ALL {
            let stats = snapshot.get(kind);
            for metric in ChartMetric::ALL {
                let ring = self
                    .series
                    .get_mut(&(kind, metric))
                    .expect("series initialized in new()");
                ring.push_back(metric.value_of(stats));
            }
        }

        // Evict oldest-first across the label ring and every series together
        if self.labels.len() > self.capacity {
            self.labels.pop_front();
            for ring in self.series.values_mut() {
                ring.pop_front();
            }
        }
    }

    /// Chart points for one series, x being the sample index.
    pub fn points(&self, kind: SchedulerKind, metric: ChartMetric) -> Vec<(f64, f64)> {
        self.series
            .get(&(kind, metric))
            .map(|ring| {
                ring.iter()
                    .enumerate()
                    .map(|(i, v)| (i as f64, *v))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The most recent value of one series.
    pub fn latest(&self, kind: SchedulerKind, metric: ChartMetric) -> Option<f64> {
        self.series.get(&(kind, metric)).and_then(|ring| ring.back()).copied()
    }

    /// Y-axis bounds for one metric across all three schedulers, padded so
    /// flat lines don't sit on the frame edge.
    pub fn metric_bounds(&self, metric: ChartMetric) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for kind in SchedulerKind::ALL {
            if let Some(ring) = self.series.get(&(kind, metric)) {
                for value in ring {
                    min = min.min(*value);
                    max = max.max(*value);
                }
            }
        }

        if !min.is_finite() || !max.is_finite() {
            return (0.0, 1.0);
        }

        let pad = ((max - min) * 0.1).max(0.1);
        let low = if min >= 0.0 { (min - pad).max(0.0) } else { min - pad };
        (low, max + pad)
    }
}
