//! Per-scheduler statistics as returned by the backend.

use serde::{Deserialize, Serialize};

/// The three scheduling policies the backend runs side by side.
///
/// The wire names (`rl`, `rr`, `cqi`) are the field names used by
/// `/get_statistics/` and `/get_traffic_type_counts/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulerKind {
    /// Reinforcement-learning scheduler.
    Rl,
    /// Round-robin scheduler.
    RoundRobin,
    /// Channel-quality-indicator scheduler.
    Cqi,
}

impl SchedulerKind {
    /// All schedulers in their canonical display order.
    pub const ALL: [SchedulerKind; 3] =
        [SchedulerKind::Rl, SchedulerKind::RoundRobin, SchedulerKind::Cqi];

    /// The field name used on the wire.
    pub fn wire_name(&self) -> &'static str {
        match self {
            SchedulerKind::Rl => "rl",
            SchedulerKind::RoundRobin => "rr",
            SchedulerKind::Cqi => "cqi",
        }
    }

    /// Human-readable label for chart legends and headers.
    pub fn label(&self) -> &'static str {
        match self {
            SchedulerKind::Rl => "RL Scheduler",
            SchedulerKind::RoundRobin => "Round Robin Scheduler",
            SchedulerKind::Cqi => "CQI Scheduler",
        }
    }

    /// Short label for tight table cells and tab titles.
    pub fn short_label(&self) -> &'static str {
        match self {
            SchedulerKind::Rl => "RL",
            SchedulerKind::RoundRobin => "RR",
            SchedulerKind::Cqi => "CQI",
        }
    }

    /// Cycle to the next scheduler in display order.
    pub fn next(self) -> Self {
        match self {
            SchedulerKind::Rl => SchedulerKind::RoundRobin,
            SchedulerKind::RoundRobin => SchedulerKind::Cqi,
            SchedulerKind::Cqi => SchedulerKind::Rl,
        }
    }

    /// Cycle to the previous scheduler in display order.
    pub fn prev(self) -> Self {
        match self {
            SchedulerKind::Rl => SchedulerKind::Cqi,
            SchedulerKind::RoundRobin => SchedulerKind::Rl,
            SchedulerKind::Cqi => SchedulerKind::RoundRobin,
        }
    }
}

/// QoS metrics for one scheduler over the backend's accounting window.
///
/// All four values are computed backend-side; the dashboard only displays
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SchedulerStats {
    /// Aggregate throughput in Mbps.
    pub throughput: f64,
    /// Mean packet latency in milliseconds.
    pub average_latency: f64,
    /// Mean packet loss in percent.
    pub average_packet_loss: f64,
    /// Jain's fairness index across users, in `[0, 1]`.
    pub fairness_index: f64,
}

/// One `/get_statistics/` response: the same metric set for each scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub rl: SchedulerStats,
    pub rr: SchedulerStats,
    pub cqi: SchedulerStats,
}

impl StatisticsSnapshot {
    /// The stats block for one scheduler.
    pub fn get(&self, kind: SchedulerKind) -> &SchedulerStats {
        match kind {
            SchedulerKind::Rl => &self.rl,
            SchedulerKind::RoundRobin => &self.rr,
            SchedulerKind::Cqi => &self.cqi,
        }
    }
}
