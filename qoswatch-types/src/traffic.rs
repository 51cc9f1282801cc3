//! Traffic-type catalog and per-second count samples.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Nominal characteristics of one traffic type, as configured backend-side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficTypeInfo {
    /// Nominal data rate in Mbps.
    pub data_rate: f64,
    /// Nominal latency target in milliseconds.
    pub latency: f64,
}

/// The `/get_traffic_types/` response: traffic-type name to characteristics.
///
/// A `BTreeMap` keeps the table in a stable display order.
pub type TrafficTypeCatalog = BTreeMap<String, TrafficTypeInfo>;

/// Packet counts per traffic type at one backend accounting instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountSample {
    /// Seconds since the Unix epoch, as reported by the backend.
    pub timestamp: f64,
    /// Packets scheduled in this second, keyed by traffic type.
    ///
    /// A type absent from the map had zero packets; the backend omits
    /// zeroes rather than sending them.
    pub counts: BTreeMap<String, u64>,
}

/// The `/get_traffic_type_counts/` response: an ordered sample sequence per
/// scheduler.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrafficTypeCounts {
    pub rl: Vec<CountSample>,
    pub rr: Vec<CountSample>,
    pub cqi: Vec<CountSample>,
}

impl TrafficTypeCounts {
    /// The sample sequence for one scheduler.
    pub fn get(&self, kind: crate::SchedulerKind) -> &[CountSample] {
        match kind {
            crate::SchedulerKind::Rl => &self.rl,
            crate::SchedulerKind::RoundRobin => &self.rr,
            crate::SchedulerKind::Cqi => &self.cqi,
        }
    }
}
