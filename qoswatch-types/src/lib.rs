//! # qoswatch-types
//!
//! Wire schema for the qoswatch dashboard: the JSON shapes exchanged with a
//! packet-scheduler simulation backend.
//!
//! The backend runs three scheduling policies side by side (reinforcement
//! learning, round-robin, channel-quality-indicator) and exposes its metrics
//! over HTTP plus a push event feed. These types match that surface exactly;
//! they carry no behavior beyond small accessors and display labels.
//!
//! The schema splits into three groups:
//!
//! - [`scheduler`]: per-scheduler statistics returned by `/get_statistics/`
//! - [`traffic`]: the traffic-type catalog and per-second count samples
//! - [`stream`]: stream control requests/responses and `packet_status` events

pub mod scheduler;
pub mod stream;
pub mod traffic;

pub use scheduler::{SchedulerKind, SchedulerStats, StatisticsSnapshot};
pub use stream::{
    AddStreamRequest, AddStreamResponse, PacketSample, PacketStatusEvent, RemoveStreamRequest,
    StreamMetrics, SwitchModeResponse, UserDensity,
};
pub use traffic::{CountSample, TrafficTypeCatalog, TrafficTypeCounts, TrafficTypeInfo};
