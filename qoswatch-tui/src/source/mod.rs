//! Input abstraction for receiving backend metrics.
//!
//! This module provides a trait-based abstraction for receiving metrics
//! snapshots from various inputs: the live HTTP poller, a replay file, or an
//! in-memory channel. The push event feed is a separate input type
//! ([`EventSource`]) since it yields discrete events rather than snapshots.

mod feed;
mod file;
mod http;

pub use feed::EventSource;
pub use file::FileSource;
pub use http::HttpSource;

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use qoswatch_types::{StatisticsSnapshot, TrafficTypeCatalog, TrafficTypeCounts};

/// One polling round's worth of backend metrics.
///
/// The traffic-type catalog changes only with backend configuration, so it
/// rides along once (the first successful fetch) rather than every round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub stats: StatisticsSnapshot,
    pub counts: TrafficTypeCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<TrafficTypeCatalog>,
}

/// Trait for receiving metrics snapshots from various inputs.
///
/// # Example
///
/// ```no_run
/// use qoswatch_tui::{DataSource, FileSource};
///
/// let mut source = FileSource::new("snapshot.json");
/// if let Some(snapshot) = source.poll() {
///     println!("RL throughput: {}", snapshot.stats.rl.throughput);
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// This method must be non-blocking; it is called once per frame.
    fn poll(&mut self) -> Option<MetricsSnapshot>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI header.
    fn description(&self) -> &str;

    /// Check if the source has encountered an error.
    ///
    /// Returns the error message if the most recent poll round failed.
    fn error(&self) -> Option<&str>;
}
