//! Client-side data models: windowing, aggregation, and export.
//!
//! Everything here is ephemeral display state, rebuilt from backend
//! responses and discarded on exit; nothing is a system of record.
//!
//! ## Submodules
//!
//! - [`history`]: synchronized sliding windows of the per-scheduler chart
//!   metrics
//! - [`counts`]: group-by aggregation of per-second traffic-type counts
//! - [`streams`]: the active-stream registry and the bounded status log
//! - [`export`]: JSON export of all accumulated in-memory metrics

pub mod counts;
pub mod export;
pub mod history;
pub mod streams;

pub use counts::CountSeries;
pub use export::build_export;
pub use history::{ChartMetric, MetricsHistory, DEFAULT_WINDOW};
pub use streams::{StatusLog, StreamEntry, StreamSet};
