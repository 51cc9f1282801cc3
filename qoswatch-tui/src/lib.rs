// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # qoswatch-tui
//!
//! A diagnostic TUI for monitoring a packet-scheduler simulation backend.
//!
//! The backend runs three scheduling policies side by side (reinforcement
//! learning, round-robin, channel-quality-indicator) and exposes metrics over
//! HTTP plus a push event feed. This crate polls that surface, keeps bounded
//! sliding windows of the returned metrics, and renders them as live charts,
//! tables, and a status log in the terminal. It also drives the backend's
//! control surface: starting and stopping simulated traffic streams and
//! switching the active scheduling mode.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Application                           │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (state) │    │(windowing)    │(rendering)   │         │  │
//! │  └──┬───┬──┘    └──────────┘    └─────────┘    └─────────┘  │
//! │     │   │                                                    │
//! │     ▼   ▼                                                    │
//! │  ┌──────────┐   ┌───────────┐                                │
//! │  │ source   │   │ control   │──▶ POST /add_traffic_stream …  │
//! │  │ (input)  │   │ (commands)│                                │
//! │  └──────────┘   └───────────┘                                │
//! │   HttpSource | EventSource | FileSource                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, and user interaction
//! - **[`source`]**: Input abstraction ([`DataSource`] trait) with an HTTP
//!   poller, a push event feed reader, and a replay-file source
//! - **[`control`]**: Background executor for the backend's control endpoints
//! - **[`data`]**: Sliding metric windows, traffic-count aggregation, the
//!   stream registry, and JSON export
//! - **[`ui`]**: Terminal rendering using ratatui - charts, tables, overlays,
//!   and theme support
//!
//! ## Usage
//!
//! ```bash
//! # Monitor a backend, with its push event feed
//! qoswatch --endpoint http://127.0.0.1:5432 --events 127.0.0.1:6789
//!
//! # Replay a recorded snapshot file
//! qoswatch --file snapshot.json
//! ```
//!
//! ### As a library with a replay file
//!
//! ```
//! use qoswatch_tui::{App, DashboardConfig, FileSource};
//!
//! let source = Box::new(FileSource::new("snapshot.json"));
//! let app = App::new(source, &DashboardConfig::default());
//! ```
//!
//! ### Feeding events from an embedding application
//!
//! ```
//! use qoswatch_tui::{App, DashboardConfig, EventSource, FileSource};
//! use tokio::sync::mpsc;
//!
//! # tokio_test::block_on(async {
//! let (tx, rx) = mpsc::channel(64);
//! let source = Box::new(FileSource::new("snapshot.json"));
//! let app = App::new(source, &DashboardConfig::default())
//!     .with_events(EventSource::from_channel(rx, "embedded"));
//! // tx now feeds PacketStatusEvent values into the dashboard
//! # drop(tx);
//! # });
//! ```

pub mod app;
pub mod config;
pub mod control;
pub mod data;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use config::DashboardConfig;
pub use control::{Command, ControlHandle, ControlOutcome};
pub use data::{CountSeries, MetricsHistory, StatusLog, StreamSet};
pub use source::{DataSource, EventSource, FileSource, HttpSource, MetricsSnapshot};
