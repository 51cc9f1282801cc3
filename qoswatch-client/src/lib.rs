//! # qoswatch-client
//!
//! HTTP client for the packet-scheduler simulation backend.
//!
//! The backend exposes read endpoints for metrics and a control surface for
//! managing simulated traffic streams. This crate wraps both behind
//! [`SimulatorClient`], one async method per documented endpoint, with a
//! builder for endpoint and timeout configuration.
//!
//! ## Example
//!
//! ```rust,no_run
//! use qoswatch_client::SimulatorClient;
//! use qoswatch_types::UserDensity;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SimulatorClient::builder()
//!         .endpoint("http://127.0.0.1:5432")
//!         .build();
//!
//!     let stats = client.statistics().await?;
//!     println!("RL throughput: {:.1} Mbps", stats.rl.throughput);
//!
//!     let response = client.add_stream(UserDensity::Medium, "YouTube").await?;
//!     if response.started() {
//!         client.remove_stream(&response.stream_id).await?;
//!     }
//!
//!     Ok(())
//! }
//! ```

mod error;
mod simulator;

pub use error::ClientError;
pub use simulator::{SimulatorClient, SimulatorClientBuilder};
