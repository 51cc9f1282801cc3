//! HTTP polling data source.
//!
//! Spawns a background task that fetches the backend's statistics and
//! traffic-count endpoints on a fixed interval and forwards the results
//! through a channel. Failures are forwarded as error strings; the poller
//! never retries early and never stops, the next tick simply tries again.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use qoswatch_client::SimulatorClient;

use super::{DataSource, MetricsSnapshot};

/// A data source that polls the backend over HTTP.
///
/// Must be constructed inside a tokio runtime; the polling task lives on the
/// runtime and exits when this source is dropped (its channel closes).
#[derive(Debug)]
pub struct HttpSource {
    receiver: mpsc::Receiver<Result<MetricsSnapshot, String>>,
    description: String,
    last_error: Option<String>,
}

impl HttpSource {
    /// Spawn the polling task with the given refresh interval.
    pub fn spawn(client: SimulatorClient, refresh: Duration) -> Self {
        let description = format!("http: {}", client.endpoint());
        let (tx, rx) = mpsc::channel(16);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(refresh);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut catalog_pending = true;

            loop {
                interval.tick().await;
                let result = fetch_round(&client, &mut catalog_pending).await;
                match &result {
                    Ok(snapshot) => debug!(
                        catalog = snapshot.catalog.is_some(),
                        "poll round complete"
                    ),
                    Err(e) => warn!("poll round failed: {}", e),
                }
                if tx.send(result).await.is_err() {
                    // Receiver dropped, dashboard is gone
                    break;
                }
            }
        });

        Self {
            receiver: rx,
            description,
            last_error: None,
        }
    }
}

/// Fetch one round of metrics.
///
/// The catalog is fetched until it first succeeds, then never again; a
/// catalog failure alone does not fail the round.
async fn fetch_round(
    client: &SimulatorClient,
    catalog_pending: &mut bool,
) -> Result<MetricsSnapshot, String> {
    let stats = client.statistics().await.map_err(|e| e.to_string())?;
    let counts = client.traffic_type_counts().await.map_err(|e| e.to_string())?;

    let catalog = if *catalog_pending {
        match client.traffic_types().await {
            Ok(catalog) => {
                *catalog_pending = false;
                Some(catalog)
            }
            Err(e) => {
                warn!("traffic type catalog fetch failed: {}", e);
                None
            }
        }
    } else {
        None
    };

    Ok(MetricsSnapshot { stats, counts, catalog })
}

impl DataSource for HttpSource {
    fn poll(&mut self) -> Option<MetricsSnapshot> {
        // Drain everything queued since the last frame, keeping the newest
        // snapshot but never losing a catalog delivered in a skipped one.
        let mut latest: Option<MetricsSnapshot> = None;
        let mut catalog = None;

        loop {
            match self.receiver.try_recv() {
                Ok(Ok(snapshot)) => {
                    self.last_error = None;
                    if snapshot.catalog.is_some() {
                        catalog = snapshot.catalog.clone();
                    }
                    latest = Some(snapshot);
                }
                Ok(Err(message)) => {
                    self.last_error = Some(message);
                }
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    self.last_error = Some("poller stopped".to_string());
                    break;
                }
            }
        }

        if let Some(ref mut snapshot) = latest {
            if snapshot.catalog.is_none() {
                snapshot.catalog = catalog;
            }
        }
        latest
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
