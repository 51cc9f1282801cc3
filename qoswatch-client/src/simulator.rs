//! The backend HTTP client.
//!
//! Paths, methods, and payload shapes follow the backend's documented
//! surface exactly; nothing here reinterprets or post-processes the data.

use std::time::Duration;

use reqwest::Client;

use qoswatch_types::{
    AddStreamRequest, AddStreamResponse, RemoveStreamRequest, StatisticsSnapshot,
    SwitchModeResponse, TrafficTypeCatalog, TrafficTypeCounts, UserDensity,
};

use crate::ClientError;

/// Client for the scheduler-simulation backend.
#[derive(Debug, Clone)]
pub struct SimulatorClient {
    client: Client,
    endpoint: String,
}

impl SimulatorClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> SimulatorClientBuilder {
        SimulatorClientBuilder::default()
    }

    /// The backend endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the current per-scheduler statistics.
    ///
    /// `GET /get_statistics/`
    pub async fn statistics(&self) -> Result<StatisticsSnapshot, ClientError> {
        self.get_json("/get_statistics/").await
    }

    /// Fetch the traffic-type catalog.
    ///
    /// `GET /get_traffic_types/`
    pub async fn traffic_types(&self) -> Result<TrafficTypeCatalog, ClientError> {
        self.get_json("/get_traffic_types/").await
    }

    /// Fetch the per-second packet counts by traffic type.
    ///
    /// `GET /get_traffic_type_counts/`
    pub async fn traffic_type_counts(&self) -> Result<TrafficTypeCounts, ClientError> {
        self.get_json("/get_traffic_type_counts/").await
    }

    /// Start a new simulated traffic stream.
    ///
    /// `POST /add_traffic_stream`
    pub async fn add_stream(
        &self,
        user_density: UserDensity,
        traffic_type: &str,
    ) -> Result<AddStreamResponse, ClientError> {
        let body = AddStreamRequest {
            user_density,
            traffic_type: traffic_type.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/add_traffic_stream", self.endpoint))
            .json(&body)
            .send()
            .await?;
        Self::check_status(&response)?;

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Stop and remove one stream.
    ///
    /// `POST /remove_traffic_stream`
    pub async fn remove_stream(&self, stream_id: &str) -> Result<(), ClientError> {
        let body = RemoveStreamRequest {
            stream_id: stream_id.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/remove_traffic_stream", self.endpoint))
            .json(&body)
            .send()
            .await?;
        Self::check_status(&response)
    }

    /// Stop every active stream.
    ///
    /// `POST /stop_all_streams`
    pub async fn stop_all_streams(&self) -> Result<(), ClientError> {
        let response = self
            .client
            .post(format!("{}/stop_all_streams", self.endpoint))
            .send()
            .await?;
        Self::check_status(&response)
    }

    /// Cycle the backend to its next scheduling mode.
    ///
    /// `POST /switch_qos_mode`
    pub async fn switch_qos_mode(&self) -> Result<SwitchModeResponse, ClientError> {
        let response = self
            .client
            .post(format!("{}/switch_qos_mode", self.endpoint))
            .send()
            .await?;
        Self::check_status(&response)?;

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        let response = self
            .client
            .get(format!("{}{}", self.endpoint, path))
            .send()
            .await?;
        Self::check_status(&response)?;

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    fn check_status(response: &reqwest::Response) -> Result<(), ClientError> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ClientError::Http(format!(
                "backend returned status {}",
                response.status()
            )))
        }
    }
}

/// Builder for [`SimulatorClient`].
#[derive(Debug, Default)]
pub struct SimulatorClientBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl SimulatorClientBuilder {
    /// Set the backend endpoint (e.g. "http://127.0.0.1:5432").
    ///
    /// A trailing slash is stripped so paths concatenate cleanly.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        self.endpoint = Some(endpoint.trim_end_matches('/').to_string());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> SimulatorClient {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        SimulatorClient {
            client,
            endpoint: self
                .endpoint
                .unwrap_or_else(|| "http://127.0.0.1:5432".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let client = SimulatorClient::builder().build();
        assert_eq!(client.endpoint(), "http://127.0.0.1:5432");
    }

    #[test]
    fn builder_strips_trailing_slash() {
        let client = SimulatorClient::builder()
            .endpoint("http://sim.local:5432/")
            .build();
        assert_eq!(client.endpoint(), "http://sim.local:5432");
    }

    #[test]
    fn builder_custom_timeout() {
        let client = SimulatorClient::builder()
            .endpoint("http://sim.local:5432")
            .timeout(Duration::from_secs(2))
            .build();
        assert_eq!(client.endpoint(), "http://sim.local:5432");
    }
}
