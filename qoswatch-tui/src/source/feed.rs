//! Push event feed.
//!
//! The backend emits `packet_status` events as newline-delimited JSON. This
//! source reads them from any async byte stream (normally a TCP connection)
//! in a background task and hands them to the UI thread via a channel.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use qoswatch_types::PacketStatusEvent;

/// A source of `packet_status` events.
///
/// Malformed lines are recorded as parse errors and skipped; the feed keeps
/// reading. EOF or a read error ends the background task and is surfaced
/// through [`EventSource::last_error`].
///
/// # Example with a byte stream
///
/// ```
/// use std::io::Cursor;
/// use qoswatch_tui::EventSource;
///
/// # tokio_test::block_on(async {
/// let data = b"{\"stream_id\":\"abc\",\"status\":\"sent\"}\n";
/// let feed = EventSource::spawn(Cursor::new(data.to_vec()), "example");
/// # });
/// ```
#[derive(Debug)]
pub struct EventSource {
    receiver: mpsc::Receiver<PacketStatusEvent>,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
}

impl EventSource {
    /// Connect to the backend's event feed at `host:port`.
    pub async fn connect(addr: &str) -> std::io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::spawn(stream, addr))
    }

    /// Spawn a background task reading newline-delimited JSON events from
    /// the given async reader.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(64);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        *error_handle.lock().unwrap() = Some("Event feed closed".to_string());
                        break;
                    }
                    Ok(_) => {
                        let trimmed = line.trim();
                        if trimmed.is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<PacketStatusEvent>(trimmed) {
                            Ok(event) => {
                                debug!(stream_id = %event.stream_id, "event received");
                                *error_handle.lock().unwrap() = None;
                                if tx.send(event).await.is_err() {
                                    // Receiver dropped
                                    break;
                                }
                            }
                            Err(e) => {
                                warn!("malformed event skipped: {}", e);
                                *error_handle.lock().unwrap() =
                                    Some(format!("Parse error: {}", e));
                            }
                        }
                    }
                    Err(e) => {
                        *error_handle.lock().unwrap() = Some(format!("Read error: {}", e));
                        break;
                    }
                }
            }
        });

        Self {
            receiver: rx,
            description: format!("feed: {}", description),
            last_error,
        }
    }

    /// Wrap an existing event channel (for tests and embedding).
    pub fn from_channel(receiver: mpsc::Receiver<PacketStatusEvent>, description: &str) -> Self {
        Self {
            receiver,
            description: format!("feed: {}", description),
            last_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Drain all events queued since the last frame. Non-blocking.
    pub fn poll(&mut self) -> Vec<PacketStatusEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get the last error message, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }
}
