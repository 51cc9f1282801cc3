//! Background executor for the backend's control surface.
//!
//! Key handlers run on the UI thread and must not block on HTTP, so commands
//! are queued onto a channel and executed by a tokio task; outcomes come back
//! on a second channel and are folded into application state on the next
//! frame.

use tokio::sync::mpsc;
use tracing::{info, warn};

use qoswatch_client::SimulatorClient;
use qoswatch_types::UserDensity;

/// A control action requested from the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddStream {
        user_density: UserDensity,
        traffic_type: String,
    },
    RemoveStream {
        stream_id: String,
    },
    StopAll,
    SwitchMode,
}

/// The result of one executed command.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlOutcome {
    StreamStarted {
        stream_id: String,
        traffic_type: String,
        user_density: UserDensity,
    },
    /// The backend answered but did not start the stream.
    StreamRejected {
        status: String,
    },
    StreamRemoved {
        stream_id: String,
    },
    AllStopped,
    ModeSwitched {
        mode: String,
    },
    Failed {
        action: &'static str,
        error: String,
    },
}

/// Handle to the control executor task.
#[derive(Debug)]
pub struct ControlHandle {
    commands: mpsc::UnboundedSender<Command>,
    outcomes: mpsc::UnboundedReceiver<ControlOutcome>,
}

impl ControlHandle {
    /// Spawn the executor. Must be called inside a tokio runtime.
    pub fn spawn(client: SimulatorClient) -> Self {
        let (command_tx, mut command_rx) = mpsc::unbounded_channel::<Command>();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel::<ControlOutcome>();

        tokio::spawn(async move {
            while let Some(command) = command_rx.recv().await {
                info!(?command, "executing control command");
                let outcome = execute(&client, command).await;
                if let ControlOutcome::Failed { action, ref error } = outcome {
                    warn!("{} failed: {}", action, error);
                }
                if outcome_tx.send(outcome).is_err() {
                    break;
                }
            }
        });

        Self {
            commands: command_tx,
            outcomes: outcome_rx,
        }
    }

    /// Queue a command for execution.
    pub fn dispatch(&self, command: Command) {
        // A send failure means the executor is gone; the outcome channel
        // will report the same condition on the next poll.
        let _ = self.commands.send(command);
    }

    /// Drain all outcomes delivered since the last frame. Non-blocking.
    pub fn poll(&mut self) -> Vec<ControlOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(outcome) = self.outcomes.try_recv() {
            outcomes.push(outcome);
        }
        outcomes
    }
}

async fn execute(client: &SimulatorClient, command: Command) -> ControlOutcome {
    match command {
        Command::AddStream { user_density, traffic_type } => {
            match client.add_stream(user_density, &traffic_type).await {
                Ok(response) if response.started() => ControlOutcome::StreamStarted {
                    stream_id: response.stream_id,
                    traffic_type,
                    user_density,
                },
                Ok(response) => ControlOutcome::StreamRejected {
                    status: response.status,
                },
                Err(e) => ControlOutcome::Failed {
                    action: "add stream",
                    error: e.to_string(),
                },
            }
        }
        Command::RemoveStream { stream_id } => match client.remove_stream(&stream_id).await {
            Ok(()) => ControlOutcome::StreamRemoved { stream_id },
            Err(e) => ControlOutcome::Failed {
                action: "remove stream",
                error: e.to_string(),
            },
        },
        Command::StopAll => match client.stop_all_streams().await {
            Ok(()) => ControlOutcome::AllStopped,
            Err(e) => ControlOutcome::Failed {
                action: "stop all streams",
                error: e.to_string(),
            },
        },
        Command::SwitchMode => match client.switch_qos_mode().await {
            Ok(response) => ControlOutcome::ModeSwitched { mode: response.mode },
            Err(e) => ControlOutcome::Failed {
                action: "switch QoS mode",
                error: e.to_string(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn commands_against_dead_backend_fail_gracefully() {
        // Nothing listens on this port: every command yields Failed.
        let client = SimulatorClient::builder()
            .endpoint("http://127.0.0.1:1")
            .timeout(std::time::Duration::from_millis(200))
            .build();
        let mut handle = ControlHandle::spawn(client);

        handle.dispatch(Command::SwitchMode);
        handle.dispatch(Command::StopAll);

        // Wait for the executor to run both commands
        let mut outcomes = Vec::new();
        for _ in 0..50 {
            outcomes.extend(handle.poll());
            if outcomes.len() >= 2 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }

        assert_eq!(outcomes.len(), 2);
        for outcome in outcomes {
            match outcome {
                ControlOutcome::Failed { .. } => {}
                other => panic!("expected Failed, got {:?}", other),
            }
        }
    }
}
