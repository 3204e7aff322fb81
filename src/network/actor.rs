//! Network actor - runs API queries in Tokio async runtime

use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::{execute_query, ApiClient};

/// Network actor that turns fetch commands into responses
pub struct NetworkActor {
    client: ApiClient,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(client: ApiClient, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Fetch { id, query }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            self.active_requests.spawn(async move {
                                let what = query.describe();
                                tracing::debug!(id, query = %what, "Executing query");
                                let start = Instant::now();
                                let result = execute_query(&client, &query).await;
                                let time_ms = start.elapsed().as_millis() as u64;

                                let response = match result {
                                    Ok(payload) => {
                                        tracing::info!(id, query = %what, time_ms, "Query completed");
                                        NetworkResponse::Loaded { id, payload, time_ms }
                                    }
                                    Err(err) => {
                                        tracing::warn!(id, query = %what, time_ms, error = %err, "Query failed");
                                        NetworkResponse::Failed { id, message: err.to_string(), time_ms }
                                    }
                                };
                                // App side may already be gone during shutdown
                                let _ = response_tx.send(response);
                            });
                        }

                        Some(NetworkCommand::Shutdown) => {
                            self.active_requests.abort_all();
                            break;
                        }

                        None => break,
                    }
                }

                // Reap completed tasks
                Some(result) = self.active_requests.join_next() => {
                    if let Err(err) = result {
                        if err.is_panic() {
                            tracing::error!(error = %err, "Query task panicked");
                        }
                    }
                }
            }
        }
        tracing::debug!("Network actor stopped");
    }
}
