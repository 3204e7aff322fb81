//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        let commands = self.state.start();
        self.send_all(commands);
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if event == UiEvent::Quit {
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let commands = self.state.handle_event(event);
                    self.send_all(commands);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    let commands = self.state.handle_response(response);
                    self.send_all(commands);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
        tracing::debug!("App actor stopped");
    }

    fn send_all(&self, commands: Vec<NetworkCommand>) {
        for command in commands {
            if self.network_tx.send(command).is_err() {
                tracing::warn!("Network actor is gone, dropping command");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::messages::Query;

    #[tokio::test]
    async fn test_startup_commands_and_quit() {
        let (network_tx, mut network_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (_net_tx, net_rx) = mpsc::unbounded_channel();

        let actor = AppActor::new(AppState::new(&Config::default()), network_tx, render_tx);
        let handle = tokio::spawn(actor.run(ui_rx, net_rx));

        ui_tx.send(UiEvent::Quit).unwrap();
        handle.await.unwrap();

        match network_rx.recv().await {
            Some(NetworkCommand::Fetch { query, .. }) => assert_eq!(query, Query::CurrentUser),
            other => panic!("unexpected first command {:?}", other),
        }
        let mut last = None;
        while let Ok(command) = network_rx.try_recv() {
            last = Some(command);
        }
        assert!(matches!(last, Some(NetworkCommand::Shutdown)));
        assert!(render_rx.recv().await.is_some());
    }
}
