//! Push channel delivering full leaderboard snapshots.

pub mod socketio;

pub use socketio::{decode_event, BroadcastEvent, WebSocketTransport, LEADERBOARD_EVENT};

use crate::error::Result;
use crate::leaderboard::{SharedLeaderboard, SnapshotOrigin};
use crate::types::Session;
use async_trait::async_trait;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

/// Text-frame connection to the broadcast endpoint. Connection upkeep
/// (handshakes, heartbeats, reconnects) belongs to the implementation.
#[async_trait]
pub trait Transport: Send + 'static {
    /// Next event packet, `None` once the connection is closed.
    async fn recv(&mut self) -> Option<Result<String>>;

    async fn close(&mut self) -> Result<()>;
}

/// Standing subscription to leaderboard broadcasts.
///
/// Every received snapshot replaces the shared leaderboard wholesale, with
/// the rank recomputed for whoever is logged in when it arrives. The
/// receive loop stops on [`RealtimeChannel::shutdown`], when the handle is
/// dropped, or when the transport closes.
pub struct RealtimeChannel {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl RealtimeChannel {
    pub fn start(
        transport: impl Transport,
        board: SharedLeaderboard,
        session: watch::Receiver<Option<Session>>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(receive_loop(transport, board, session, shutdown_rx));

        Self {
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Closes the transport and waits for the receive loop to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("Realtime receive loop panicked: {}", e);
            }
        }
    }
}

async fn receive_loop(
    mut transport: impl Transport,
    board: SharedLeaderboard,
    session: watch::Receiver<Option<Session>>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    tracing::debug!("Realtime receive loop started");

    loop {
        tokio::select! {
            // Fires on an explicit shutdown and when the handle is dropped
            _ = &mut shutdown_rx => {
                tracing::debug!("Realtime channel shutting down");
                if let Err(e) = transport.close().await {
                    tracing::warn!("Error closing realtime transport: {}", e);
                }
                break;
            }

            incoming = transport.recv() => {
                match incoming {
                    Some(Ok(packet)) => {
                        let username = session.borrow().as_ref().map(|s| s.username.clone());
                        handle_packet(&packet, &board, username.as_deref());
                    }
                    Some(Err(e)) => {
                        tracing::error!("Realtime transport error: {}", e);
                        break;
                    }
                    None => {
                        tracing::info!("Realtime transport closed");
                        break;
                    }
                }
            }
        }
    }
}

fn handle_packet(packet: &str, board: &SharedLeaderboard, username: Option<&str>) {
    match decode_event(packet) {
        Ok(Some(BroadcastEvent::LeaderboardUpdate(snapshot))) => {
            tracing::info!(
                "Leaderboard update received ({} entries)",
                snapshot.leaderboard.len()
            );
            board.apply_snapshot(snapshot, username, SnapshotOrigin::Broadcast);
        }
        Ok(None) => tracing::trace!("Ignoring packet {}", packet),
        Err(e) => tracing::warn!("Ignoring malformed broadcast: {}", e),
    }
}
