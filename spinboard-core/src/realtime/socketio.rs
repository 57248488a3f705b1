//! Socket.IO v4 framing over a plain WebSocket.
//!
//! Only what the leaderboard broadcast needs: the namespace handshake,
//! heartbeat replies and event packets on the default namespace.

use crate::api::SnapshotPayload;
use crate::config::ClientConfig;
use crate::error::{Result, SpinboardError};
use crate::realtime::Transport;
use crate::types::Snapshot;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use reqwest::Url;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub const LEADERBOARD_EVENT: &str = "leaderboard-update";

// Engine.IO packet types
const EIO_OPEN: char = '0';
const EIO_CLOSE: &str = "1";
const EIO_PING: &str = "2";
const EIO_PONG: &str = "3";

// Socket.IO packets, already wrapped in an Engine.IO message
const SIO_CONNECT: &str = "40";
const SIO_DISCONNECT: &str = "41";
const SIO_EVENT: &str = "42";
const SIO_CONNECT_ERROR: &str = "44";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastEvent {
    LeaderboardUpdate(Snapshot),
}

/// Decodes a Socket.IO event packet.
///
/// Returns `Ok(None)` for anything that is not a recognised event, and an
/// error when a leaderboard event carries an unusable payload.
pub fn decode_event(packet: &str) -> Result<Option<BroadcastEvent>> {
    let Some(body) = packet.strip_prefix(SIO_EVENT) else {
        return Ok(None);
    };
    // Optional ack id precedes the argument array
    let body = body.trim_start_matches(|c: char| c.is_ascii_digit());
    if !body.starts_with('[') {
        // Packet addressed to another namespace
        return Ok(None);
    }

    let args: Vec<serde_json::Value> = serde_json::from_str(body)
        .map_err(|e| SpinboardError::protocol(format!("Invalid event packet: {}", e)))?;

    let mut args = args.into_iter();
    match args.next().as_ref().and_then(|name| name.as_str()) {
        Some(LEADERBOARD_EVENT) => {
            let data = args
                .next()
                .ok_or_else(|| SpinboardError::protocol("Leaderboard event without data"))?;
            let payload: SnapshotPayload = serde_json::from_value(data).map_err(|e| {
                SpinboardError::protocol(format!("Invalid leaderboard payload: {}", e))
            })?;
            Ok(Some(BroadcastEvent::LeaderboardUpdate(
                payload.into_snapshot()?,
            )))
        }
        _ => Ok(None),
    }
}

/// Builds the Engine.IO WebSocket endpoint for a service base address.
pub fn socket_url(base: &str) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| SpinboardError::config(format!("Invalid realtime URL '{}': {}", base, e)))?;

    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(SpinboardError::config(format!(
                "Unsupported realtime scheme '{}'",
                other
            )))
        }
    };
    url.set_scheme(scheme)
        .map_err(|_| SpinboardError::config("Cannot switch realtime URL to WebSocket"))?;
    url.set_path("/socket.io/");
    url.set_query(Some("EIO=4&transport=websocket"));
    Ok(url)
}

pub struct WebSocketTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WebSocketTransport {
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let url = socket_url(config.realtime_url())?;

        let (stream, _response) =
            tokio::time::timeout(config.connect_timeout, connect_async(url.as_str()))
                .await
                .map_err(|_| {
                    SpinboardError::Timeout(format!("Connecting to {} timed out", url))
                })?
                .map_err(|e| SpinboardError::network(format!("WebSocket error: {}", e)))?;

        let mut transport = Self { stream };
        transport.handshake().await?;
        tracing::info!("Realtime channel connected to {}", url);
        Ok(transport)
    }

    async fn handshake(&mut self) -> Result<()> {
        match self.next_text().await {
            Some(Ok(open)) if open.starts_with(EIO_OPEN) => {}
            Some(Ok(other)) => {
                return Err(SpinboardError::protocol(format!(
                    "Expected Engine.IO open packet, got '{}'",
                    other
                )))
            }
            Some(Err(e)) => return Err(e),
            None => return Err(SpinboardError::network("Closed during handshake")),
        }

        self.send_raw(SIO_CONNECT.to_string()).await
    }

    async fn next_text(&mut self) -> Option<Result<String>> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Some(Ok(text)),
                Some(Ok(Message::Close(_))) | None => return None,
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    return Some(Err(SpinboardError::network(format!(
                        "WebSocket error: {}",
                        e
                    ))))
                }
            }
        }
    }

    async fn send_raw(&mut self, text: String) -> Result<()> {
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(|e| SpinboardError::network(format!("WebSocket send failed: {}", e)))
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn recv(&mut self) -> Option<Result<String>> {
        loop {
            let packet = match self.next_text().await? {
                Ok(packet) => packet,
                Err(e) => return Some(Err(e)),
            };

            if packet == EIO_PING {
                if let Err(e) = self.send_raw(EIO_PONG.to_string()).await {
                    return Some(Err(e));
                }
                continue;
            }
            if packet == EIO_CLOSE || packet.starts_with(SIO_DISCONNECT) {
                return None;
            }
            if packet.starts_with(SIO_CONNECT_ERROR) {
                return Some(Err(SpinboardError::auth(format!(
                    "Namespace connection refused: {}",
                    &packet[SIO_CONNECT_ERROR.len()..]
                ))));
            }
            if packet.starts_with(SIO_EVENT) {
                return Some(Ok(packet));
            }
            tracing::trace!("Skipping packet {}", packet);
        }
    }

    async fn close(&mut self) -> Result<()> {
        let _ = self.send_raw(SIO_DISCONNECT.to_string()).await;
        self.stream
            .close(None)
            .await
            .map_err(|e| SpinboardError::network(format!("WebSocket close failed: {}", e)))
    }
}
