//! WebSocket event stream from the studio backend.
//!
//! The backend pushes system updates and free-form log messages over a
//! single socket. Frames carrying a `metrics` object become
//! [`StudioEvent::SystemUpdate`]; everything else parseable becomes
//! [`StudioEvent::Message`]. Unparseable frames are logged and dropped,
//! never surfaced as errors.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, RwLock};
use tokio::time::{interval, timeout};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{debug, info, warn};

use crate::types::{SystemMetrics, WsMessage};

/// Configuration for the event stream connection.
#[derive(Debug, Clone)]
pub struct EventsConfig {
    /// WebSocket URL (e.g., "ws://localhost:8000/ws")
    pub ws_url: String,
    /// Connection timeout in seconds
    pub timeout_secs: u64,
    /// Heartbeat interval in seconds
    pub heartbeat_interval_secs: u64,
    /// Attempts before giving up on a connection
    pub reconnect_attempts: u32,
    /// Delay between attempts
    pub reconnect_delay: Duration,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            ws_url: "ws://localhost:8000/ws".to_string(),
            timeout_secs: 30,
            heartbeat_interval_secs: 30,
            reconnect_attempts: 5,
            reconnect_delay: Duration::from_secs(2),
        }
    }
}

impl EventsConfig {
    /// Derive the socket URL from an HTTP base URL.
    pub fn from_base_url(base_url: &str) -> Self {
        let ws_base = base_url
            .trim_end_matches('/')
            .replace("http://", "ws://")
            .replace("https://", "wss://");

        Self {
            ws_url: format!("{}/ws", ws_base),
            ..Default::default()
        }
    }
}

/// Events surfaced to the dashboard and REPL.
#[derive(Debug, Clone)]
pub enum StudioEvent {
    /// Live system metrics push.
    SystemUpdate { metrics: SystemMetrics },
    /// Log line or chat message from a backend service.
    Message(WsMessage),
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionState {
    pub connected: bool,
    pub last_event: Option<chrono::DateTime<chrono::Utc>>,
    pub error: Option<String>,
}

/// Client for the studio event stream.
pub struct EventsClient {
    config: EventsConfig,
    state: Arc<RwLock<ConnectionState>>,
    /// Channel for sending frames back to the backend
    outgoing_tx: Option<mpsc::UnboundedSender<WsMessage>>,
}

impl EventsClient {
    pub fn new(config: EventsConfig) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(ConnectionState::default())),
            outgoing_tx: None,
        }
    }

    pub async fn state(&self) -> ConnectionState {
        self.state.read().await.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.state.read().await.connected
    }

    /// Connect and return a receiver of studio events. Spawns reader and
    /// writer tasks; both mark the state disconnected on exit.
    pub async fn connect(&mut self) -> anyhow::Result<mpsc::UnboundedReceiver<StudioEvent>> {
        let url = &self.config.ws_url;

        info!("Connecting event stream to: {}", url);

        let (ws_stream, _) = timeout(
            Duration::from_secs(self.config.timeout_secs),
            connect_async(url),
        )
        .await??;

        let (mut write, mut read) = ws_stream.split();

        let (outgoing_tx, mut outgoing_rx) = mpsc::unbounded_channel::<WsMessage>();
        let (event_tx, event_rx) = mpsc::unbounded_channel::<StudioEvent>();

        self.outgoing_tx = Some(outgoing_tx);

        {
            let mut state = self.state.write().await;
            state.connected = true;
            state.error = None;
        }

        let heartbeat_interval = self.config.heartbeat_interval_secs;

        // Writer task: outgoing messages plus keepalive pings
        let writer_state = self.state.clone();
        tokio::spawn(async move {
            let mut heartbeat = interval(Duration::from_secs(heartbeat_interval));

            loop {
                tokio::select! {
                    msg = outgoing_rx.recv() => {
                        let Some(msg) = msg else { break };
                        match serde_json::to_string(&msg) {
                            Ok(json) => {
                                if write.send(Message::Text(json)).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                warn!("Failed to serialize outgoing message: {}", e);
                            }
                        }
                    }
                    _ = heartbeat.tick() => {
                        if write.send(Message::Ping(Vec::new())).await.is_err() {
                            break;
                        }
                    }
                }
            }

            let mut s = writer_state.write().await;
            s.connected = false;
        });

        // Reader task: parse frames into events
        let reader_state = self.state.clone();
        tokio::spawn(async move {
            while let Some(msg_result) = read.next().await {
                match msg_result {
                    Ok(Message::Text(text)) => match parse_event(&text) {
                        Some(event) => {
                            {
                                let mut s = reader_state.write().await;
                                s.last_event = Some(chrono::Utc::now());
                            }
                            if event_tx.send(event).is_err() {
                                break;
                            }
                        }
                        None => {
                            debug!("Dropping unparseable event frame: {}", text);
                        }
                    },
                    Ok(Message::Close(_)) => {
                        info!("Event stream closed by server");
                        break;
                    }
                    Err(e) => {
                        warn!("Event stream error: {}", e);
                        let mut s = reader_state.write().await;
                        s.error = Some(e.to_string());
                        break;
                    }
                    _ => {}
                }
            }

            let mut s = reader_state.write().await;
            s.connected = false;
        });

        info!("Event stream connected");

        Ok(event_rx)
    }

    /// Connect with a bounded retry budget.
    pub async fn connect_with_retry(
        &mut self,
    ) -> anyhow::Result<mpsc::UnboundedReceiver<StudioEvent>> {
        let attempts = self.config.reconnect_attempts.max(1);
        let mut last_err = None;

        for attempt in 1..=attempts {
            match self.connect().await {
                Ok(rx) => return Ok(rx),
                Err(e) => {
                    warn!(attempt, attempts, "event stream connect failed: {}", e);
                    last_err = Some(e);
                    if attempt < attempts {
                        tokio::time::sleep(self.config.reconnect_delay).await;
                    }
                }
            }
        }

        {
            let mut state = self.state.write().await;
            state.error = last_err.as_ref().map(|e| e.to_string());
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("event stream connect failed")))
    }

    /// Send a message to the backend over the socket.
    pub fn send(&self, msg: WsMessage) -> anyhow::Result<()> {
        match &self.outgoing_tx {
            Some(tx) => {
                tx.send(msg)
                    .map_err(|_| anyhow::anyhow!("event stream channel closed"))?;
                Ok(())
            }
            None => Err(anyhow::anyhow!("event stream not connected")),
        }
    }

    pub async fn disconnect(&mut self) {
        self.outgoing_tx = None;

        let mut state = self.state.write().await;
        state.connected = false;
    }
}

/// Classify a text frame. Frames with a `metrics` object are system
/// updates; anything else that parses as a message is a message.
fn parse_event(text: &str) -> Option<StudioEvent> {
    let msg: WsMessage = serde_json::from_str(text).ok()?;

    if let Some(metrics) = msg.metrics {
        return Some(StudioEvent::SystemUpdate { metrics });
    }

    Some(StudioEvent::Message(msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_url_derived_from_http_base() {
        let config = EventsConfig::from_base_url("http://localhost:8000");
        assert_eq!(config.ws_url, "ws://localhost:8000/ws");
    }

    #[test]
    fn ws_url_derived_from_https_base() {
        let config = EventsConfig::from_base_url("https://studio.example.com/");
        assert_eq!(config.ws_url, "wss://studio.example.com/ws");
    }

    #[test]
    fn metrics_frames_become_system_updates() {
        let frame = r#"{"source": "monitor", "metrics": {"cpu_load": 42.5, "memory_percent": 61.0}}"#;
        match parse_event(frame) {
            Some(StudioEvent::SystemUpdate { metrics }) => {
                assert_eq!(metrics.cpu_load, 42.5);
                assert_eq!(metrics.memory_percent, 61.0);
            }
            other => panic!("expected SystemUpdate, got {other:?}"),
        }
    }

    #[test]
    fn plain_frames_become_messages() {
        let frame = r#"{"id": "m1", "source": "nora", "message": "render complete", "level": "info"}"#;
        match parse_event(frame) {
            Some(StudioEvent::Message(msg)) => {
                assert_eq!(msg.source, "nora");
                assert_eq!(msg.message, "render complete");
            }
            other => panic!("expected Message, got {other:?}"),
        }
    }

    #[test]
    fn garbage_frames_are_dropped() {
        assert!(parse_event("not json at all").is_none());
    }

    #[tokio::test]
    async fn fresh_client_is_disconnected() {
        let client = EventsClient::new(EventsConfig::default());
        assert!(!client.is_connected().await);
    }
}
