//! WebSocket transport
//!
//! Connects, waits for Hello, identifies with the shard pair, then runs the
//! heartbeat and read loop until the peer drops or the owner closes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode as WsCloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use super::{ConnectionState, Transport, TransportError, TransportFactory, TransportParams, TransportResult};
use crate::events::{DispatchEvent, EventType, GatewayEvent};
use crate::protocol::{CloseCode, GatewayMessage, HelloPayload, IdentifyPayload, OpCode};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const DEFAULT_CONNECT_ATTEMPTS: u32 = 5;
const MAX_BACKOFF: Duration = Duration::from_secs(30);

// ============================================================================
// Factory
// ============================================================================

/// Builds [`WsTransport`]s that identify with a fixed token and intents
pub struct WsTransportFactory {
    token: String,
    intents: u64,
    connect_attempts: u32,
}

impl WsTransportFactory {
    #[must_use]
    pub fn new(token: impl Into<String>, intents: u64) -> Self {
        Self {
            token: token.into(),
            intents,
            connect_attempts: DEFAULT_CONNECT_ATTEMPTS,
        }
    }

    /// Socket open attempts before the transport gives up
    #[must_use]
    pub fn with_connect_attempts(mut self, attempts: u32) -> Self {
        self.connect_attempts = attempts.max(1);
        self
    }
}

impl std::fmt::Debug for WsTransportFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsTransportFactory")
            .field("token", &"[REDACTED]")
            .field("intents", &self.intents)
            .field("connect_attempts", &self.connect_attempts)
            .finish()
    }
}

impl TransportFactory for WsTransportFactory {
    fn connect(
        &self,
        params: TransportParams,
        events: mpsc::Sender<GatewayEvent>,
    ) -> TransportResult<Arc<dyn Transport>> {
        let identify = GatewayMessage::identify(&IdentifyPayload::for_shard(
            self.token.clone(),
            self.intents,
            params.shard_id,
            params.shard_count,
        ))?
        .to_json()?;

        let shared = Arc::new(Shared::default());
        let (close_tx, close_rx) = oneshot::channel();

        let session = Session {
            params,
            identify,
            connect_attempts: self.connect_attempts,
            shared: shared.clone(),
            events,
        };
        tokio::spawn(session.run(close_rx));

        Ok(Arc::new(WsTransport {
            shared,
            close_tx: Mutex::new(Some(close_tx)),
        }))
    }
}

// ============================================================================
// Transport handle
// ============================================================================

#[derive(Debug)]
struct Shared {
    state: RwLock<ConnectionState>,
    latency: RwLock<Option<Duration>>,
}

impl Default for Shared {
    fn default() -> Self {
        Self {
            state: RwLock::new(ConnectionState::Connecting),
            latency: RwLock::new(None),
        }
    }
}

impl Shared {
    fn set_state(&self, state: ConnectionState) {
        *self.state.write() = state;
    }

    /// Move to `Connected` unless the owner already closed the transport
    fn mark_connected(&self) -> bool {
        let mut state = self.state.write();
        if *state == ConnectionState::Disconnected {
            return false;
        }
        *state = ConnectionState::Connected;
        true
    }
}

/// Handle to a running WebSocket session
#[derive(Debug)]
pub struct WsTransport {
    shared: Arc<Shared>,
    close_tx: Mutex<Option<oneshot::Sender<u16>>>,
}

impl Transport for WsTransport {
    fn close(&self, code: u16) {
        self.shared.set_state(ConnectionState::Disconnected);
        if let Some(tx) = self.close_tx.lock().take() {
            // The session may already be gone
            let _ = tx.send(code);
        }
    }

    fn latency(&self) -> Option<Duration> {
        *self.shared.latency.read()
    }

    fn state(&self) -> ConnectionState {
        *self.shared.state.read()
    }
}

// ============================================================================
// Session task
// ============================================================================

type WsWrite = SplitSink<WsStream, WsMessage>;
type WsRead = SplitStream<WsStream>;

/// How the read loop ended
enum Exit {
    /// The owner asked for the close; nothing is reported
    Closed,
    /// The connection dropped on its own
    Dropped { code: Option<u16>, reconnect: bool },
    /// Nobody is listening for events anymore
    ReceiverGone,
}

impl Exit {
    fn peer_closed(code: Option<u16>) -> Self {
        Self::Dropped {
            code,
            reconnect: code.map_or(true, CloseCode::is_reconnectable),
        }
    }
}

/// How the wait for Hello ended
enum Handshake {
    Hello(HelloPayload),
    Ended(Exit),
}

struct Session {
    params: TransportParams,
    identify: String,
    connect_attempts: u32,
    shared: Arc<Shared>,
    events: mpsc::Sender<GatewayEvent>,
}

impl Session {
    async fn run(self, mut close_rx: oneshot::Receiver<u16>) {
        let shard_id = self.params.shard_id;

        let stream = tokio::select! {
            _ = &mut close_rx => {
                self.shared.set_state(ConnectionState::Disconnected);
                return;
            }
            result = self.open() => match result {
                Ok(stream) => stream,
                Err(e) => {
                    error!(shard_id, error = %e, "Gateway connection failed");
                    self.shared.set_state(ConnectionState::Disconnected);
                    self.report_drop(None, false).await;
                    return;
                }
            }
        };

        let exit = match self.drive(stream, &mut close_rx).await {
            Ok(exit) => exit,
            Err(e) => {
                warn!(shard_id, error = %e, "Gateway session failed");
                Exit::Dropped { code: None, reconnect: true }
            }
        };
        self.shared.set_state(ConnectionState::Disconnected);

        // A close that raced a peer drop still counts as the owner's
        let exit = match exit {
            Exit::Dropped { .. } if close_rx.try_recv().is_ok() => Exit::Closed,
            exit => exit,
        };

        match exit {
            Exit::Closed => debug!(shard_id, "Transport closed by owner"),
            Exit::ReceiverGone => debug!(shard_id, "Event receiver dropped"),
            Exit::Dropped { code, reconnect } => self.report_drop(code, reconnect).await,
        }
    }

    async fn report_drop(&self, code: Option<u16>, reconnect: bool) {
        let shard_id = self.params.shard_id;
        info!(shard_id, ?code, reconnect, "Shard disconnected");
        let _ = self
            .events
            .send(GatewayEvent::ShardDisconnected { shard_id, code, reconnect })
            .await;
    }

    /// Open the socket, retrying with exponential backoff
    async fn open(&self) -> TransportResult<WsStream> {
        let mut delay = Duration::from_secs(1);
        let mut attempt = 1;

        loop {
            match connect_async(self.params.url.as_str()).await {
                Ok((stream, _)) => return Ok(stream),
                Err(e) if attempt < self.connect_attempts => {
                    warn!(
                        shard_id = self.params.shard_id,
                        attempt,
                        error = %e,
                        "Gateway connect failed, retrying in {:?}",
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(MAX_BACKOFF);
                    attempt += 1;
                }
                Err(e) => return Err(TransportError::Connect(e.to_string())),
            }
        }
    }

    /// Send a close frame for an owner-requested close
    async fn close_with(write: &mut WsWrite, code: u16) -> Exit {
        let frame = CloseFrame { code: WsCloseCode::from(code), reason: "".into() };
        let _ = write.send(WsMessage::Close(Some(frame))).await;
        Exit::Closed
    }

    /// Wait for the Hello frame that opens every session
    async fn await_hello(read: &mut WsRead) -> TransportResult<Handshake> {
        loop {
            match read.next().await {
                Some(Ok(WsMessage::Text(text))) => {
                    let frame = GatewayMessage::from_json(&text)?;
                    let hello = frame.as_hello().ok_or_else(|| {
                        TransportError::Protocol(format!("expected Hello, got op {}", frame.op))
                    })?;
                    if hello.heartbeat_interval == 0 {
                        return Err(TransportError::Protocol("zero heartbeat interval".into()));
                    }
                    return Ok(Handshake::Hello(hello));
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    let code = frame.map(|f| u16::from(f.code));
                    return Ok(Handshake::Ended(Exit::peer_closed(code)));
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(TransportError::WebSocket(e.to_string())),
                None => return Err(TransportError::Protocol("stream ended before Hello".into())),
            }
        }
    }

    async fn drive(
        &self,
        stream: WsStream,
        close_rx: &mut oneshot::Receiver<u16>,
    ) -> TransportResult<Exit> {
        let shard_id = self.params.shard_id;
        let (mut write, mut read) = stream.split();

        // The owner may close at any point of the handshake
        let handshake = tokio::select! {
            code = &mut *close_rx => {
                return Ok(Self::close_with(&mut write, code.unwrap_or(1000)).await);
            }
            handshake = Self::await_hello(&mut read) => handshake?,
        };
        let hello = match handshake {
            Handshake::Hello(hello) => hello,
            Handshake::Ended(exit) => return Ok(exit),
        };
        debug!(shard_id, interval_ms = hello.heartbeat_interval, "Received Hello");

        let closed = tokio::select! {
            code = &mut *close_rx => Some(code.unwrap_or(1000)),
            sent = write.send(WsMessage::Text(self.identify.clone().into())) => {
                sent.map_err(|e| TransportError::WebSocket(e.to_string()))?;
                None
            }
        };
        if let Some(code) = closed {
            return Ok(Self::close_with(&mut write, code).await);
        }

        if !self.shared.mark_connected() {
            let code = close_rx.try_recv().unwrap_or(1000);
            return Ok(Self::close_with(&mut write, code).await);
        }
        info!(shard_id, shard_count = self.params.shard_count, "Shard identified");
        if self.events.send(GatewayEvent::ShardConnected { shard_id }).await.is_err() {
            return Ok(Exit::ReceiverGone);
        }

        let mut heartbeat = tokio::time::interval(Duration::from_millis(hello.heartbeat_interval));
        // The first tick fires immediately
        heartbeat.tick().await;

        let mut sequence: Option<u64> = None;
        let mut acked = true;
        let mut sent_at: Option<Instant> = None;

        loop {
            tokio::select! {
                code = &mut *close_rx => {
                    return Ok(Self::close_with(&mut write, code.unwrap_or(1000)).await);
                }
                _ = heartbeat.tick() => {
                    if !acked {
                        warn!(shard_id, "Heartbeat not acknowledged, dropping zombie connection");
                        let frame = CloseFrame {
                            code: WsCloseCode::from(CloseCode::UnknownError.as_u16()),
                            reason: "".into(),
                        };
                        let _ = write.send(WsMessage::Close(Some(frame))).await;
                        return Ok(Exit::Dropped { code: None, reconnect: true });
                    }
                    let payload = GatewayMessage::heartbeat(sequence).to_json()?;
                    write
                        .send(WsMessage::Text(payload.into()))
                        .await
                        .map_err(|e| TransportError::WebSocket(e.to_string()))?;
                    acked = false;
                    sent_at = Some(Instant::now());
                }
                msg = read.next() => match msg {
                    Some(Ok(WsMessage::Text(text))) => {
                        let frame = match GatewayMessage::from_json(&text) {
                            Ok(frame) => frame,
                            Err(e) => {
                                warn!(shard_id, error = %e, "Dropping unparseable frame");
                                continue;
                            }
                        };
                        if frame.s.is_some() {
                            sequence = frame.s;
                        }

                        match frame.op {
                            OpCode::Dispatch => {
                                let event = DispatchEvent {
                                    event_type: EventType::from(frame.t.as_deref().unwrap_or_default()),
                                    sequence: frame.s,
                                    data: frame.d.unwrap_or(Value::Null),
                                };
                                if self.events.send(GatewayEvent::Dispatch { shard_id, event }).await.is_err() {
                                    return Ok(Exit::ReceiverGone);
                                }
                            }
                            OpCode::HeartbeatAck => {
                                acked = true;
                                if let Some(at) = sent_at {
                                    *self.shared.latency.write() = Some(at.elapsed());
                                }
                            }
                            OpCode::Heartbeat => {
                                let payload = GatewayMessage::heartbeat(sequence).to_json()?;
                                write
                                    .send(WsMessage::Text(payload.into()))
                                    .await
                                    .map_err(|e| TransportError::WebSocket(e.to_string()))?;
                            }
                            OpCode::Reconnect => {
                                info!(shard_id, "Gateway requested reconnect");
                                return Ok(Exit::Dropped { code: None, reconnect: true });
                            }
                            OpCode::InvalidSession => {
                                warn!(shard_id, resumable = ?frame.as_invalid_session(), "Invalid session");
                                return Ok(Exit::Dropped { code: None, reconnect: true });
                            }
                            op => debug!(shard_id, %op, "Ignoring frame"),
                        }
                    }
                    Some(Ok(WsMessage::Close(frame))) => {
                        return Ok(Exit::peer_closed(frame.map(|f| u16::from(f.code))));
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(TransportError::WebSocket(e.to_string())),
                    None => return Ok(Exit::Dropped { code: None, reconnect: true }),
                }
            }
        }
    }
}
