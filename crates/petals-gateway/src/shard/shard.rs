//! A single gateway shard

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use super::{ShardManager, ShardSettings};
use crate::events::GatewayEvent;
use crate::protocol::CloseCode;
use crate::transport::{ConnectionState, Transport, TransportFactory, TransportParams, TransportResult};

/// Shard state as seen by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShardState {
    Disconnected,
    Connected,
}

/// What every shard of one client shares
pub(crate) struct ShardContext {
    pub(crate) settings: ShardSettings,
    pub(crate) factory: Arc<dyn TransportFactory>,
    pub(crate) events: mpsc::Sender<GatewayEvent>,
}

/// One gateway connection slot, identified by its index
///
/// Holds at most one live transport. [`Shard::restart`] closes the current
/// one before a replacement is installed.
pub struct Shard {
    id: u32,
    transport: RwLock<Option<Arc<dyn Transport>>>,
    /// Serializes restarts so two replacements never interleave
    restart_lock: Mutex<()>,
    context: Arc<ShardContext>,
    manager: Weak<ShardManager>,
}

impl Shard {
    pub(crate) fn new(id: u32, context: Arc<ShardContext>, manager: Weak<ShardManager>) -> Self {
        Self {
            id,
            transport: RwLock::new(None),
            restart_lock: Mutex::new(()),
            context,
            manager,
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn state(&self) -> ShardState {
        match self.transport.read().as_ref() {
            Some(transport) if transport.state() == ConnectionState::Connected => ShardState::Connected,
            _ => ShardState::Disconnected,
        }
    }

    /// Heartbeat round trip of the current transport
    pub fn latency(&self) -> Option<Duration> {
        self.transport.read().as_ref().and_then(|t| t.latency())
    }

    /// The installed transport, if any
    pub fn transport(&self) -> Option<Arc<dyn Transport>> {
        self.transport.read().clone()
    }

    /// Connect if no transport is installed, then register
    pub async fn start(self: &Arc<Self>) -> TransportResult<()> {
        let _guard = self.restart_lock.lock().await;

        if self.transport.read().is_some() {
            debug!(shard_id = self.id, "Shard already started");
            return Ok(());
        }

        let transport = self.connect()?;
        self.install(transport);
        self.register();

        info!(shard_id = self.id, "Shard started");
        Ok(())
    }

    /// Replace the transport with a fresh one
    ///
    /// The old transport is closed with a normal closure and a
    /// [`GatewayEvent::ShardClose`] is emitted before the new one exists.
    pub async fn restart(self: &Arc<Self>) -> TransportResult<()> {
        let _guard = self.restart_lock.lock().await;

        let previous = self.transport.write().take();
        if let Some(previous) = previous {
            previous.close(CloseCode::NormalClosure.as_u16());
        }
        self.notify_closed().await;

        let transport = self.connect()?;
        self.install(transport);
        self.register();

        info!(shard_id = self.id, "Shard restarted");
        Ok(())
    }

    /// Close the transport for shutdown
    pub async fn close(&self) {
        let _guard = self.restart_lock.lock().await;

        let previous = self.transport.write().take();
        if let Some(previous) = previous {
            previous.close(CloseCode::NormalClosure.as_u16());
            self.notify_closed().await;
            info!(shard_id = self.id, "Shard closed");
        }
    }

    fn connect(&self) -> TransportResult<Arc<dyn Transport>> {
        let params = TransportParams {
            url: self.context.settings.gateway_url.clone(),
            shard_id: self.id,
            shard_count: self.context.settings.shard_count,
        };
        self.context.factory.connect(params, self.context.events.clone())
    }

    fn install(&self, transport: Arc<dyn Transport>) {
        if let Some(stale) = self.transport.write().replace(transport) {
            warn!(shard_id = self.id, "Closing stale transport");
            stale.close(CloseCode::NormalClosure.as_u16());
        }
    }

    fn register(self: &Arc<Self>) {
        match self.manager.upgrade() {
            Some(manager) => manager.register(self.clone()),
            None => debug!(shard_id = self.id, "Shard registry dropped"),
        }
    }

    async fn notify_closed(&self) {
        let event = GatewayEvent::ShardClose { shard_id: self.id };
        if self.context.events.send(event).await.is_err() {
            warn!(shard_id = self.id, "Event receiver dropped before shard close");
        }
    }
}

impl std::fmt::Debug for Shard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shard")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("latency", &self.latency())
            .finish()
    }
}
