//! Client and dispatch loop
//!
//! The client owns the shard registry and one dispatch task. Shards feed
//! gateway events into a single channel; the dispatch task keeps the caches
//! current, materializes messages, and forwards `ClientEvent`s.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use petals_cache::ClientCache;
use petals_common::ClientConfig;
use petals_core::{
    Channel, ChannelPayload, Guild, GuildPayload, MessagePayload, RestClient, Role, User,
};
use petals_gateway::events::{GuildDeleteEvent, MessageDeleteEvent, ReadyEvent};
use petals_gateway::{
    DispatchEvent, EventType, GatewayEvent, ShardManager, ShardSettings, TransportFactory,
    WsTransportFactory,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::context::ClientContext;
use crate::error::{ClientError, ClientResult};
use crate::events::ClientEvent;
use crate::http::HttpClient;
use crate::message::{Message, MessageMaterializer};

/// Capacity of the gateway and application event channels
const EVENT_BUFFER: usize = 256;

/// Gateway client
pub struct Client {
    ctx: Arc<ClientContext>,
    shards: Arc<ShardManager>,
    gateway_rx: Mutex<Option<mpsc::Receiver<GatewayEvent>>>,
    events: mpsc::Sender<ClientEvent>,
    restart_on_disconnect: bool,
}

impl Client {
    /// Build a client with the HTTP REST client and WebSocket transports
    pub fn new(config: &ClientConfig) -> ClientResult<(Self, mpsc::Receiver<ClientEvent>)> {
        let http = Arc::new(HttpClient::new(config)?);
        let factory = Arc::new(WsTransportFactory::new(config.token.clone(), config.intents));
        Ok(Self::with_parts(config, http, factory))
    }

    /// Build a client around caller-supplied collaborators
    pub fn with_parts(
        config: &ClientConfig,
        http: Arc<dyn RestClient>,
        factory: Arc<dyn TransportFactory>,
    ) -> (Self, mpsc::Receiver<ClientEvent>) {
        let ctx = ClientContext::new(http, ClientCache::new_shared())
            .with_max_reference_depth(config.max_reference_depth)
            .into_shared();

        let (gateway_tx, gateway_rx) = mpsc::channel(EVENT_BUFFER);
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);

        let settings = ShardSettings {
            gateway_url: config.gateway_url.clone(),
            shard_count: config.shard_count,
        };
        let shards = ShardManager::new(settings, factory, gateway_tx);

        let client = Self {
            ctx,
            shards,
            gateway_rx: Mutex::new(Some(gateway_rx)),
            events: events_tx,
            restart_on_disconnect: config.restart_on_disconnect,
        };
        (client, events_rx)
    }

    /// Spawn the dispatch task and connect every shard
    pub async fn start(&self) -> ClientResult<JoinHandle<()>> {
        let gateway_rx = self.gateway_rx.lock().take().ok_or(ClientError::AlreadyStarted)?;

        let dispatcher = Dispatcher {
            ctx: Arc::clone(&self.ctx),
            materializer: MessageMaterializer::new(Arc::clone(&self.ctx)),
            shards: Arc::downgrade(&self.shards),
            events: self.events.clone(),
            restart_on_disconnect: self.restart_on_disconnect,
        };
        let handle = tokio::spawn(dispatcher.run(gateway_rx));

        self.shards.start_all().await?;
        info!(shard_count = self.shards.len(), "Client started");
        Ok(handle)
    }

    /// Close every shard
    pub async fn shutdown(&self) {
        self.shards.close_all().await;
        info!("Client shut down");
    }

    // === Accessors ===

    pub fn context(&self) -> &Arc<ClientContext> {
        &self.ctx
    }

    pub fn cache(&self) -> &Arc<ClientCache> {
        self.ctx.cache()
    }

    pub fn shards(&self) -> &Arc<ShardManager> {
        &self.shards
    }

    pub fn current_user(&self) -> Option<Arc<User>> {
        self.ctx.current_user()
    }

    /// Mean heartbeat latency across shards
    pub fn latency(&self) -> Option<Duration> {
        self.shards.average_latency()
    }

    /// Materialize a message payload obtained outside the gateway
    pub fn materialize(&self, payload: &MessagePayload) -> Message {
        MessageMaterializer::new(Arc::clone(&self.ctx)).materialize(payload)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("ctx", &self.ctx)
            .field("shards", &self.shards)
            .field("restart_on_disconnect", &self.restart_on_disconnect)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Dispatch
// ============================================================================

struct Dispatcher {
    ctx: Arc<ClientContext>,
    materializer: MessageMaterializer,
    /// Weak so the loop ends once the client and its shards are gone
    shards: Weak<ShardManager>,
    events: mpsc::Sender<ClientEvent>,
    restart_on_disconnect: bool,
}

impl Dispatcher {
    async fn run(self, mut gateway_rx: mpsc::Receiver<GatewayEvent>) {
        while let Some(event) = gateway_rx.recv().await {
            let shard_id = event.shard_id();
            match self.handle(event) {
                Ok(event) => {
                    let name = event.name();
                    if self.events.send(event).await.is_err() {
                        debug!(shard_id, event = name, "Application receiver dropped");
                    }
                }
                Err(e) => warn!(shard_id, error = %e, "Failed to handle gateway event"),
            }
        }
        debug!("Dispatch loop finished");
    }

    fn handle(&self, event: GatewayEvent) -> ClientResult<ClientEvent> {
        match event {
            GatewayEvent::ShardConnected { shard_id } => Ok(ClientEvent::ShardReady { shard_id }),
            GatewayEvent::ShardClose { shard_id } => Ok(ClientEvent::ShardClose { shard_id }),
            GatewayEvent::ShardDisconnected { shard_id, code, reconnect } => {
                if reconnect && self.restart_on_disconnect {
                    self.schedule_restart(shard_id);
                }
                Ok(ClientEvent::ShardDisconnected { shard_id, code, reconnect })
            }
            GatewayEvent::Dispatch { shard_id, event } => self.dispatch(shard_id, event),
        }
    }

    /// Restart on a separate task; the restart emits into the channel this loop drains
    fn schedule_restart(&self, shard_id: u32) {
        let Some(shards) = self.shards.upgrade() else {
            return;
        };
        tokio::spawn(async move {
            info!(shard_id, "Restarting shard after disconnect");
            if let Err(e) = shards.restart(shard_id).await {
                warn!(shard_id, error = %e, "Shard restart failed");
            }
        });
    }

    fn dispatch(&self, shard_id: u32, event: DispatchEvent) -> ClientResult<ClientEvent> {
        let cache = self.ctx.cache();
        let event_type = event.event_type.clone();

        let client_event = match event_type {
            EventType::Ready => {
                let ready: ReadyEvent = decode(event.data)?;
                let user = User::from_payload(&ready.user);
                cache.upsert_user(user.clone());
                let user = self.ctx.set_current_user(user);
                self.ctx.set_session_id(ready.session_id.clone());
                info!(shard_id, user_id = %user.id, guilds = ready.guilds.len(), "Session ready");
                ClientEvent::Ready {
                    shard_id,
                    user,
                    session_id: ready.session_id,
                }
            }
            EventType::GuildCreate | EventType::GuildUpdate => {
                let payload: GuildPayload = decode(event.data)?;
                let guild = self.cache_guild(&payload);
                if event_type == EventType::GuildCreate {
                    ClientEvent::GuildCreate(guild)
                } else {
                    ClientEvent::GuildUpdate(guild)
                }
            }
            EventType::GuildDelete => {
                let payload: GuildDeleteEvent = decode(event.data)?;
                cache.remove_guild(payload.id);
                ClientEvent::GuildDelete {
                    guild_id: payload.id,
                    unavailable: payload.unavailable,
                }
            }
            EventType::ChannelCreate | EventType::ChannelUpdate => {
                let payload: ChannelPayload = decode(event.data)?;
                let channel = Channel::from_payload(&payload);
                let shared = cache
                    .upsert_channel(channel.clone())
                    .unwrap_or_else(|| Arc::new(channel));
                if event_type == EventType::ChannelCreate {
                    ClientEvent::ChannelCreate(shared)
                } else {
                    ClientEvent::ChannelUpdate(shared)
                }
            }
            EventType::ChannelDelete => {
                let payload: ChannelPayload = decode(event.data)?;
                let channel = Channel::from_payload(&payload);
                cache.remove_channel(&channel);
                ClientEvent::ChannelDelete(channel)
            }
            EventType::MessageCreate | EventType::MessageUpdate => {
                let payload: MessagePayload = decode(event.data)?;
                let message = Box::new(self.materializer.materialize(&payload));
                if event_type == EventType::MessageCreate {
                    ClientEvent::MessageCreate(message)
                } else {
                    ClientEvent::MessageUpdate(message)
                }
            }
            EventType::MessageDelete => {
                let payload: MessageDeleteEvent = decode(event.data)?;
                ClientEvent::MessageDelete {
                    id: payload.id,
                    channel_id: payload.channel_id,
                    guild_id: payload.guild_id,
                }
            }
            _ => {
                debug!(shard_id, event = %event.event_type, "Forwarding unhandled dispatch");
                ClientEvent::Unhandled { shard_id, event }
            }
        };

        Ok(client_event)
    }

    /// Cache a guild with its channels and roles
    fn cache_guild(&self, payload: &GuildPayload) -> Arc<Guild> {
        let guild = Guild::from_payload(payload);
        let guild_id = guild.id;

        // Channels inside a guild payload omit their guild id
        let channels = payload
            .channels
            .iter()
            .map(|channel| {
                let mut channel = Channel::from_payload(channel);
                if channel.guild_id.is_none() {
                    channel.guild_id = Some(guild_id);
                }
                channel
            })
            .collect();
        let roles = payload
            .roles
            .iter()
            .map(|role| Role::from_payload(role, guild_id))
            .collect();

        self.ctx.cache().insert_guild(guild, channels, roles)
    }
}

fn decode<T: DeserializeOwned>(data: Value) -> ClientResult<T> {
    Ok(serde_json::from_value(data)?)
}
