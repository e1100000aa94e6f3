//! # petals-client
//!
//! Client layer: materialized messages and their actions, the HTTP REST
//! client, and the dispatch loop that ties shards to the caches.
//!
//! ## Example
//!
//! ```ignore
//! use petals_client::{Client, ClientEvent};
//! use petals_common::ClientConfig;
//!
//! let config = ClientConfig::from_env()?;
//! let (client, mut events) = Client::new(&config)?;
//! client.start().await?;
//!
//! while let Some(event) = events.recv().await {
//!     if let ClientEvent::MessageCreate(message) = event {
//!         if message.content.as_deref() == Some("!ping") {
//!             message.reply("pong").await?;
//!         }
//!     }
//! }
//! ```

pub mod client;
pub mod context;
pub mod error;
pub mod events;
pub mod http;
pub mod message;

pub use client::Client;
pub use context::{ClientContext, DEFAULT_MAX_REFERENCE_DEPTH};
pub use error::{ClientError, ClientResult};
pub use events::ClientEvent;
pub use http::HttpClient;
pub use message::{ChannelCell, EntityResolver, Message, MessageMaterializer};
