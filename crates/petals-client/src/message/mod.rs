//! Messages
//!
//! The materialized `Message`, the resolver and materializer that build it,
//! and the actions it exposes.

mod actions;
mod materializer;
mod model;
mod resolver;

pub use materializer::MessageMaterializer;
pub use model::{ChannelCell, Message};
pub use resolver::EntityResolver;
