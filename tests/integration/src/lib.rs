//! Integration test utilities for the petals client
//!
//! Recording REST mock, scripted gateway transports, and payload fixtures
//! for driving the client end to end without a network.

pub mod fixtures;

pub use fixtures::*;
pub use helpers::*;
