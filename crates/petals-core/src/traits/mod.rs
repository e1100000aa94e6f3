//! Collaborator traits (ports)

mod rest;

pub use rest::{
    AllowedMentions, CreateMessage, EditMessage, MessageReference, ReactionQuery, RestClient,
    RestResult,
};
