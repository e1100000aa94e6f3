//! Value objects - immutable types that represent domain concepts

mod flags;
mod permissions;
mod snowflake;

pub use flags::{FlagHandler, FlagTable, MESSAGE_FLAGS};
pub use permissions::{Permissions, PERMISSION_FLAGS};
pub use snowflake::{Snowflake, SnowflakeParseError};
