//! Error types

mod domain_error;
mod rest_error;

pub use domain_error::DomainError;
pub use rest_error::RestError;
