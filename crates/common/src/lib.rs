//! Payload types and errors shared across `hello-api-svc` crates.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
