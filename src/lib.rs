//! # Vault Login Library
//!
//! Docker credential helper backed by HashiCorp Vault: reuses Vault tokens
//! cached in sinks, logs in again when none works, and reads the registry
//! username/password from a Vault secret.
//!
//! Modules:
//! - `config`: YAML configuration, defaults and validation
//! - `cache`: cached token record and the sink reader
//! - `auth`: login methods (approle, jwt, kubernetes, token)
//! - `sinks`: token persistence targets
//! - `tasks`: login and sink-write tasks of the fresh-login path
//! - `helper`: credential-retrieval orchestration
//! - `protocol`: docker credential-helper protocol

pub mod auth;
pub mod cache;
pub mod config;
pub mod helper;
pub mod helpers;
pub mod protocol;
pub mod resilience;
pub mod sinks;
pub mod tasks;
pub mod utils;
pub mod vault;
#[cfg(test)]
pub mod tests;

pub use crate::config::types::ServiceConfig;
pub use crate::helper::{Helper, HelperOptions, RetrievalOutcome};
