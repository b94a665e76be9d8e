//! Vault HTTP API access: the secret-store client and the secret payload shape.

pub mod client;
pub mod error;
pub mod secret;

pub use client::{SecretStore, TokenLookup, VaultClient};
pub use secret::Credentials;
