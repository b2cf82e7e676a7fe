//! Authentication module for managing bearer tokens and stored credentials.
//!
//! This module provides:
//! - `SecretStore`: OS-level credential storage via keyring (plus an
//!   in-memory store for tests)
//! - `TokenCache`: the on-disk record of the last issued bearer token
//! - `TokenManager`: decides whether the cached token is usable and
//!   re-authenticates when it is not
//!
//! A warm cache means zero outbound calls; a cold or expired cache costs
//! exactly one authentication round trip.

pub mod credentials;
pub mod error;
pub mod manager;
pub mod token;

pub use credentials::{
    CredentialPrompt, Credentials, KeyringSecretStore, MemorySecretStore, SecretStore,
    PASSWORD_KEY, URL_KEY, USERNAME_KEY,
};
pub use error::AuthError;
pub use manager::{Session, TokenManager, TokenOutcome, TokenSource};
pub use token::{CacheMiss, FileTokenCache, MemoryTokenCache, TokenCache, TokenRecord};
