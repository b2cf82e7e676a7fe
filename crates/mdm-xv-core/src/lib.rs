//! Core library for mdm-xv.
//!
//! Provides the pieces the `mdm-xv` binary is built from:
//! - [`auth`]: credential storage, the on-disk token cache and the
//!   [`TokenManager`](auth::TokenManager) that decides when to re-authenticate
//! - [`api`]: HTTP client for the MDM authentication and inventory endpoints
//! - [`models`]: typed inventory records
//! - [`config`]: file locations and runtime settings

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthError, Credentials, TokenManager, TokenRecord};
pub use config::Config;
