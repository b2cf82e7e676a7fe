//! REST API client module for the MDM backend.
//!
//! This module provides the `ApiClient` for exchanging operator credentials
//! for a bearer token and for querying the computer inventory.
//!
//! Authentication uses HTTP Basic against `/api/v1/auth/token`; every other
//! call presents the resulting bearer token.

pub mod client;
pub mod error;

pub use client::{ApiClient, DeviceFilter, InventorySection, DEVICE_TABLE_SECTIONS};
pub use error::ApiError;
