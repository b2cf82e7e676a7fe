//! API client for the MDM REST API.
//!
//! This module provides the `ApiClient` struct for exchanging credentials for
//! a bearer token and for filtered computer-inventory queries.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::{Credentials, TokenRecord};
use crate::models::ComputerInventoryResponse;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

const AUTH_TOKEN_PATH: &str = "/api/v1/auth/token";

const COMPUTERS_INVENTORY_PATH: &str = "/api/v1/computers-inventory";

/// Inventory sections the device table draws from.
pub const DEVICE_TABLE_SECTIONS: [InventorySection; 5] = [
    InventorySection::General,
    InventorySection::Hardware,
    InventorySection::UserAndLocation,
    InventorySection::OperatingSystem,
    InventorySection::DiskEncryption,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventorySection {
    General,
    Hardware,
    UserAndLocation,
    OperatingSystem,
    DiskEncryption,
}

impl InventorySection {
    pub fn as_str(&self) -> &'static str {
        match self {
            InventorySection::General => "GENERAL",
            InventorySection::Hardware => "HARDWARE",
            InventorySection::UserAndLocation => "USER_AND_LOCATION",
            InventorySection::OperatingSystem => "OPERATING_SYSTEM",
            InventorySection::DiskEncryption => "DISK_ENCRYPTION",
        }
    }
}

/// Equality filters supported by the lookup commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceFilter {
    SerialNumber(String),
    Email(String),
}

impl DeviceFilter {
    fn field(&self) -> &'static str {
        match self {
            DeviceFilter::SerialNumber(_) => "hardware.serialNumber",
            DeviceFilter::Email(_) => "userAndLocation.email",
        }
    }

    fn value(&self) -> &str {
        match self {
            DeviceFilter::SerialNumber(v) | DeviceFilter::Email(v) => v,
        }
    }

    /// Render as an RSQL expression, e.g. `hardware.serialNumber=="C02XYZ"`.
    pub fn to_rsql(&self) -> String {
        let escaped = self.value().replace('\\', "\\\\").replace('"', "\\\"");
        format!("{}==\"{}\"", self.field(), escaped)
    }
}

impl fmt::Display for DeviceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rsql())
    }
}

/// API client for the MDM server.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// Create a client with no request timeout
    pub fn new() -> Result<Self, ApiError> {
        Self::with_timeout(None)
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Exchange operator credentials for a bearer token.
    ///
    /// Single attempt: any non-200 status, transport failure or unparseable
    /// body is returned as-is.
    pub async fn authenticate(&self, creds: &Credentials) -> Result<TokenRecord, ApiError> {
        let url = endpoint(&creds.base_url, AUTH_TOKEN_PATH);
        debug!(url = %url, username = %creds.username, "Requesting bearer token");

        let response = self
            .client
            .post(&url)
            .basic_auth(&creds.username, Some(&creds.password))
            .send()
            .await?;

        let record: TokenRecord = Self::read_json(response).await?;
        if record.token.is_empty() {
            return Err(ApiError::InvalidResponse(
                "token response contained an empty token".to_string(),
            ));
        }

        debug!(expires_at = %record.expires_at, "Bearer token issued");
        Ok(record)
    }

    /// Query the computer inventory with an RSQL filter.
    pub async fn fetch_computers(
        &self,
        base_url: &str,
        token: &str,
        filter: &DeviceFilter,
        sections: &[InventorySection],
    ) -> Result<ComputerInventoryResponse, ApiError> {
        let url = endpoint(base_url, COMPUTERS_INVENTORY_PATH);
        let rsql = filter.to_rsql();
        debug!(url = %url, filter = %rsql, "Querying computer inventory");

        let mut query: Vec<(&str, &str)> = vec![("filter", rsql.as_str())];
        query.extend(sections.iter().map(|s| ("section", s.as_str())));

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&query)
            .send()
            .await?;

        let inventory: ComputerInventoryResponse = Self::read_json(response).await?;
        debug!(count = inventory.results.len(), "Inventory query returned");
        Ok(inventory)
    }

    /// Require a 200 response and decode its body.
    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(ApiError::from_status(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim().trim_end_matches('/'), path)
}
