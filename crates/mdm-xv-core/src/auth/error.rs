use std::path::PathBuf;

use thiserror::Error;

use crate::api::ApiError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Username, password and server URL are all required")]
    IncompleteCredentials,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to update token cache {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize token: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    SecretStore(#[from] keyring::Error),

    #[error("Failed to read credentials from terminal: {0}")]
    Prompt(#[source] std::io::Error),
}

impl AuthError {
    /// The server rejected the credentials or the request (non-200 status)
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, AuthError::Api(e) if e.is_rejected())
    }

    /// The authentication request never got an HTTP response
    pub fn is_network_failure(&self) -> bool {
        matches!(self, AuthError::Api(e) if e.is_network())
    }

    /// The server answered 200 but the body was not a usable token
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, AuthError::Api(ApiError::InvalidResponse(_)))
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AuthError::Io {
            path: path.into(),
            source,
        }
    }
}
