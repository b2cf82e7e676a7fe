use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use keyring::Entry;
use tracing::{debug, warn};

use super::AuthError;

pub const USERNAME_KEY: &str = "username";
pub const PASSWORD_KEY: &str = "password";
pub const URL_KEY: &str = "url";

const ALL_KEYS: [&str; 3] = [USERNAME_KEY, PASSWORD_KEY, URL_KEY];

/// Operator credentials plus the MDM server they belong to.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub base_url: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            base_url: base_url.into(),
        }
    }

    /// All three fields are non-empty. Anything less is never sent to the server.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty() && !self.base_url.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Durable storage for the three credential secrets.
pub trait SecretStore {
    /// Returns `None` unless all three secrets are present.
    fn get_all(&self) -> Option<Credentials>;

    fn set_all(&self, creds: &Credentials) -> Result<(), AuthError>;

    /// Best-effort removal; individual failures are logged and ignored.
    fn delete_all(&self);
}

/// Interactive source of credentials when the store has none.
pub trait CredentialPrompt {
    fn prompt_credentials(&mut self) -> Result<Credentials, AuthError>;
}

/// Secret store backed by the OS keychain.
#[derive(Debug, Clone)]
pub struct KeyringSecretStore {
    service: String,
}

impl KeyringSecretStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> keyring::Result<Entry> {
        Entry::new(&self.service, key)
    }

    fn get(&self, key: &str) -> Option<String> {
        match self.entry(key).and_then(|entry| entry.get_password()) {
            Ok(value) => Some(value),
            Err(keyring::Error::NoEntry) => {
                debug!(key, "Secret not found in keychain");
                None
            }
            Err(e) => {
                warn!(key, error = %e, "Failed to read secret from keychain");
                None
            }
        }
    }
}

impl SecretStore for KeyringSecretStore {
    fn get_all(&self) -> Option<Credentials> {
        Some(Credentials {
            username: self.get(USERNAME_KEY)?,
            password: self.get(PASSWORD_KEY)?,
            base_url: self.get(URL_KEY)?,
        })
    }

    fn set_all(&self, creds: &Credentials) -> Result<(), AuthError> {
        for (key, value) in [
            (USERNAME_KEY, &creds.username),
            (PASSWORD_KEY, &creds.password),
            (URL_KEY, &creds.base_url),
        ] {
            self.entry(key)?.set_password(value)?;
        }
        debug!(service = %self.service, "Credentials stored in keychain");
        Ok(())
    }

    fn delete_all(&self) {
        for key in ALL_KEYS {
            match self.entry(key).and_then(|entry| entry.delete_credential()) {
                Ok(()) | Err(keyring::Error::NoEntry) => {}
                Err(e) => warn!(key, error = %e, "Failed to delete secret from keychain"),
            }
        }
    }
}

/// Secret store held in memory, keyed like the keychain entries.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: Mutex<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(creds: &Credentials) -> Self {
        Self::new()
            .with_secret(USERNAME_KEY, &creds.username)
            .with_secret(PASSWORD_KEY, &creds.password)
            .with_secret(URL_KEY, &creds.base_url)
    }

    /// Seed a single secret, e.g. to model a partially populated keychain.
    pub fn with_secret(self, key: &str, value: &str) -> Self {
        self.map().insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.map().get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }

    fn map(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.secrets.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SecretStore for MemorySecretStore {
    fn get_all(&self) -> Option<Credentials> {
        let map = self.map();
        Some(Credentials {
            username: map.get(USERNAME_KEY)?.clone(),
            password: map.get(PASSWORD_KEY)?.clone(),
            base_url: map.get(URL_KEY)?.clone(),
        })
    }

    fn set_all(&self, creds: &Credentials) -> Result<(), AuthError> {
        let mut map = self.map();
        map.insert(USERNAME_KEY.to_string(), creds.username.clone());
        map.insert(PASSWORD_KEY.to_string(), creds.password.clone());
        map.insert(URL_KEY.to_string(), creds.base_url.clone());
        Ok(())
    }

    fn delete_all(&self) {
        let mut map = self.map();
        for key in ALL_KEYS {
            map.remove(key);
        }
    }
}
