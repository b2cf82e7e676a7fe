use std::fmt;

use tracing::{debug, info, warn};

use crate::api::ApiClient;

use super::{AuthError, CredentialPrompt, Credentials, SecretStore, TokenCache, TokenRecord};

/// Where the token handed back to the caller came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// Served from the cache, no network call made
    Cache,
    /// Freshly issued by the server and written to the cache
    Issued,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Cache => write!(f, "cache"),
            TokenSource::Issued => write!(f, "issued"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOutcome {
    pub record: TokenRecord,
    pub source: TokenSource,
}

/// A usable token together with the server it is valid for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub record: TokenRecord,
    pub source: TokenSource,
    pub base_url: String,
}

/// Hands out valid bearer tokens, re-authenticating only when the cache is cold.
///
/// Per call: at most one cache read, one secret-store read, one
/// authentication request and one cache write, in that order. Nothing is
/// retried and an expired token is never used as a fallback.
pub struct TokenManager<C, S> {
    cache: C,
    secrets: S,
    api: ApiClient,
}

impl<C: TokenCache, S: SecretStore> TokenManager<C, S> {
    pub fn new(cache: C, secrets: S, api: ApiClient) -> Self {
        Self { cache, secrets, api }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn secrets(&self) -> &S {
        &self.secrets
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Return a valid token, authenticating (and prompting) only on a cache miss.
    pub async fn ensure_token<P: CredentialPrompt>(
        &self,
        prompt: &mut P,
    ) -> Result<TokenOutcome, AuthError> {
        if let Some(record) = self.cache.load() {
            info!(expires_at = %record.expires_at, "Using cached token");
            return Ok(TokenOutcome {
                record,
                source: TokenSource::Cache,
            });
        }

        let creds = match self.stored_credentials() {
            Some(creds) => creds,
            None => self.prompt_and_store(prompt)?,
        };
        let record = self.issue(&creds).await?;
        Ok(TokenOutcome {
            record,
            source: TokenSource::Issued,
        })
    }

    /// Like [`ensure_token`](Self::ensure_token), but also yields the server
    /// URL needed for follow-up API calls.
    ///
    /// A cached token with no stored credentials is treated as a miss, since
    /// the token is useless without knowing which server issued it.
    pub async fn ensure_session<P: CredentialPrompt>(
        &self,
        prompt: &mut P,
    ) -> Result<Session, AuthError> {
        let stored = match self.cache.load() {
            Some(record) => match self.stored_credentials() {
                Some(creds) => {
                    info!(expires_at = %record.expires_at, "Using cached token");
                    return Ok(Session {
                        record,
                        source: TokenSource::Cache,
                        base_url: creds.base_url,
                    });
                }
                None => {
                    warn!("Cached token found but no stored server URL; signing in again");
                    None
                }
            },
            None => self.stored_credentials(),
        };

        let creds = match stored {
            Some(creds) => creds,
            None => self.prompt_and_store(prompt)?,
        };
        let record = self.issue(&creds).await?;
        Ok(Session {
            record,
            source: TokenSource::Issued,
            base_url: creds.base_url,
        })
    }

    /// Forget everything: stored credentials first (best-effort), then the cache file.
    pub fn reset(&self) -> Result<(), AuthError> {
        info!("Clearing stored credentials and cached token");
        self.secrets.delete_all();
        self.cache.clear()
    }

    /// The single secret-store read of an invocation; `None` unless complete.
    fn stored_credentials(&self) -> Option<Credentials> {
        let creds = self.secrets.get_all()?;
        if creds.is_complete() {
            debug!(username = %creds.username, "Using stored credentials");
            Some(creds)
        } else {
            debug!("Stored credentials have an empty field");
            None
        }
    }

    /// Prompt for all three fields and store them.
    ///
    /// Prompted credentials are stored before authenticating, so a mistyped
    /// URL or password stays stored until `reset`.
    fn prompt_and_store<P: CredentialPrompt>(
        &self,
        prompt: &mut P,
    ) -> Result<Credentials, AuthError> {
        info!("No usable stored credentials; prompting");
        let creds = prompt.prompt_credentials()?;
        if !creds.is_complete() {
            return Err(AuthError::IncompleteCredentials);
        }

        self.secrets.set_all(&creds)?;
        Ok(creds)
    }

    async fn issue(&self, creds: &Credentials) -> Result<TokenRecord, AuthError> {
        let record = match self.api.authenticate(creds).await {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Authentication failed");
                return Err(e.into());
            }
        };

        self.cache.save(&record)?;
        info!(expires_at = %record.expires_at, "New token issued and cached");
        Ok(record)
    }
}
