//! Application configuration.
//!
//! Resolves where the token cache lives, which keychain service holds the
//! credentials, and the optional HTTP timeout. Values come from the
//! environment (a `.env` file is loaded by the binary before this runs):
//!
//! - `MDM_XV_TOKEN_FILE`: override the token cache path
//! - `MDM_XV_TIMEOUT_SECS`: request timeout in seconds (default: none)
//!
//! The default cache path is
//! `~/Library/Application Support/mdm-xv/mdm_token.json`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Application name used for the cache directory
const APP_NAME: &str = "mdm-xv";

/// Token cache file name
const TOKEN_FILE: &str = "mdm_token.json";

/// Keychain service the three credential secrets are stored under
pub const SERVICE_NAME: &str = "mdm_xv_token_tool";

pub const TOKEN_FILE_ENV: &str = "MDM_XV_TOKEN_FILE";
pub const TIMEOUT_ENV: &str = "MDM_XV_TIMEOUT_SECS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not find home directory")]
    NoHomeDir,

    #[error("Invalid MDM_XV_TIMEOUT_SECS value '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub token_file: PathBuf,
    pub service_name: String,
    pub request_timeout: Option<Duration>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_parts(
            std::env::var(TOKEN_FILE_ENV).ok(),
            std::env::var(TIMEOUT_ENV).ok(),
            dirs::home_dir(),
        )
    }

    fn from_parts(
        token_file: Option<String>,
        timeout: Option<String>,
        home: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let token_file = match token_file.filter(|p| !p.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => Self::default_token_path(&home.ok_or(ConfigError::NoHomeDir)?),
        };

        let request_timeout = match timeout.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => return Err(ConfigError::InvalidTimeout(raw.to_string())),
            },
        };

        Ok(Self {
            token_file,
            service_name: SERVICE_NAME.to_string(),
            request_timeout,
        })
    }

    pub fn default_token_path(home: &Path) -> PathBuf {
        home.join("Library")
            .join("Application Support")
            .join(APP_NAME)
            .join(TOKEN_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_under_application_support() {
        let config = Config::from_parts(None, None, Some(PathBuf::from("/Users/jane"))).unwrap();
        assert_eq!(
            config.token_file,
            PathBuf::from("/Users/jane/Library/Application Support/mdm-xv/mdm_token.json")
        );
        assert_eq!(config.service_name, "mdm_xv_token_tool");
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_parts(
            Some("/tmp/token.json".to_string()),
            Some("15".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(config.token_file, PathBuf::from("/tmp/token.json"));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_missing_home_without_override() {
        assert!(matches!(
            Config::from_parts(None, None, None),
            Err(ConfigError::NoHomeDir)
        ));
    }

    #[test]
    fn test_invalid_timeout() {
        for raw in ["abc", "0", "-5"] {
            assert!(matches!(
                Config::from_parts(None, Some(raw.to_string()), Some(PathBuf::from("/h"))),
                Err(ConfigError::InvalidTimeout(_))
            ));
        }
    }
}
