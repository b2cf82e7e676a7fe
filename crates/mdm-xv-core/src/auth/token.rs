use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::AuthError;

/// Bearer token as issued by `/api/v1/auth/token` and persisted in the cache file.
///
/// The wire format is `{"token": "...", "expires": "<RFC3339>"}`. Offsets are
/// normalized to UTC on parse, so validity is always compared against `Utc::now()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub token: String,
    #[serde(rename = "expires")]
    pub expires_at: DateTime<Utc>,
}

impl TokenRecord {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Why a cache read produced nothing. Only used for logging; callers of
/// [`TokenCache::load`] see every case as a plain miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMiss {
    Absent,
    Unreadable,
    Malformed,
    Expired,
}

impl fmt::Display for CacheMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheMiss::Absent => write!(f, "no cached token"),
            CacheMiss::Unreadable => write!(f, "cache file unreadable"),
            CacheMiss::Malformed => write!(f, "cache file malformed"),
            CacheMiss::Expired => write!(f, "cached token expired"),
        }
    }
}

/// Single-record store for the last issued token.
///
/// Implementors only move bytes; the validity check lives in [`load_at`](Self::load_at).
pub trait TokenCache {
    /// Read the stored record without checking expiry.
    fn read(&self) -> Result<TokenRecord, CacheMiss>;

    /// Replace any stored record with `record`.
    fn save(&self, record: &TokenRecord) -> Result<(), AuthError>;

    /// Remove the stored record. A missing record is not an error.
    fn clear(&self) -> Result<(), AuthError>;

    /// Return the stored record if it is still valid at `now`.
    fn load_at(&self, now: DateTime<Utc>) -> Option<TokenRecord> {
        let result = self.read().and_then(|record| {
            if record.is_valid_at(now) {
                Ok(record)
            } else {
                Err(CacheMiss::Expired)
            }
        });

        match result {
            Ok(record) => Some(record),
            Err(reason) => {
                debug!(%reason, "Token cache miss");
                None
            }
        }
    }

    fn load(&self) -> Option<TokenRecord> {
        self.load_at(Utc::now())
    }
}

/// Token cache backed by a JSON file.
///
/// Writes are not atomic and not locked; a torn write reads back as
/// `Malformed` and simply forces re-authentication.
#[derive(Debug, Clone)]
pub struct FileTokenCache {
    path: PathBuf,
}

impl FileTokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenCache for FileTokenCache {
    fn read(&self) -> Result<TokenRecord, CacheMiss> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CacheMiss::Absent,
            _ => {
                debug!(path = %self.path.display(), error = %e, "Failed to read token cache");
                CacheMiss::Unreadable
            }
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            debug!(path = %self.path.display(), error = %e, "Failed to parse token cache");
            CacheMiss::Malformed
        })
    }

    fn save(&self, record: &TokenRecord) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AuthError::io(parent, e))?;
        }
        let contents = serde_json::to_string_pretty(record)?;
        std::fs::write(&self.path, contents).map_err(|e| AuthError::io(&self.path, e))?;
        debug!(path = %self.path.display(), expires_at = %record.expires_at, "Token cached");
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Token cache removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::io(&self.path, e)),
        }
    }
}

/// In-process token cache, used in tests and anywhere persistence is unwanted.
#[derive(Debug, Default)]
pub struct MemoryTokenCache {
    record: Mutex<Option<TokenRecord>>,
}

impl MemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: TokenRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<TokenRecord>> {
        self.record.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenCache for MemoryTokenCache {
    fn read(&self) -> Result<TokenRecord, CacheMiss> {
        self.slot().clone().ok_or(CacheMiss::Absent)
    }

    fn save(&self, record: &TokenRecord) -> Result<(), AuthError> {
        *self.slot() = Some(record.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, TimeZone};

    fn record_expiring_in(delta: Duration) -> TokenRecord {
        TokenRecord::new("tok-123", Utc::now() + delta)
    }

    #[test]
    fn test_record_validity_boundary() {
        let now = Utc::now();
        let record = TokenRecord::new("t", now);
        assert!(!record.is_valid_at(now), "expiry instant itself is invalid");
        assert!(record.is_valid_at(now - Duration::seconds(1)));
    }

    #[test]
    fn test_record_parses_offset_and_normalizes_to_utc() {
        let json = r#"{"token":"abc","expires":"2030-06-01T14:00:00+02:00"}"#;
        let record: TokenRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.expires_at, Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap());

        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let same_instant = offset.with_ymd_and_hms(2030, 6, 1, 14, 0, 0).unwrap();
        assert_eq!(record.expires_at, same_instant);
    }

    #[test]
    fn test_record_parses_fractional_zulu() {
        let json = r#"{"token":"abc","expires":"2030-06-01T12:00:00.123Z"}"#;
        let record: TokenRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.token, "abc");
    }

    #[test]
    fn test_file_cache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileTokenCache::new(dir.path().join("nested").join("mdm_token.json"));
        let record = record_expiring_in(Duration::hours(1));

        cache.save(&record).unwrap();
        assert_eq!(cache.load(), Some(record));
    }

    #[test]
    fn test_file_cache_writes_wire_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileTokenCache::new(dir.path().join("mdm_token.json"));
        cache.save(&record_expiring_in(Duration::hours(1))).unwrap();

        let raw = std::fs::read_to_string(cache.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object["token"].is_string());
        assert!(object["expires"].is_string());
    }

    #[test]
    fn test_expired_record_behaves_like_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = FileTokenCache::new(dir.path().join("absent.json"));
        let expired = FileTokenCache::new(dir.path().join("expired.json"));
        expired.save(&record_expiring_in(Duration::hours(-1))).unwrap();

        assert_eq!(missing.load(), None);
        assert_eq!(expired.load(), None);
        assert_eq!(missing.read(), Err(CacheMiss::Absent));
        assert!(expired.read().is_ok(), "expired record is still structurally readable");
    }

    #[test]
    fn test_malformed_and_bad_timestamp_are_misses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mdm_token.json");
        let cache = FileTokenCache::new(&path);

        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(cache.read(), Err(CacheMiss::Malformed));

        std::fs::write(&path, r#"{"token":"abc","expires":"next tuesday"}"#).unwrap();
        assert_eq!(cache.read(), Err(CacheMiss::Malformed));
        assert_eq!(cache.load(), None);

        std::fs::write(&path, r#"{"token":"abc"}"#).unwrap();
        assert_eq!(cache.load(), None);
    }

    #[test]
    fn test_save_overwrites_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileTokenCache::new(dir.path().join("mdm_token.json"));
        cache.save(&TokenRecord::new("old", Utc::now() + Duration::hours(1))).unwrap();
        cache.save(&TokenRecord::new("new", Utc::now() + Duration::hours(2))).unwrap();

        assert_eq!(cache.load().unwrap().token, "new");
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileTokenCache::new(dir.path().join("mdm_token.json"));
        cache.save(&record_expiring_in(Duration::hours(1))).unwrap();

        cache.clear().unwrap();
        cache.clear().unwrap();
        assert!(!cache.path().exists());
    }

    #[test]
    fn test_memory_cache_respects_expiry() {
        let cache = MemoryTokenCache::with_record(record_expiring_in(Duration::minutes(-5)));
        assert_eq!(cache.load(), None);

        let fresh = record_expiring_in(Duration::minutes(5));
        cache.save(&fresh).unwrap();
        assert_eq!(cache.load(), Some(fresh));

        cache.clear().unwrap();
        cache.clear().unwrap();
        assert_eq!(cache.read(), Err(CacheMiss::Absent));
    }
}
