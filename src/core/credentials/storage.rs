//! Persistence backends for the credential record.
//!
//! Every backend is a string-keyed, string-valued store. Values are wrapped in
//! a [`StoredRecord`] carrying the [`RecordPolicy`] they were written with, and
//! expired records read back as absent.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, TimeDelta, Utc};
use keyring::Entry;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::config::io::write_atomically;

const KEYRING_SERVICE: &str = "palaver";
const RETENTION_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

/// Attributes every persisted credential record is written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPolicy {
    pub max_age: TimeDelta,
    pub path: String,
    /// Only ever sent over secure transport.
    pub secure: bool,
    pub same_site: SameSite,
}

impl Default for RecordPolicy {
    fn default() -> Self {
        Self {
            max_age: TimeDelta::days(RETENTION_DAYS),
            path: "/".to_string(),
            secure: true,
            same_site: SameSite::Strict,
        }
    }
}

impl RecordPolicy {
    pub fn expires_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + self.max_age
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub value: String,
    pub expires_at: DateTime<Utc>,
    pub path: String,
    pub secure: bool,
    pub same_site: SameSite,
}

impl StoredRecord {
    pub fn new(value: &str, policy: &RecordPolicy, now: DateTime<Utc>) -> Self {
        Self {
            value: value.to_string(),
            expires_at: policy.expires_at(now),
            path: policy.path.clone(),
            secure: policy.secure,
            same_site: policy.same_site,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    /// The keyring service is locked or has no session right now.
    KeyringUnavailable(keyring::Error),
    Keyring(keyring::Error),
    /// The stored bytes could not be decoded.
    Corrupt(String),
    Encode(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "Credential storage I/O failed: {err}"),
            StorageError::KeyringUnavailable(err) => {
                write!(f, "Keyring is temporarily unavailable: {err}")
            }
            StorageError::Keyring(err) => write!(f, "Keyring access failed: {err}"),
            StorageError::Corrupt(reason) => write!(f, "Stored credentials are corrupt: {reason}"),
            StorageError::Encode(reason) => write!(f, "Failed to encode credentials: {reason}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StorageError::Io(err) => Some(err),
            StorageError::KeyringUnavailable(err) | StorageError::Keyring(err) => Some(err),
            _ => None,
        }
    }
}

impl StorageError {
    /// True when retrying later may succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StorageError::Io(_) | StorageError::KeyringUnavailable(_))
    }
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        StorageError::Io(err)
    }
}

impl From<keyring::Error> for StorageError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::PlatformFailure(_) | keyring::Error::NoStorageAccess(_) => {
                StorageError::KeyringUnavailable(err)
            }
            other => StorageError::Keyring(other),
        }
    }
}

/// Key-value persistence for credential records.
pub trait CredentialStorage: Send + Sync {
    /// Live value stored under `key`; expired records read as `None`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str, policy: &RecordPolicy) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local storage.
#[derive(Default)]
pub struct MemoryStorage {
    records: Mutex<HashMap<String, StoredRecord>>,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `set` fail, to exercise best-effort persistence.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Stores a record as-is, bypassing policy and encoding.
    pub fn insert_record(&self, key: &str, record: StoredRecord) {
        self.lock().insert(key.to_string(), record);
    }

    pub fn record(&self, key: &str) -> Option<StoredRecord> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredRecord>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut records = self.lock();
        match records.get(key) {
            Some(record) if record.is_expired(Utc::now()) => {
                records.remove(key);
                Ok(None)
            }
            Some(record) => Ok(Some(record.value.clone())),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str, policy: &RecordPolicy) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io(io::Error::other("writes disabled")));
        }
        self.lock()
            .insert(key.to_string(), StoredRecord::new(value, policy, Utc::now()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}

/// Records in a TOML file, rewritten atomically on every change. The temp
/// file is created owner-only on Unix, so the rename keeps the file private.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, StoredRecord>, StorageError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        toml::from_str(&contents).map_err(|err| StorageError::Corrupt(err.to_string()))
    }

    fn write_all(&self, records: &HashMap<String, StoredRecord>) -> Result<(), StorageError> {
        let contents =
            toml::to_string_pretty(records).map_err(|err| StorageError::Encode(err.to_string()))?;
        write_atomically(&self.path, &contents)
            .map_err(|err| StorageError::Io(io::Error::other(err.to_string())))
    }
}

impl CredentialStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let records = self.read_all()?;
        Ok(records
            .get(key)
            .filter(|record| !record.is_expired(Utc::now()))
            .map(|record| record.value.clone()))
    }

    fn set(&self, key: &str, value: &str, policy: &RecordPolicy) -> Result<(), StorageError> {
        // A corrupt file is replaced; any other read failure aborts the write.
        let mut records = match self.read_all() {
            Ok(records) => records,
            Err(StorageError::Corrupt(reason)) => {
                warn!(path = %self.path.display(), %reason, "Replacing corrupt credentials file");
                Default::default()
            }
            Err(err) => return Err(err),
        };
        records.insert(key.to_string(), StoredRecord::new(value, policy, Utc::now()));
        self.write_all(&records)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self.read_all() {
            Ok(mut records) => {
                if records.remove(key).is_some() {
                    self.write_all(&records)?;
                }
                Ok(())
            }
            Err(StorageError::Corrupt(_)) => {
                fs::remove_file(&self.path)?;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

/// Records in the platform keyring, one entry per key, each holding the
/// JSON-encoded [`StoredRecord`].
pub struct KeyringStorage {
    service: String,
}

impl Default for KeyringStorage {
    fn default() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
        }
    }
}

impl KeyringStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStorage for KeyringStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entry = Entry::new(&self.service, key)?;
        let raw = match entry.get_password() {
            Ok(raw) => raw,
            Err(keyring::Error::NoEntry) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let record: StoredRecord =
            serde_json::from_str(&raw).map_err(|err| StorageError::Corrupt(err.to_string()))?;
        if record.is_expired(Utc::now()) {
            self.remove(key)?;
            return Ok(None);
        }
        Ok(Some(record.value))
    }

    fn set(&self, key: &str, value: &str, policy: &RecordPolicy) -> Result<(), StorageError> {
        let record = StoredRecord::new(value, policy, Utc::now());
        let raw =
            serde_json::to_string(&record).map_err(|err| StorageError::Encode(err.to_string()))?;
        Entry::new(&self.service, key)?.set_password(&raw)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match Entry::new(&self.service, key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
