//! Per-provider API keys that survive restarts.
//!
//! [`CredentialStore`] keeps the in-memory [`CredentialMap`] and writes the
//! whole map to an injected [`CredentialStorage`] on every change. The
//! in-memory map is the source of truth: a failed write is reported, never
//! rolled back, and a corrupt persisted record is dropped on load.

mod storage;

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

pub use storage::{
    CredentialStorage, FileStorage, KeyringStorage, MemoryStorage, RecordPolicy, SameSite,
    StorageError, StoredRecord,
};

/// Storage key of the persisted credential record.
pub const CREDENTIALS_RECORD: &str = "api_keys";

pub type CredentialMap = HashMap<String, String>;

#[derive(Debug)]
pub enum CredentialError {
    Persist(StorageError),
    Encode(serde_json::Error),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::Persist(err) => write!(f, "Failed to save API keys: {err}"),
            CredentialError::Encode(err) => write!(f, "Failed to encode API keys: {err}"),
        }
    }
}

impl Error for CredentialError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CredentialError::Persist(err) => Some(err),
            CredentialError::Encode(err) => Some(err),
        }
    }
}

pub struct CredentialStore {
    storage: Arc<dyn CredentialStorage>,
    policy: RecordPolicy,
    keys: Arc<CredentialMap>,
}

impl CredentialStore {
    /// An empty store backed by `storage`. Call [`load`](Self::load) or
    /// [`install_loaded`](Self::install_loaded) to populate it.
    pub fn new(storage: Arc<dyn CredentialStorage>) -> Self {
        Self {
            storage,
            policy: RecordPolicy::default(),
            keys: Arc::new(CredentialMap::new()),
        }
    }

    pub fn storage(&self) -> Arc<dyn CredentialStorage> {
        Arc::clone(&self.storage)
    }

    /// Reads the persisted map. Corrupt records are removed and read as
    /// empty; other read failures also yield an empty map. Never fails.
    pub fn read_persisted(storage: &dyn CredentialStorage) -> CredentialMap {
        let corrupt = match storage.get(CREDENTIALS_RECORD) {
            Ok(None) => return CredentialMap::new(),
            Ok(Some(blob)) => match serde_json::from_str::<CredentialMap>(&blob) {
                Ok(keys) => {
                    debug!(providers = keys.len(), "Loaded stored API keys");
                    return keys;
                }
                Err(err) => err.to_string(),
            },
            Err(StorageError::Corrupt(reason)) => reason,
            Err(err) => {
                warn!(
                    error = %err,
                    recoverable = err.is_recoverable(),
                    "Unable to read stored API keys; starting empty"
                );
                return CredentialMap::new();
            }
        };

        warn!(reason = %corrupt, "Discarding corrupt stored API keys");
        if let Err(err) = storage.remove(CREDENTIALS_RECORD) {
            warn!(error = %err, "Failed to discard corrupt API key record");
        }
        CredentialMap::new()
    }

    /// Replaces the in-memory map with the persisted one.
    pub fn load(&mut self) {
        self.keys = Arc::new(Self::read_persisted(self.storage.as_ref()));
    }

    /// Applies a map read in the background. Keys set in memory since
    /// startup win over the loaded ones; if any did, the merged map is
    /// written back.
    pub fn install_loaded(&mut self, loaded: CredentialMap) {
        if self.keys.is_empty() {
            self.keys = Arc::new(loaded);
            return;
        }

        let mut merged = loaded.clone();
        for (provider, key) in self.keys.iter() {
            merged.insert(provider.clone(), key.clone());
        }
        let changed = merged != loaded;
        self.keys = Arc::new(merged);

        if changed {
            if let Err(err) = self.persist() {
                warn!(error = %err, "Failed to persist merged API keys");
            }
        }
    }

    /// Stores `key` for `provider` and persists the full map. The in-memory
    /// change stands even when persisting fails.
    pub fn update(&mut self, provider: &str, key: &str) -> Result<(), CredentialError> {
        let mut next = CredentialMap::clone(&self.keys);
        next.insert(provider.to_string(), key.to_string());
        self.keys = Arc::new(next);
        debug!(provider, "API key updated");
        self.persist_reporting()
    }

    pub fn remove(&mut self, provider: &str) -> Result<(), CredentialError> {
        if !self.keys.contains_key(provider) {
            return Ok(());
        }
        let mut next = CredentialMap::clone(&self.keys);
        next.remove(provider);
        self.keys = Arc::new(next);
        debug!(provider, "API key removed");
        self.persist_reporting()
    }

    /// The key for `provider`, or `""` when none is stored.
    pub fn get(&self, provider: &str) -> &str {
        self.keys.get(provider).map(String::as_str).unwrap_or("")
    }

    pub fn snapshot(&self) -> Arc<CredentialMap> {
        Arc::clone(&self.keys)
    }

    fn persist_reporting(&self) -> Result<(), CredentialError> {
        self.persist().inspect_err(|err| {
            warn!(error = %err, "API key kept in memory only");
        })
    }

    fn persist(&self) -> Result<(), CredentialError> {
        let blob = serde_json::to_string(self.keys.as_ref()).map_err(CredentialError::Encode)?;
        self.storage
            .set(CREDENTIALS_RECORD, &blob, &self.policy)
            .map_err(CredentialError::Persist)
    }
}

/// Shows the first and last four characters of a secret, masking the rest.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}{}{tail}", "*".repeat(chars.len() - 8))
}
