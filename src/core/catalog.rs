//! The model catalog: every (provider, model) pair the client knows about.
//!
//! A [`Catalog`] is an immutable, ordered snapshot. Refreshing produces a new
//! snapshot with a higher version number; nothing ever edits one in place, so
//! a reader holding a clone never sees a half-applied refresh.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::api::models::{fetch_models, into_catalog_entries};
use crate::core::providers::Provider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntry {
    pub name: String,
    pub label: String,
    /// Name of the owning provider. Not required to be a known provider.
    pub provider: String,
}

impl ModelEntry {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            provider: provider.into(),
        }
    }

    /// Label for display, falling back to the model name when unlabeled.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Arc<[ModelEntry]>,
    version: u64,
}

impl Catalog {
    pub fn new(entries: Vec<ModelEntry>) -> Self {
        Self {
            entries: entries.into(),
            version: 0,
        }
    }

    /// Returns the snapshot that replaces `self`, one version later.
    pub fn replaced_with(&self, entries: Vec<ModelEntry>) -> Self {
        Self {
            entries: entries.into(),
            version: self.version.wrapping_add(1),
        }
    }

    pub fn entries(&self) -> &[ModelEntry] {
        &self.entries
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries belonging to `provider`, in catalog order.
    pub fn for_provider<'a>(&'a self, provider: &'a str) -> impl Iterator<Item = &'a ModelEntry> {
        self.entries.iter().filter(move |entry| entry.provider == provider)
    }
}

#[derive(Debug)]
pub enum CatalogError {
    Http(reqwest::Error),
    Status { status: u16, body: String },
    /// No source produced a catalog.
    Unavailable(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Http(err) => write!(f, "Model list request failed: {err}"),
            CatalogError::Status { status, body } => {
                write!(f, "API request failed with status {status}: {body}")
            }
            CatalogError::Unavailable(reason) => write!(f, "Model list unavailable: {reason}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CatalogError::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Http(err)
    }
}

/// Produces a fresh, ordered model list.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn refresh(&self) -> Result<Vec<ModelEntry>, CatalogError>;
}

/// Serves a fixed list; used for offline hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    entries: Vec<ModelEntry>,
}

impl StaticCatalogSource {
    pub fn new(entries: Vec<ModelEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn refresh(&self) -> Result<Vec<ModelEntry>, CatalogError> {
        Ok(self.entries.clone())
    }
}

/// Lists the models of one provider through its OpenAI-compatible
/// `/models` endpoint.
pub struct HttpCatalogSource {
    client: reqwest::Client,
    provider: Provider,
    api_key: String,
}

impl HttpCatalogSource {
    pub fn new(client: reqwest::Client, provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            client,
            provider,
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn refresh(&self) -> Result<Vec<ModelEntry>, CatalogError> {
        let response = fetch_models(
            &self.client,
            &self.provider.base_url,
            &self.api_key,
            self.provider.is_anthropic_mode(),
        )
        .await?;
        Ok(into_catalog_entries(&self.provider.name, response))
    }
}

/// Concatenates several sources in order. A failing source is logged and
/// skipped; the refresh only fails when every source fails.
pub struct MergedCatalogSource {
    sources: Vec<Box<dyn CatalogSource>>,
}

impl MergedCatalogSource {
    pub fn new(sources: Vec<Box<dyn CatalogSource>>) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl CatalogSource for MergedCatalogSource {
    async fn refresh(&self) -> Result<Vec<ModelEntry>, CatalogError> {
        let mut entries = Vec::new();
        let mut last_error = None;
        let mut any_ok = false;

        for source in &self.sources {
            match source.refresh().await {
                Ok(mut batch) => {
                    any_ok = true;
                    entries.append(&mut batch);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Catalog source failed; skipping");
                    last_error = Some(err);
                }
            }
        }

        match (any_ok, last_error) {
            (false, Some(err)) => Err(err),
            _ => Ok(entries),
        }
    }
}
