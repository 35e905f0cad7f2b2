//! Provider/model selection.
//!
//! [`SelectionController`] owns the `(provider, model)` pair together with
//! the catalog it is checked against, and keeps the derived model-option list
//! in step with both.

use std::collections::BTreeMap;

use tracing::debug;

use crate::core::catalog::{Catalog, ModelEntry};
use crate::core::providers::{find_provider, Provider};

/// A model as offered to the user for the selected provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelOption {
    pub value: String,
    pub label: String,
}

impl From<&ModelEntry> for ModelOption {
    fn from(entry: &ModelEntry) -> Self {
        Self {
            value: entry.name.clone(),
            label: entry.display_label().to_string(),
        }
    }
}

/// Per-provider cap on the number of model options displayed.
///
/// Provider names are matched case-insensitively. Providers without an entry
/// are unlimited. Only the displayed list is capped, never the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayLimitPolicy {
    limits: BTreeMap<String, usize>,
}

impl DisplayLimitPolicy {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, provider: &str, max_options: usize) -> Self {
        self.limits.insert(provider.to_lowercase(), max_options);
        self
    }

    pub fn limit_for(&self, provider: &str) -> Option<usize> {
        self.limits.get(&provider.to_lowercase()).copied()
    }

    pub fn is_unlimited(&self) -> bool {
        self.limits.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, usize)> {
        self.limits.iter().map(|(provider, max)| (provider.as_str(), *max))
    }
}

/// Identifies the inputs a model-option list was derived from. Two lists with
/// equal keys are identical.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptionsKey {
    pub provider: Option<String>,
    pub catalog_version: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    ProviderChanged {
        provider: Option<Provider>,
        model: String,
    },
    ModelChanged {
        model: String,
    },
}

pub struct SelectionController {
    providers: Vec<Provider>,
    catalog: Catalog,
    limits: DisplayLimitPolicy,
    provider: Option<Provider>,
    /// Empty means no model is selected.
    model: String,
    options: Vec<ModelOption>,
    options_key: OptionsKey,
}

impl SelectionController {
    pub fn new(providers: Vec<Provider>, catalog: Catalog, limits: DisplayLimitPolicy) -> Self {
        let mut controller = Self {
            providers,
            catalog,
            limits,
            provider: None,
            model: String::new(),
            options: Vec::new(),
            options_key: OptionsKey::default(),
        };
        controller.recompute_options();
        controller
    }

    pub fn provider(&self) -> Option<&Provider> {
        self.provider.as_ref()
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_ref().map(|p| p.name.as_str())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn limits(&self) -> &DisplayLimitPolicy {
        &self.limits
    }

    /// Model options for the selected provider, in catalog order and capped by
    /// the display-limit policy. Empty when no provider is selected.
    pub fn model_options(&self) -> &[ModelOption] {
        &self.options
    }

    pub fn options_key(&self) -> &OptionsKey {
        &self.options_key
    }

    /// Selects the provider called `name`, or the first known provider when
    /// no provider has that name. The model becomes the provider's first
    /// catalog entry, or empty when it has none.
    pub fn set_provider(&mut self, name: &str) -> SelectionEvent {
        let resolved = find_provider(&self.providers, name)
            .or_else(|| self.providers.first())
            .cloned();

        if resolved.as_ref().map(|p| p.name.as_str()) != Some(name) {
            debug!(
                requested = name,
                resolved = resolved.as_ref().map(|p| p.name.as_str()),
                "Provider not found; falling back"
            );
        }

        self.model = resolved
            .as_ref()
            .and_then(|provider| self.catalog.for_provider(&provider.name).next())
            .map(|entry| entry.name.clone())
            .unwrap_or_default();
        self.provider = resolved;
        self.recompute_options();

        debug!(
            provider = self.provider_name(),
            model = %self.model,
            "Provider changed"
        );

        SelectionEvent::ProviderChanged {
            provider: self.provider.clone(),
            model: self.model.clone(),
        }
    }

    /// Stores `name` as the model without checking it against the catalog.
    pub fn set_model(&mut self, name: &str) -> SelectionEvent {
        self.model = name.to_string();
        debug!(model = name, "Model changed");
        SelectionEvent::ModelChanged {
            model: self.model.clone(),
        }
    }

    /// Swaps in a new catalog snapshot and returns its version.
    pub fn replace_catalog(&mut self, entries: Vec<ModelEntry>) -> u64 {
        self.catalog = self.catalog.replaced_with(entries);
        self.recompute_options();
        debug!(
            version = self.catalog.version(),
            entries = self.catalog.len(),
            "Catalog replaced"
        );
        self.catalog.version()
    }

    /// Replaces the known providers. A selected provider that disappeared is
    /// re-resolved as if the user had picked it again.
    pub fn set_providers(&mut self, providers: Vec<Provider>) -> Option<SelectionEvent> {
        self.providers = providers;
        let current = self.provider.as_ref()?.name.clone();
        match find_provider(&self.providers, &current) {
            Some(found) => {
                self.provider = Some(found.clone());
                None
            }
            None => Some(self.set_provider(&current)),
        }
    }

    /// True when the model is empty or belongs to the selected provider.
    pub fn is_consistent(&self) -> bool {
        match &self.provider {
            None => true,
            Some(_) if self.model.is_empty() => true,
            Some(provider) => self
                .catalog
                .for_provider(&provider.name)
                .any(|entry| entry.name == self.model),
        }
    }

    fn recompute_options(&mut self) {
        let key = OptionsKey {
            provider: self.provider_name().map(str::to_string),
            catalog_version: self.catalog.version(),
        };

        self.options = match &key.provider {
            Some(name) => {
                let matching = self.catalog.for_provider(name).map(ModelOption::from);
                match self.limits.limit_for(name) {
                    Some(max) => matching.take(max).collect(),
                    None => matching.collect(),
                }
            }
            None => Vec::new(),
        };
        self.options_key = key;
    }
}
