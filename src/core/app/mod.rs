//! The chat shell: selection, credentials and composer wired to the send and
//! enhance engines.
//!
//! All state changes go through [`apply_action`]. Work that has to leave the
//! event loop comes back as an [`AppCommand`] for the host to run; its result
//! re-enters as another [`AppAction`].

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::catalog::Catalog;
use crate::core::composer::{Composer, ComposerIntent};
use crate::core::config::Config;
use crate::core::credentials::{CredentialStorage, CredentialStore};
use crate::core::engine::{EnhanceEngine, EnhanceRequest, SendEngine, SendRequest};
use crate::core::providers::{load_providers, Provider};
use crate::core::selection::{DisplayLimitPolicy, SelectionController};

pub mod actions;
pub mod lifetime;
pub mod panel;

pub use actions::{apply_action, apply_actions, AppAction, AppActionDispatcher, AppCommand};
pub use lifetime::ViewLifetime;
pub use panel::{ChatPanel, PanelMode};

/// Inputs for building an [`App`] without reading config from disk.
pub struct AppInitConfig {
    pub providers: Vec<Provider>,
    pub catalog: Catalog,
    pub limits: DisplayLimitPolicy,
    pub default_provider: Option<String>,
    /// Preferred model per provider, keyed by lowercase provider name.
    pub default_models: HashMap<String, String>,
    pub example_prompts: Vec<String>,
    pub storage: Arc<dyn CredentialStorage>,
}

impl AppInitConfig {
    pub fn from_config(config: &Config, storage: Arc<dyn CredentialStorage>) -> Self {
        Self {
            providers: load_providers(config),
            catalog: Catalog::default(),
            limits: config.display_limit_policy(),
            default_provider: config.default_provider.clone(),
            default_models: config
                .default_models
                .iter()
                .map(|(provider, model)| (provider.to_lowercase(), model.clone()))
                .collect(),
            example_prompts: config.example_prompts(),
            storage,
        }
    }
}

pub struct App {
    pub selection: SelectionController,
    pub credentials: CredentialStore,
    pub composer: Composer,
    send_engine: Box<dyn SendEngine>,
    enhance_engine: Box<dyn EnhanceEngine>,
    default_models: HashMap<String, String>,
    example_prompts: Vec<String>,
    pub(crate) visible: bool,
    pub(crate) status: Option<String>,
    lifetime: ViewLifetime,
}

impl App {
    pub fn new(
        init: AppInitConfig,
        send_engine: Box<dyn SendEngine>,
        enhance_engine: Box<dyn EnhanceEngine>,
    ) -> Self {
        let mut app = Self {
            selection: SelectionController::new(init.providers, init.catalog, init.limits),
            credentials: CredentialStore::new(init.storage),
            composer: Composer::new(),
            send_engine,
            enhance_engine,
            default_models: init.default_models,
            example_prompts: init.example_prompts,
            visible: true,
            status: None,
            lifetime: ViewLifetime::new(),
        };

        let initial = init
            .default_provider
            .or_else(|| app.selection.providers().first().map(|p| p.name.clone()));
        if let Some(provider) = initial {
            app.change_provider(&provider);
        }
        app.sync_engine_status();
        app
    }

    /// The one-shot loads a freshly opened view needs.
    pub fn startup_commands(&self) -> Vec<AppCommand> {
        vec![
            AppCommand::LoadCredentials {
                storage: self.credentials.storage(),
            },
            AppCommand::RefreshCatalog,
        ]
    }

    pub fn lifetime(&self) -> ViewLifetime {
        self.lifetime.clone()
    }

    pub fn is_active(&self) -> bool {
        self.lifetime.is_active()
    }

    /// Tears the view down; background results arriving later are dropped.
    pub fn close(&mut self) {
        self.lifetime.close();
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub(crate) fn set_status(&mut self, message: String) {
        self.status = Some(message);
    }

    /// The stored key for the selected provider, `""` when there is none.
    pub fn api_key_for_selection(&self) -> &str {
        self.selection
            .provider_name()
            .map(|name| self.credentials.get(name))
            .unwrap_or("")
    }

    pub fn panel(&self) -> ChatPanel<'_> {
        let started = self.send_engine.has_started();
        ChatPanel {
            visible: self.visible,
            mode: if started {
                PanelMode::Conversation
            } else {
                PanelMode::Intro
            },
            streaming: self.composer.is_streaming(),
            messages: if started {
                self.send_engine.messages()
            } else {
                &[]
            },
            draft: self.composer.draft(),
            provider: self.selection.provider(),
            model: self.selection.model(),
            providers: self.selection.providers(),
            model_options: self.selection.model_options(),
            options_key: self.selection.options_key(),
            api_key: self.api_key_for_selection(),
            enhancing: self.composer.is_enhancing(),
            enhanced: self.composer.show_enhanced_indicator(),
            can_enhance: self.composer.can_enhance(),
            action_control: self.composer.action_control(),
            show_hint: self.composer.show_hint(),
            example_prompts: &self.example_prompts,
            status: self.status.as_deref(),
        }
    }

    pub(crate) fn sync_engine_status(&mut self) {
        self.composer.sync_status(
            self.send_engine.is_streaming(),
            self.enhance_engine.is_enhancing(),
        );
    }

    /// Switches provider, then prefers the configured default model when the
    /// provider offers it.
    pub(crate) fn change_provider(&mut self, provider: &str) {
        self.selection.set_provider(provider);
        self.prefer_default_model();
    }

    /// Picks a model once the catalog arrives if none could be chosen before.
    pub(crate) fn fill_empty_model(&mut self) {
        if !self.selection.model().is_empty() {
            return;
        }
        let Some(name) = self.selection.provider_name().map(str::to_string) else {
            return;
        };
        self.change_provider(&name);
    }

    /// Replaces the known providers, re-resolving the selection if its
    /// provider disappeared.
    pub(crate) fn reload_providers(&mut self, providers: Vec<Provider>) {
        if self.selection.set_providers(providers).is_some() {
            self.prefer_default_model();
        }
    }

    fn prefer_default_model(&mut self) {
        let Some(name) = self.selection.provider_name() else {
            return;
        };
        let Some(preferred) = self.default_models.get(&name.to_lowercase()).cloned() else {
            return;
        };
        if self
            .selection
            .model_options()
            .iter()
            .any(|option| option.value == preferred)
        {
            self.selection.set_model(&preferred);
        }
    }

    pub(crate) fn change_api_key(&mut self, provider: &str, key: &str) {
        if let Err(err) = self.credentials.update(provider, key) {
            self.set_status(format!("{err}. The key is kept for this session only."));
        }
    }

    pub(crate) fn run_intent(&mut self, intent: ComposerIntent) {
        match intent {
            ComposerIntent::Send { override_text } => self.send(override_text),
            ComposerIntent::Stop => {
                debug!("Stopping response");
                self.send_engine.stop();
            }
            ComposerIntent::Enhance => {
                let request = EnhanceRequest {
                    draft: self.composer.draft().to_string(),
                    provider: self.selection.provider().cloned(),
                    model: self.selection.model().to_string(),
                    api_key: self.api_key_for_selection().to_string(),
                };
                self.enhance_engine.enhance(request);
            }
        }
    }

    fn send(&mut self, override_text: Option<String>) {
        let text = override_text
            .clone()
            .unwrap_or_else(|| self.composer.draft().to_string());

        if text.trim().is_empty() {
            debug!("Ignoring send of empty text");
            return;
        }
        if self.composer.is_streaming() {
            debug!("Ignoring send while a response is streaming");
            return;
        }
        if self.selection.model().is_empty() {
            warn!(provider = self.selection.provider_name(), "Sending without a model selected");
        }

        let request = SendRequest {
            override_text,
            text,
            provider: self.selection.provider().cloned(),
            model: self.selection.model().to_string(),
            api_key: self.api_key_for_selection().to_string(),
        };
        self.send_engine.send(request);
    }
}

#[cfg(test)]
mod tests;
