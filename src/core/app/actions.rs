use std::sync::Arc;

use ratatui::crossterm::event::KeyEvent;
use tokio::sync::mpsc;
use tracing::debug;

use super::App;
use crate::core::catalog::ModelEntry;
use crate::core::composer::{ComposerIntent, KeyOutcome};
use crate::core::credentials::{CredentialMap, CredentialStorage};
use crate::core::providers::Provider;

/// Every intent the view, the engines and background tasks can send to the
/// chat shell. Not `Debug`: several variants carry API keys.
pub enum AppAction {
    ChangeProvider { provider: String },
    ChangeModel { model: String },
    ChangeApiKey { provider: String, key: String },
    ChangeInput { text: String },
    Key { event: KeyEvent },
    /// Send the current draft.
    Submit,
    /// Send a canned example prompt verbatim.
    SubmitExample { text: String },
    /// Press the send/stop control.
    ActivateControl,
    Stop,
    Enhance,
    EnhanceCompleted { text: String },
    EnhanceFailed { error: String },
    SendCompleted,
    RefreshCatalog,
    CatalogLoaded { entries: Vec<ModelEntry> },
    CatalogLoadFailed { error: String },
    CredentialsLoaded { keys: CredentialMap },
    /// The provider list changed, e.g. after the config was re-read.
    ProvidersChanged { providers: Vec<Provider> },
    SetVisible { visible: bool },
    ClearStatus,
}

/// Work the shell hands back to its host to run off the event loop.
pub enum AppCommand {
    RefreshCatalog,
    LoadCredentials {
        storage: Arc<dyn CredentialStorage>,
    },
}

impl std::fmt::Debug for AppCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppCommand::RefreshCatalog => f.write_str("RefreshCatalog"),
            AppCommand::LoadCredentials { .. } => f.write_str("LoadCredentials"),
        }
    }
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppAction>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppAction>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction) {
        let _ = self.tx.send(action);
    }

    pub fn dispatch_many<I>(&self, actions: I)
    where
        I: IntoIterator<Item = AppAction>,
    {
        for action in actions.into_iter() {
            self.dispatch(action);
        }
    }
}

pub fn apply_actions(
    app: &mut App,
    actions: impl IntoIterator<Item = AppAction>,
) -> Vec<AppCommand> {
    actions
        .into_iter()
        .filter_map(|action| apply_action(app, action))
        .collect()
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    if !app.is_active() {
        debug!("Dropping action for closed view");
        return None;
    }

    app.sync_engine_status();
    let command = match action {
        AppAction::ChangeProvider { provider } => {
            app.change_provider(&provider);
            None
        }
        AppAction::ChangeModel { model } => {
            app.selection.set_model(&model);
            None
        }
        AppAction::ChangeApiKey { provider, key } => {
            app.change_api_key(&provider, &key);
            None
        }
        AppAction::ChangeInput { text } => {
            app.composer.set_draft(text);
            None
        }
        AppAction::Key { event } => {
            if let KeyOutcome::Intent(intent) = app.composer.handle_key(&event) {
                app.run_intent(intent);
            }
            None
        }
        AppAction::Submit => {
            let intent = app.composer.submit();
            app.run_intent(intent);
            None
        }
        AppAction::SubmitExample { text } => {
            let intent = app.composer.submit_example(&text);
            app.run_intent(intent);
            None
        }
        AppAction::ActivateControl => {
            if let Some(intent) = app.composer.activate_action_control() {
                app.run_intent(intent);
            }
            None
        }
        AppAction::Stop => {
            app.run_intent(ComposerIntent::Stop);
            None
        }
        AppAction::Enhance => {
            if let Some(intent) = app.composer.request_enhance() {
                app.run_intent(intent);
            }
            None
        }
        AppAction::EnhanceCompleted { text } => {
            app.composer.apply_enhancement(text);
            None
        }
        AppAction::EnhanceFailed { error } => {
            app.set_status(format!("Prompt enhancement failed: {error}"));
            None
        }
        AppAction::SendCompleted => {
            app.composer.clear_after_send();
            None
        }
        AppAction::RefreshCatalog => Some(AppCommand::RefreshCatalog),
        AppAction::CatalogLoaded { entries } => {
            app.selection.replace_catalog(entries);
            app.fill_empty_model();
            None
        }
        AppAction::CatalogLoadFailed { error } => {
            app.set_status(format!("Could not refresh models: {error}"));
            None
        }
        AppAction::CredentialsLoaded { keys } => {
            app.credentials.install_loaded(keys);
            None
        }
        AppAction::ProvidersChanged { providers } => {
            app.reload_providers(providers);
            None
        }
        AppAction::SetVisible { visible } => {
            app.visible = visible;
            None
        }
        AppAction::ClearStatus => {
            app.status = None;
            None
        }
    };
    app.sync_engine_status();
    command
}
