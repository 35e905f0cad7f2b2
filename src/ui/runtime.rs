//! Event plumbing between a view and the chat shell.
//!
//! The runtime owns the [`App`] and the receiving end of its action channel.
//! Commands returned by [`apply_action`] are turned into background tasks
//! whose results come back through the same channel.

use std::sync::Arc;

use ratatui::crossterm::event::KeyEvent;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::app::{apply_action, App, AppAction, AppActionDispatcher, AppCommand};
use crate::core::catalog::CatalogSource;
use crate::ui::executors::{spawn_catalog_refresh, spawn_credential_load, ExecutorContext};
use crate::ui::keymap::action_for_key;

pub struct ShellRuntime {
    app: App,
    dispatcher: AppActionDispatcher,
    rx: mpsc::UnboundedReceiver<AppAction>,
    catalog_source: Arc<dyn CatalogSource>,
}

impl ShellRuntime {
    pub fn new(app: App, catalog_source: Arc<dyn CatalogSource>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            app,
            dispatcher: AppActionDispatcher::new(tx),
            rx,
            catalog_source,
        }
    }

    /// A handle engines can use to report completions back to the shell.
    pub fn dispatcher(&self) -> AppActionDispatcher {
        self.dispatcher.clone()
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Kicks off the startup loads. Must be called inside a tokio runtime.
    pub fn start(&self) -> Vec<JoinHandle<bool>> {
        self.app
            .startup_commands()
            .into_iter()
            .map(|command| self.execute(command))
            .collect()
    }

    pub fn apply(&mut self, action: AppAction) {
        if let Some(command) = apply_action(&mut self.app, action) {
            self.execute(command);
        }
    }

    pub fn handle_key(&mut self, event: KeyEvent) {
        self.apply(action_for_key(event));
    }

    /// Waits for the next queued action and applies it. Returns `false` once
    /// the channel has closed.
    pub async fn next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(action) => {
                self.apply(action);
                true
            }
            None => false,
        }
    }

    /// Applies every action already queued without waiting; returns how many.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(action) = self.rx.try_recv() {
            self.apply(action);
            applied += 1;
        }
        applied
    }

    pub fn execute(&self, command: AppCommand) -> JoinHandle<bool> {
        tracing::debug!(?command, "Executing shell command");
        let ctx = ExecutorContext::new(self.dispatcher.clone(), self.app.lifetime());
        match command {
            AppCommand::RefreshCatalog => spawn_catalog_refresh(ctx, self.catalog_source.clone()),
            AppCommand::LoadCredentials { storage } => spawn_credential_load(ctx, storage),
        }
    }

    pub fn close(&mut self) {
        self.app.close();
    }
}
