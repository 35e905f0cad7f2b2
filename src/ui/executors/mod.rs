//! One-shot background tasks spawned on behalf of the chat shell.
//!
//! Each task reports back through the [`AppActionDispatcher`] and checks the
//! [`ViewLifetime`] first, so a view closed mid-flight receives nothing.

use crate::core::app::{AppAction, AppActionDispatcher, ViewLifetime};

pub mod catalog_loader;
pub mod credential_loader;

pub use catalog_loader::spawn_catalog_refresh;
pub use credential_loader::spawn_credential_load;

#[derive(Clone)]
pub struct ExecutorContext {
    pub dispatcher: AppActionDispatcher,
    pub lifetime: ViewLifetime,
}

impl ExecutorContext {
    pub fn new(dispatcher: AppActionDispatcher, lifetime: ViewLifetime) -> Self {
        Self {
            dispatcher,
            lifetime,
        }
    }

    /// Delivers `action` unless the view has been closed meanwhile.
    pub fn deliver(&self, action: AppAction) -> bool {
        if !self.lifetime.is_active() {
            tracing::debug!("View closed; discarding background result");
            return false;
        }
        self.dispatcher.dispatch(action);
        true
    }
}
